use std::rc::Rc;

use leptos::*;
use leptos_meta::Title;
use web_sys::HtmlInputElement;

use crate::format::{format_file_size, format_upload_date};
use crate::mime::{self, FileCategory};
use crate::retry::RetryPolicy;
use crate::state::{AccordionState, UploadState};
use crate::upload::{SelectedFile, UploadController};
use crate::{ClientConfig, FileMetadata};

use super::pages::BackButton;
use super::{HttpApi, WebBrowser, WebFile};

type PageState = RwSignal<UploadState<WebFile>>;
type PageController = UploadController<HttpApi, WebBrowser, PageState>;

#[component]
pub fn UploadPage() -> impl IntoView {
    let api = expect_context::<Rc<HttpApi>>();
    let config = store_value(api.config().clone());
    let state: PageState = create_rw_signal(UploadState::default());
    let accordion = create_rw_signal(AccordionState::default());

    let controller = PageController::new(api, Rc::new(WebBrowser::default()), state);

    let loader = controller.clone();
    spawn_local(async move { loader.load_files().await });

    let for_cleanup = controller.clone();
    on_cleanup(move || for_cleanup.teardown());

    let controller = store_value(controller);

    let categorized = create_memo(move |_| state.with(|s| mime::categorize(&s.files)));
    let max_attempts = RetryPolicy::default().max_attempts;

    let on_file_change = move |ev: ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let file = input.files().and_then(|list| list.get(0)).map(WebFile::new);
        controller.with_value(|c| c.select_file(file));
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let c = controller.get_value();
        spawn_local(async move { c.submit().await });
    };

    let progress = move || state.with(|s| s.upload_progress);

    view! {
        <div class="page">
            <Title text="File Upload" />
            <header class="card page-header">
                <BackButton />
                <h1>"File Upload"</h1>
                <div class="spacer"></div>
            </header>
            <main class="upload-main">
                <section class="card">
                    <h2>"Upload a File"</h2>
                    <Show when=move || state.with(|s| !s.message.is_empty())>
                        <div class="notice success">
                            <p>{move || state.with(|s| s.message.clone())}</p>
                        </div>
                    </Show>
                    <Show when=move || state.with(|s| !s.error.is_empty())>
                        <div class="notice error">
                            <p>{move || state.with(|s| s.error.clone())}</p>
                        </div>
                    </Show>
                    <Show when=move || state.with(|s| s.retry_attempt > 0)>
                        <div class="notice info">
                            <p>
                                {move || format!(
                                    "Retrying... Attempt {}/{}",
                                    state.with(|s| s.retry_attempt) + 1,
                                    max_attempts,
                                )}
                            </p>
                        </div>
                    </Show>
                    <form class="upload-form" on:submit=on_submit>
                        <label class="drop-zone">
                            <input
                                type="file"
                                class="hidden"
                                accept=mime::ACCEPT_ATTRIBUTE
                                on:change=on_file_change
                            />
                            <span>
                                {move || state.with(|s| {
                                    s.file
                                        .as_ref()
                                        .map(|file| file.name())
                                        .unwrap_or_else(|| "Drag and drop or click to select a file".to_string())
                                })}
                            </span>
                        </label>
                        {move || {
                            state
                                .with(|s| s.preview.clone())
                                .map(|src| view! { <img class="preview" src=src alt="Preview" /> })
                        }}
                        <Show when=move || { progress() > 0 }>
                            <div class="progress">
                                <div class="progress-bar">
                                    <div
                                        class="progress-fill"
                                        style=move || format!("width: {}%", progress())
                                    ></div>
                                </div>
                                <p class="progress-label">{move || format!("{}%", progress())}</p>
                            </div>
                        </Show>
                        <button
                            type="submit"
                            class="primary-btn"
                            disabled=move || !state.with(|s| s.can_submit())
                        >
                            "Upload File"
                        </button>
                    </form>
                </section>
                <section class="card">
                    <h3>"Uploaded Files"</h3>
                    {FileCategory::ALL
                        .into_iter()
                        .map(|category| {
                            let files = Signal::derive(move || {
                                categorized.with(|map| map.get(&category).cloned().unwrap_or_default())
                            });
                            let open = Signal::derive(move || accordion.with(|a| a.is_open(category)));
                            view! {
                                <Accordion
                                    category=category
                                    files=files
                                    open=open
                                    on_toggle=move || accordion.update(|a| a.toggle(category))
                                    controller=controller
                                    config=config
                                />
                            }
                        })
                        .collect_view()}
                </section>
            </main>
        </div>
    }
}

/// One collapsible section of the file list.
#[component]
fn Accordion<F>(
    category: FileCategory,
    files: Signal<Vec<FileMetadata>>,
    open: Signal<bool>,
    on_toggle: F,
    controller: StoredValue<PageController>,
    config: StoredValue<ClientConfig>,
) -> impl IntoView
where
    F: Fn() + 'static,
{
    let empty_text = format!("No {} files uploaded yet.", category.title().to_lowercase());

    view! {
        <div class="accordion">
            <button
                type="button"
                class="accordion-toggle"
                aria-expanded=move || open.get().to_string()
                on:click=move |_| on_toggle()
            >
                <span>{move || format!("{} ({})", category.title(), files.with(Vec::len))}</span>
                <span class="chevron" class:open=move || open.get()>"▾"</span>
            </button>
            <Show when=move || open.get()>
                <div class="accordion-body">
                    <Show
                        when=move || files.with(|f| !f.is_empty())
                        fallback={
                            let empty_text = empty_text.clone();
                            move || view! { <p class="empty">{empty_text.clone()}</p> }
                        }
                    >
                        <table class="file-table">
                            <thead>
                                <tr>
                                    <th>"File"</th>
                                    <th>"Type"</th>
                                    <th>"Size"</th>
                                    <th>"Date"</th>
                                    <th>"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || files.get()
                                    key=|file| file.id.clone()
                                    children=move |file| {
                                        view! { <FileRow file=file controller=controller config=config /> }
                                    }
                                />
                            </tbody>
                        </table>
                    </Show>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn FileRow(
    file: FileMetadata,
    controller: StoredValue<PageController>,
    config: StoredValue<ClientConfig>,
) -> impl IntoView {
    let open_link = mime::is_viewable(&file.mime_type).then(|| {
        let href = config.with_value(|c| c.inline_url(&file.filename));
        let filename = file.filename.clone();
        view! {
            <a
                class="action open"
                href=href
                target="_blank"
                rel="noopener noreferrer"
                on:click=move |_| log::info!("opening file: {}", filename)
            >
                "Open"
            </a>
        }
    });

    let on_download = {
        let filename = file.filename.clone();
        let name = file.original_name.clone();
        move |_| {
            let c = controller.get_value();
            let (filename, name) = (filename.clone(), name.clone());
            spawn_local(async move { c.download(&filename, &name).await });
        }
    };

    let on_delete = {
        let id = file.id.clone();
        let name = file.original_name.clone();
        move |_| {
            let c = controller.get_value();
            let (id, name) = (id.clone(), name.clone());
            spawn_local(async move {
                c.delete(&id, &name).await;
            });
        }
    };

    view! {
        <tr>
            <td class="truncate" title=file.original_name.clone()>{file.original_name.clone()}</td>
            <td>{file.mime_type.clone()}</td>
            <td>{format_file_size(file.size)}</td>
            <td>{format_upload_date(&file.upload_date)}</td>
            <td>
                <div class="actions">
                    {open_link}
                    <button type="button" class="action download" on:click=on_download>
                        "Download"
                    </button>
                    <button type="button" class="action delete" on:click=on_delete>
                        "Delete"
                    </button>
                </div>
            </td>
        </tr>
    }
}
