use chrono::{Datelike, Utc};
use leptos::*;
use leptos_meta::Title;
use leptos_router::{use_navigate, A};

use crate::auth::SessionStore;

use super::SessionSignal;

const WELCOME_TEXT: &str = "Welcome to Amanuel's Portfolio";
const GITHUB_URL: &str = "https://github.com/amanuel-asmare";
const EMAIL: &str = "amanuelasmare18@gmail.com";

#[component]
fn NavBar() -> impl IntoView {
    let session = expect_context::<SessionSignal>();
    let sessions = SessionStore::new(session);
    let navigate = use_navigate();

    let user = move || {
        session.with(|current| {
            current
                .as_ref()
                .filter(|s| !s.is_expired(Utc::now()))
                .map(|s| s.name.clone())
        })
    };

    let logout = move |_| {
        sessions.sign_out();
        navigate("/", Default::default());
    };

    view! {
        <nav class="card nav-bar">
            <div class="nav-links">
                <A href="/home" class="nav-link">"Home"</A>
                <A href="/about" class="nav-link">"About"</A>
                <A href="/upload" class="nav-link">"Upload"</A>
                <A href="/contact" class="nav-link">"Contact"</A>
            </div>
            <Show when=move || user().is_some()>
                <div class="nav-session">
                    <span>{move || user().unwrap_or_default()}</span>
                    <button type="button" class="link-btn" on:click=logout.clone()>
                        "Log Out"
                    </button>
                </div>
            </Show>
        </nav>
    }
}

#[component]
fn Footer() -> impl IntoView {
    let year = Utc::now().year();

    view! {
        <footer class="footer">
            <p>{format!("© {} Amanuel. All rights reserved.", year)}</p>
            <div class="footer-links">
                <a href=GITHUB_URL target="_blank" rel="noopener noreferrer">"GitHub"</a>
                <a href=format!("mailto:{}", EMAIL)>"Email"</a>
            </div>
        </footer>
    }
}

/// Steps back through browser history.
#[component]
pub fn BackButton() -> impl IntoView {
    let go_back = move |_| {
        let result = web_sys::window()
            .ok_or(wasm_bindgen::JsValue::NULL)
            .and_then(|window| window.history())
            .and_then(|history| history.back());
        if let Err(err) = result {
            log::warn!("history back failed: {:?}", err);
        }
    };

    view! {
        <button type="button" class="back-btn" on:click=go_back>
            "← Back"
        </button>
    }
}

#[component]
pub fn Home() -> impl IntoView {
    SessionStore::new(expect_context::<SessionSignal>()).prune(Utc::now());

    let letters = WELCOME_TEXT
        .chars()
        .enumerate()
        .map(|(index, c)| {
            let shown = if c == ' ' { '\u{a0}' } else { c };
            view! {
                <span class="letter" style=format!("animation-delay: {:.2}s", index as f64 * 0.05)>
                    {shown}
                </span>
            }
        })
        .collect_view();

    view! {
        <div class="page">
            <Title text="Home" />
            <NavBar />
            <main class="hero">
                <h1 class="gradient-text">{letters}</h1>
            </main>
            <Footer />
        </div>
    }
}

#[component]
pub fn About() -> impl IntoView {
    view! {
        <div class="page">
            <Title text="About Me" />
            <header class="card page-header">
                <BackButton />
                <h1>"About Me"</h1>
                <div class="spacer"></div>
            </header>
            <section class="card about">
                <h2 class="gradient-text">"About Me"</h2>
                <p class="fade-in" style="animation-delay: 0s">
                    "My name is " <span class="highlight">"Amanuel"</span>
                    ". I am an undergraduate " <span class="highlight">"Computer Science"</span>
                    " student at North Wollo Woldia University."
                </p>
                <p class="fade-in" style="animation-delay: 0.2s">
                    "I am a passionate programmer skilled in "
                    <span class="highlight">"JavaScript, HTML, CSS, React, Node.js, and MongoDB"</span>
                    ". I enjoy building responsive web applications and continuously improving my development skills."
                </p>
                <p class="fade-in" style="animation-delay: 0.4s">
                    "This portfolio showcases some of the projects I have worked on during my academic journey."
                </p>
            </section>
        </div>
    }
}

/// The message form is local only; nothing is sent anywhere.
#[component]
pub fn Contact() -> impl IntoView {
    let name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let message = create_rw_signal(String::new());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        log::info!(
            "contact form submitted by {:?} ({} characters)",
            name.get_untracked(),
            message.with_untracked(String::len)
        );
    };

    view! {
        <div class="page">
            <Title text="Contact Me" />
            <NavBar />
            <header class="page-header">
                <A href="/home" class="back-btn">"← Back"</A>
                <h1>"Contact Me"</h1>
                <div class="spacer"></div>
            </header>
            <main class="card contact">
                <form on:submit=on_submit>
                    <div class="form-field">
                        <input
                            type="text"
                            class="text-input"
                            placeholder="Your name"
                            required
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-field">
                        <input
                            type="email"
                            class="text-input"
                            placeholder="Your email"
                            required
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-field">
                        <textarea
                            class="text-input"
                            rows="4"
                            placeholder="Your message"
                            required
                            prop:value=move || message.get()
                            on:input=move |ev| message.set(event_target_value(&ev))
                        ></textarea>
                    </div>
                    <button type="submit" class="primary-btn">"Send Message"</button>
                </form>
                <p class="switch-form">
                    "Or email me directly at "
                    <a href=format!("mailto:{}", EMAIL)>{EMAIL}</a>
                </p>
            </main>
            <Footer />
        </div>
    }
}
