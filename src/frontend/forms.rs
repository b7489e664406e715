use std::rc::Rc;

use chrono::Utc;
use leptos::*;
use leptos_meta::Title;
use leptos_router::use_navigate;

use crate::auth::{
    submit_login, submit_sign_up, AuthFailure, FieldErrors, LoginForm, SessionStore, SignupForm,
};

use super::{HttpApi, SessionSignal};

/// The `/` route: login by default, sign-up on request.
#[component]
pub fn AuthGate() -> impl IntoView {
    let (show_login, set_show_login) = create_signal(true);

    view! {
        <div class="auth-screen">
            <Title text="Log In" />
            <Show
                when=move || show_login.get()
                fallback=move || view! { <SignUp switch_to_login=move || set_show_login.set(true) /> }
            >
                <Login switch_to_signup=move || set_show_login.set(false) />
            </Show>
        </div>
    }
}

#[component]
fn FieldError<F>(message: F) -> impl IntoView
where
    F: Fn() -> Option<String> + 'static,
{
    move || message().map(|text| view! { <span class="field-error">{text}</span> })
}

#[component]
fn Login<F>(switch_to_signup: F) -> impl IntoView
where
    F: Fn() + Copy + 'static,
{
    let api = store_value(expect_context::<Rc<HttpApi>>());
    let sessions = SessionStore::new(expect_context::<SessionSignal>());
    let navigate = use_navigate();

    let name = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let errors = create_rw_signal(FieldErrors::default());
    let api_error = create_rw_signal(None::<String>);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        api_error.set(None);

        let form = LoginForm {
            name: name.get_untracked(),
            password: password.get_untracked(),
        };
        let api = api.get_value();
        let navigate = navigate.clone();
        spawn_local(async move {
            match submit_login(api.as_ref(), &form, Utc::now()).await {
                Ok(session) => {
                    name.set(String::new());
                    password.set(String::new());
                    errors.set(FieldErrors::default());
                    sessions.sign_in(session);
                    navigate("/home", Default::default());
                }
                Err(AuthFailure::Invalid(invalid)) => errors.set(invalid),
                Err(AuthFailure::Rejected(message)) => {
                    errors.set(FieldErrors::default());
                    api_error.set(Some(message));
                }
            }
        });
    };

    view! {
        <div class="card auth-card">
            <h2>"Log In"</h2>
            <Show when=move || api_error.with(Option::is_some)>
                <div class="notice error">
                    <p>{move || api_error.get().unwrap_or_default()}</p>
                </div>
            </Show>
            <form on:submit=on_submit>
                <div class="form-field">
                    <input
                        type="text"
                        class="text-input"
                        class:invalid=move || errors.with(|e| e.name.is_some())
                        placeholder="Name"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                    <FieldError message=move || errors.with(|e| e.name.clone()) />
                </div>
                <div class="form-field">
                    <input
                        type="password"
                        class="text-input"
                        class:invalid=move || errors.with(|e| e.password.is_some())
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <FieldError message=move || errors.with(|e| e.password.clone()) />
                </div>
                <button type="submit" class="primary-btn">"Log In"</button>
                <p class="switch-form">
                    "Don't have an account? "
                    <button type="button" class="link-btn" on:click=move |_| switch_to_signup()>
                        "Sign Up"
                    </button>
                </p>
            </form>
        </div>
    }
}

#[component]
fn SignUp<F>(switch_to_login: F) -> impl IntoView
where
    F: Fn() + Copy + 'static,
{
    let api = store_value(expect_context::<Rc<HttpApi>>());

    let name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let errors = create_rw_signal(FieldErrors::default());
    let api_error = create_rw_signal(None::<String>);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        api_error.set(None);

        let form = SignupForm {
            name: name.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        let api = api.get_value();
        spawn_local(async move {
            match submit_sign_up(api.as_ref(), &form).await {
                Ok(message) => {
                    log::info!("user {} signed up: {}", form.name, message);
                    name.set(String::new());
                    email.set(String::new());
                    password.set(String::new());
                    errors.set(FieldErrors::default());
                    switch_to_login();
                }
                Err(AuthFailure::Invalid(invalid)) => errors.set(invalid),
                Err(AuthFailure::Rejected(message)) => {
                    errors.set(FieldErrors::default());
                    api_error.set(Some(message));
                }
            }
        });
    };

    view! {
        <div class="card auth-card">
            <h2>"Sign Up"</h2>
            <Show when=move || api_error.with(Option::is_some)>
                <div class="notice error">
                    <p>{move || api_error.get().unwrap_or_default()}</p>
                </div>
            </Show>
            <form novalidate on:submit=on_submit>
                <div class="form-field">
                    <input
                        type="text"
                        class="text-input"
                        class:invalid=move || errors.with(|e| e.name.is_some())
                        placeholder="Name"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                    <FieldError message=move || errors.with(|e| e.name.clone()) />
                </div>
                <div class="form-field">
                    <input
                        type="email"
                        class="text-input"
                        class:invalid=move || errors.with(|e| e.email.is_some())
                        placeholder="Email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <FieldError message=move || errors.with(|e| e.email.clone()) />
                </div>
                <div class="form-field">
                    <input
                        type="password"
                        class="text-input"
                        class:invalid=move || errors.with(|e| e.password.is_some())
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <FieldError message=move || errors.with(|e| e.password.clone()) />
                </div>
                <button type="submit" class="primary-btn">"Sign Up"</button>
                <p class="switch-form">
                    "Already have an account? "
                    <button type="button" class="link-btn" on:click=move |_| switch_to_login()>
                        "Log In"
                    </button>
                </p>
            </form>
        </div>
    }
}
