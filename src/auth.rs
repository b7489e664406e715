//! Login and sign-up form handling, and the client session.

use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use crate::error::ApiError;
use crate::state::Store;
use crate::{ApiMessage, LoginRequest, LoginResponse, SignupRequest};

#[async_trait(?Send)]
pub trait AuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn sign_up(&self, request: &SignupRequest) -> Result<ApiMessage, ApiError>;
}

/// Per-field validation messages; empty when the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthFailure {
    /// Validation failed; no request was sent.
    Invalid(FieldErrors),
    /// The request was sent and failed; the text is ready to display.
    Rejected(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub name: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FieldErrors {
        FieldErrors {
            name: required(&self.name, "Name is required"),
            email: None,
            password: required(&self.password, "Password is required"),
        }
    }

    fn request(&self) -> LoginRequest {
        LoginRequest {
            name: self.name.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> FieldErrors {
        let email = if self.email.trim().is_empty() {
            Some("Email is required".to_string())
        } else if !email_pattern().is_match(&self.email) {
            Some("Invalid email".to_string())
        } else {
            None
        };

        FieldErrors {
            name: required(&self.name, "Name is required"),
            email,
            password: required(&self.password, "Password is required"),
        }
    }

    fn request(&self) -> SignupRequest {
        SignupRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

fn required(value: &str, message: &str) -> Option<String> {
    value.trim().is_empty().then(|| message.to_string())
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"))
}

/// An authenticated user, held in application-scoped state from login until
/// logout or expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub name: String,
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn from_login(name: &str, response: &LoginResponse, now: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            token: response.token.clone(),
            // Lifetimes that do not fit a timestamp mean no expiry.
            expires_at: response
                .expires_in
                .and_then(|secs| i64::try_from(secs).ok())
                .and_then(Duration::try_seconds)
                .and_then(|lifetime| now.checked_add_signed(lifetime)),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Validates and sends a login. On success the returned session is ready to
/// be stored with [`SessionStore::sign_in`].
pub async fn submit_login<A: AuthApi + ?Sized>(
    api: &A,
    form: &LoginForm,
    now: DateTime<Utc>,
) -> Result<Session, AuthFailure> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Err(AuthFailure::Invalid(errors));
    }

    match api.login(&form.request()).await {
        Ok(response) => {
            log::info!("user {} logged in", form.name);
            Ok(Session::from_login(&form.name, &response, now))
        }
        Err(err) => {
            log::warn!("login failed: {}", err);
            Err(AuthFailure::Rejected(err.user_message("Failed to log in")))
        }
    }
}

/// Validates and sends a registration, returning the server's message.
pub async fn submit_sign_up<A: AuthApi + ?Sized>(
    api: &A,
    form: &SignupForm,
) -> Result<String, AuthFailure> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Err(AuthFailure::Invalid(errors));
    }

    match api.sign_up(&form.request()).await {
        Ok(response) => Ok(response.message),
        Err(err) => {
            log::error!("sign up failed: {}", err);
            Err(AuthFailure::Rejected(err.user_message("Failed to sign up")))
        }
    }
}

/// Wraps whatever store holds the current session.
#[derive(Clone, Copy)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: Store<Option<Session>>> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn sign_in(&self, session: Session) {
        self.store.update(|current| *current = Some(session));
    }

    pub fn sign_out(&self) {
        if let Some(Some(session)) = self.store.update(Option::take) {
            log::info!("user {} logged out", session.name);
        }
    }

    /// The live session, treating an expired one as absent.
    pub fn active(&self, now: DateTime<Utc>) -> Option<Session> {
        self.store
            .read(|current| current.clone())
            .flatten()
            .filter(|session| !session.is_expired(now))
    }

    /// Drops the stored session once it has expired.
    pub fn prune(&self, now: DateTime<Utc>) {
        let expired = self
            .store
            .read(|current| current.as_ref().is_some_and(|s| s.is_expired(now)))
            .unwrap_or(false);
        if expired {
            self.sign_out();
        }
    }
}
