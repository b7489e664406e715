use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Rejected before any request was made.
    #[error("{0}")]
    Validation(String),
    #[error("Invalid file type. Please upload an image, PDF, document, video, or audio file.")]
    InvalidFileType,
    /// Transport failure, including timeouts and aborted requests.
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with a non-success status.
    #[error("server error: {status} {message}")]
    Server { status: u16, message: String },
    /// A DOM or browser API call failed.
    #[error("browser error: {0}")]
    Browser(String),
}

impl ApiError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        ApiError::Server {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's own message when it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// Text to show the user: the server's message if present, otherwise `fallback`.
    /// Local errors carry their own text.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Validation(_) | ApiError::InvalidFileType => self.to_string(),
            _ => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

/// Pulls `message` out of a JSON error body; anything else yields an empty string.
pub fn message_from_body(body: &str) -> String {
    serde_json::from_str::<crate::ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_default()
}
