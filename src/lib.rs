use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

pub mod auth;
pub mod error;
pub mod format;
pub mod mime;
pub mod retry;
pub mod state;
pub mod upload;

pub use error::ApiError;

/// Metadata for one stored file, as returned by `GET /api/files`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    #[serde(rename = "_id")]
    pub id: String,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    #[serde(default)]
    pub path: String,
    pub size: u64,
    pub upload_date: String,
}

/// The `{message}` body the backend sends for uploads, deletes and sign-ups,
/// and for most error responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub token: Option<String>,
    /// Session lifetime in seconds, when the backend reports one.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Runtime configuration handed to the client by the shell host at `/config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub api_base_url: String,
}

impl ClientConfig {
    /// Absolute URL for an `/api/...` path under the configured base.
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Link for opening a stored file inline in a new tab.
    pub fn inline_url(&self, filename: &str) -> String {
        self.api_url(&format!("uploads/{}", encode_path_segment(filename)))
    }
}

/// Characters left as-is in a path segment: the RFC 3986 unreserved set.
const PATH_SEGMENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes a single URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT_SET).to_string()
}

#[cfg(feature = "frontend")]
pub mod frontend;

#[cfg(feature = "frontend")]
pub use frontend::*;
