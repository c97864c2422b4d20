//! Error types shared by the client, drafts, screens and upload helper

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Infrastructure
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ─────────────────────────────────────────────────────────────
    // Form and network
    // ─────────────────────────────────────────────────────────────
    /// A draft failed its required-field check. Nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// Non-2xx response (other than a GET 404) or a transport failure.
    #[error("{message}")]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },

    // ─────────────────────────────────────────────────────────────
    // Image upload
    // ─────────────────────────────────────────────────────────────
    #[error("Please allow access to your photo library.")]
    PermissionDenied,

    #[error("{0}")]
    UploadFailed(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn request_failed(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    pub fn upload_failed(message: impl Into<String>) -> Self {
        Self::UploadFailed(message.into())
    }
}
