//! Error types for invoice loading

use medrasti_core::SourceError;
use thiserror::Error;

/// Errors that can occur while talking to the invoice API
#[derive(Error, Debug)]
pub enum LoadError {
    /// The HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The base or asset URL does not parse
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Server returned an error status
    #[error("Server error ({status}): {body}")]
    ServerError {
        status: u16,
        /// `message` field of a JSON error body
        message: Option<String>,
        body: String,
    },

    /// The body is not an invoice record
    #[error("Malformed invoice body: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoadError>;

impl From<LoadError> for SourceError {
    fn from(err: LoadError) -> Self {
        let source = SourceError::new(err.to_string());
        match err {
            LoadError::ServerError {
                message: Some(message),
                ..
            } => source.with_server_message(message),
            _ => source,
        }
    }
}
