//! Error types for the eCFR backend.
//!
//! Library functions return [`EcfrError`]; the HTTP handlers never surface
//! it as a status code but render its message into an `error` field of the
//! response body.

use thiserror::Error;

/// Main error type for the backend library.
#[derive(Debug, Error)]
pub enum EcfrError {
    /// Invalid date format.
    #[error("Invalid date format: '{0}'. Expected YYYY-MM-DD (e.g., 2024-01-01)")]
    InvalidDate(String),

    /// HTTP request failed, or the upstream answered with a non-2xx status.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to download the full text of a title.
    #[error("Failed to download title {title} at date {date}: {source}")]
    FullTextDownload {
        title: u32,
        date: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body was not valid UTF-8.
    #[error("Response body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// JSON decoding of an upstream response failed.
    #[error("JSON decoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid runtime configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, EcfrError>;
