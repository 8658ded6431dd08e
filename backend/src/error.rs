//! Error type of the server-side companion.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Error, Debug)]
pub enum FilterError {
    /// Host database failure
    #[error("Host database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Payload serialization failure
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client construction failure
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A record the page depends on does not exist
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// Invalid settings
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

impl FilterError {
    pub fn not_found(what: impl Into<String>) -> Self {
        FilterError::NotFound { what: what.into() }
    }
}
