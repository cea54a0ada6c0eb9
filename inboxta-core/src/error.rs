//! Error types for inboxta-core

use thiserror::Error;

/// Main error type for the inboxta-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Durable knowledge store error
    #[error("store error: {0}")]
    Store(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// LLM completion error
    #[error("LLM error: {0}")]
    Llm(String),
}

/// Result type alias for inboxta-core
pub type Result<T> = std::result::Result<T, Error>;
