//! Error types for hlscope-core

use thiserror::Error;

/// Main error type for the hlscope-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport or shape error from the info endpoint
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Portfolio response has no usable history for the named timeframe
    #[error("portfolio is missing the {0} timeframe")]
    MissingTimeframe(String),

    /// A shared prompt document is missing or not valid JSON
    #[error("prompt unavailable: {0}")]
    Prompt(String),

    /// Agent has no config directory or account address
    #[error("agent not found: {0}")]
    AgentNotFound(String),
}

/// Result type alias for hlscope-core
pub type Result<T> = std::result::Result<T, Error>;
