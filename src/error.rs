// src/error.rs
//
// Error types for the key detection library.

use thiserror::Error;

/// Errors surfaced by the detection pipeline and its collaborators
#[derive(Debug, Error)]
pub enum KeyError {
    /// Invalid input parameters (empty signal, zero sample rate, bad PCP length)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Audio container or codec could not be decoded
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Invalid detector configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Spectrum plot could not be rendered or written
    #[error("Plot error: {0}")]
    Plot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, KeyError>;
