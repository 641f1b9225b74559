//! Error types for the analysis library.
//!
//! The structural and reading-order engines never fail: every problem they
//! detect is reported as data. These errors only cover the ambient operations
//! around them, such as importing a tree or loading options from JSON.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur outside of the analysis engines.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Options are out of range (negative tolerance, bad threshold, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Imported tree is internally inconsistent
    #[error("Invalid tree: {0}")]
    InvalidTree(String),
}
