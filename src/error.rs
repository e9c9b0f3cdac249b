//! Error types for kvbase
//!
//! Provides a unified error type for the fallible entry points
//! (configuration, status conversion).

use thiserror::Error;

use crate::status::Status;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for kvbase operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // Status Errors
    // -------------------------------------------------------------------------
    /// A non-OK status surfaced through `Result`
    #[error("{0}")]
    Status(#[from] Status),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvError {
    /// Borrow the carried status, if this error came from one
    pub fn as_status(&self) -> Option<&Status> {
        match self {
            KvError::Status(status) => Some(status),
            KvError::Config(_) => None,
        }
    }
}
