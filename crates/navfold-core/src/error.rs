//! Error types for navfold-core
//!
//! Every failure here is recoverable: the lifecycle layer logs it and
//! degrades to "nothing remembered this cycle" instead of breaking the page.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for navfold operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Storage Errors
    // ===================
    #[error("Session storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    #[error("Failed to write session key {key}: {message}")]
    StorageWrite { key: String, message: String },

    #[error("Session file I/O failed: {path}")]
    StorageIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===================
    // Serialization Errors
    // ===================
    #[error("Failed to serialize open state")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl CoreError {
    /// Short label used as the `error.kind` field in log events
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::StorageUnavailable { .. } => "storage_unavailable",
            CoreError::StorageWrite { .. } => "storage_write",
            CoreError::StorageIo { .. } => "storage_io",
            CoreError::Serialize { .. } => "serialize",
            CoreError::InvalidConfig { .. } => "invalid_config",
        }
    }
}
