//! # Store Error Types
//!
//! Error types for loading and persisting the configuration file.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Store Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────────────────┐   ┌─────────────────────────────────┐ │
//! │  │  Load (startup-fatal)       │   │  Persist (request-scoped, loud) │ │
//! │  │                             │   │                                 │ │
//! │  │  NotFound                   │   │  Serialize                      │ │
//! │  │  IsDirectory                │   │  Write                          │ │
//! │  │  Read                       │   │                                 │ │
//! │  │  Parse                      │   │                                 │ │
//! │  │  Invalid                    │   │                                 │ │
//! │  └─────────────────────────────┘   └─────────────────────────────────┘ │
//! │                                                                         │
//! │  Counter: CounterExhausted (advance would overflow)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use intake_core::CoreError;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store error type covering every configuration file failure.
#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // Load Errors
    // =========================================================================
    /// Nothing exists at the configuration path.
    #[error("Config file not found: '{}'", path.display())]
    NotFound { path: PathBuf },

    /// The configuration path names a directory.
    #[error("'{}' is a directory, not a normal file", path.display())]
    IsDirectory { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed YAML or a type mismatch.
    #[error("Failed to parse config '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Parsed, but breaks a configuration rule.
    #[error("Invalid config '{}': {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    // =========================================================================
    // Persist Errors
    // =========================================================================
    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    /// The configuration file could not be written.
    #[error("Failed to write config '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Counter Errors
    // =========================================================================
    /// The counter cannot be advanced.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<serde_yaml::Error> for StoreError {
    fn from(err: serde_yaml::Error) -> Self {
        StoreError::Serialize(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl StoreError {
    /// Returns true if this error happens while loading, which means the
    /// server must not start.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound { .. }
                | StoreError::IsDirectory { .. }
                | StoreError::Read { .. }
                | StoreError::Parse { .. }
                | StoreError::Invalid { .. }
        )
    }

    /// Returns true if retrying the same persist may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Write { .. })
    }
}
