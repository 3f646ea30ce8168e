//! # Server Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Server Error Categories                           │
//! │                                                                         │
//! │  ApiError (request-scoped, one response each)                          │
//! │    InvalidSubmission ──► 400 INVALID_SUBMISSION                        │
//! │    InvalidForm       ──► 400 INVALID_SUBMISSION                        │
//! │    Render            ──► 500 RENDER_FAILED                             │
//! │    Document          ──► 500 DOCUMENT_FAILED    (counter not advanced) │
//! │    Persist           ──► 500 PERSIST_FAILED     (counter advanced)     │
//! │    Internal          ──► 500 INTERNAL_ERROR                            │
//! │                                                                         │
//! │  LifecycleError (process-fatal, exit 1)                                │
//! │    Bind, Serve, ShutdownTimeout                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use intake_core::SubmissionError;
use intake_store::StoreError;
use thiserror::Error;
use tracing::{error, warn};

// =============================================================================
// Document Errors
// =============================================================================

/// Result type alias for document generation.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Failure to produce the filled document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The fillable template does not exist.
    #[error("Document template not found: '{}'", path.display())]
    TemplateMissing { path: PathBuf },

    /// The backend program could not be started.
    #[error("Document backend '{program}' could not be started: {source}")]
    BackendUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend ran and reported failure.
    #[error("Document backend failed ({}): {stderr}", exit_status(.status))]
    BackendFailed { status: Option<i32>, stderr: String },

    /// Preparing the output location or the field data failed.
    #[error("Document I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn exit_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

// =============================================================================
// API Errors
// =============================================================================

/// Errors returned to the HTTP client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidSubmission(#[from] SubmissionError),

    /// The body is not a usable urlencoded form.
    #[error("Malformed form: {0}")]
    InvalidForm(String),

    #[error("Failed to render page: {0}")]
    Render(String),

    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The document exists but the advanced counter did not reach the disk.
    #[error("Document created but the reference counter could not be saved: {0}")]
    Persist(#[from] StoreError),

    /// The document task ended without a result.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::InvalidForm(rejection.body_text())
    }
}

impl ApiError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidSubmission(_) | ApiError::InvalidForm(_) => "INVALID_SUBMISSION",
            ApiError::Render(_) => "RENDER_FAILED",
            ApiError::Document(_) => "DOCUMENT_FAILED",
            ApiError::Persist(_) => "PERSIST_FAILED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidSubmission(_) | ApiError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns true if the client sent something it must correct.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            warn!(code = self.code(), error = %self, "Request rejected");
        } else {
            error!(code = self.code(), error = %self, "Request failed");
        }
        (self.status(), format!("{}: {}", self.code(), self)).into_response()
    }
}

// =============================================================================
// Lifecycle Errors
// =============================================================================

/// Errors that end the process.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server stopped unexpectedly: {0}")]
    Serve(String),

    #[error("Graceful shutdown did not finish within {timeout:?}")]
    ShutdownTimeout { timeout: Duration },
}
