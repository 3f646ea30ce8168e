//! # Intake Server
//!
//! HTTP front end of the testing center intake tool.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Intake Server                                    │
//! │                                                                         │
//! │  Browser ───► axum Router ───► handlers ───► ReferenceLedger           │
//! │                (routes.rs)         │          (config.yml)              │
//! │                                    │                                    │
//! │                                    ├──► DocumentBackend (pdftk)         │
//! │                                    └──► viewer (xdg-open / open)        │
//! │                                                                         │
//! │  lifecycle.rs: bind → serve → signal → bounded graceful shutdown       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod document;
pub mod error;
pub mod lifecycle;
pub mod routes;
pub mod state;
pub mod view;
pub mod viewer;

pub use cli::Cli;
pub use document::{DocumentBackend, PdftkBackend};
pub use error::{ApiError, DocumentError, DocumentResult, LifecycleError};
pub use lifecycle::{shutdown_signal, Server};
pub use routes::router;
pub use state::AppState;
