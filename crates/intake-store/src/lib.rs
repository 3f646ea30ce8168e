//! # intake-store: Configuration File and Reference Ledger
//!
//! This crate owns the one file the intake tool persists: the YAML
//! configuration, which also carries the running reference counter.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Intake Data Flow                                 │
//! │                                                                         │
//! │  POST /fillform                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   intake-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────────┐         ┌────────────────────────────┐  │   │
//! │  │   │  ReferenceLedger │         │  file                      │  │   │
//! │  │   │  (ledger.rs)     │────────►│  (file.rs)                 │  │   │
//! │  │   │                  │         │                            │  │   │
//! │  │   │  Mutex<Config>   │         │  load: stat, parse,        │  │   │
//! │  │   │  lock → advance  │         │        validate            │  │   │
//! │  │   │  write-through   │         │  save: temp + rename       │  │   │
//! │  │   └──────────────────┘         └────────────────────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  config.yml (same path it was loaded from)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use intake_store::ReferenceLedger;
//!
//! let ledger = ReferenceLedger::open("config.yml")?;
//!
//! let guard = ledger.lock().await;
//! let reference = guard.reference();
//! produce_document(&reference).await?;  // on error the guard drops, nothing changes
//! guard.advance().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod file;
pub mod ledger;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use file::{load, save};
pub use ledger::{is_persist_failure, LedgerGuard, PersistRetry, ReferenceLedger};
