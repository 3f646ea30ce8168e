//! # intake-core: Pure Logic for the Test Center Intake Tool
//!
//! This crate is the **heart** of the intake tool. It contains the rules that
//! turn a submitted form into a filled document as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Intake Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser (operator terminal)                  │   │
//! │  │          GET / (form) ──► POST /fillform (submission)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    intake-server (axum)                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ intake-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  config   │  │    age    │  │ reference │  │  fields   │  │   │
//! │  │   │ Settings  │  │ 18+ rule  │  │ #OO-030   │  │ slot map  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO FILES • PURE FUNCTIONS                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              intake-store (config.yml + counter)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration data model (test center, sequence, server)
//! - [`age`] - "Has the birthday occurred yet" age rule
//! - [`reference`] - Reference number (Ldnr) formatting and sanitizing
//! - [`submission`] - Parsing the raw form into a typed submission
//! - [`fields`] - Mapping a submission onto the document template slots
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use intake_core::config::SequenceSettings;
//!
//! let sequence = SequenceSettings {
//!     prefix: "#OO-".to_string(),
//!     counter: 30,
//!     num_length: 3,
//! };
//!
//! assert_eq!(sequence.peek(), "#OO-030");
//! assert_eq!(sequence.advanced().unwrap().counter, 31);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod age;
pub mod config;
pub mod error;
pub mod fields;
pub mod reference;
pub mod submission;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::Configuration;
pub use error::{CoreError, CoreResult, SubmissionError};
pub use fields::DocumentFields;
pub use submission::{RawSubmission, Submission};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Age at which the tested person signs for themselves.
pub const ADULT_AGE: u32 = 18;

/// Title shown on the intake page.
pub const PAGE_TITLE: &str = "Datenerfassung - Coronatest";

/// File extension of generated documents.
pub const DOCUMENT_EXTENSION: &str = "pdf";
