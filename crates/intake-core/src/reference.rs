//! # Reference Numbers (Ldnr)
//!
//! Formatting, advancing and sanitizing of the running reference number.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Reference Number Lifecycle                         │
//! │                                                                         │
//! │  counter = 30, prefix = "#OO-", numlength = 3                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  peek() ─────────────► "#OO-030"     (shown on the form, no mutation)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  document produced?  ── no ──► counter stays 30                        │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  advanced() ─────────► counter = 31  (persisted by intake-store)       │
//! │                                                                         │
//! │  file name: document_file_name("#OO-030") = "OO-030.pdf"               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::config::{Configuration, SequenceSettings};
use crate::error::{CoreError, CoreResult};
use crate::DOCUMENT_EXTENSION;

/// Formats `prefix + counter`, zero-padding the counter to `width` digits.
///
/// The width is a minimum: a counter with more digits is emitted in full.
///
/// ## Example
/// ```rust
/// use intake_core::reference::format_reference;
///
/// assert_eq!(format_reference("#OO-", 7, 3), "#OO-007");
/// assert_eq!(format_reference("#OO-", 12345, 3), "#OO-12345");
/// ```
pub fn format_reference(prefix: &str, counter: u64, width: usize) -> String {
    format!("{}{:0width$}", prefix, counter, width = width)
}

/// Strips decorative characters from a reference so it can name a file.
///
/// `#` and whitespace are trimmed from both ends; path separators are
/// replaced so a reference can never leave the output directory.
pub fn sanitize(reference: &str) -> String {
    reference
        .trim_matches(|c: char| c == '#' || c.is_whitespace())
        .replace(['/', '\\'], "_")
}

/// Returns the output file name for a reference, e.g. `"OO-030.pdf"`.
pub fn document_file_name(reference: &str) -> String {
    format!("{}.{}", sanitize(reference), DOCUMENT_EXTENSION)
}

impl SequenceSettings {
    /// Returns the reference the next document will get. Does not mutate.
    pub fn peek(&self) -> String {
        format_reference(&self.prefix, self.counter, self.num_length)
    }

    /// Returns a copy with the counter advanced by exactly one.
    pub fn advanced(&self) -> CoreResult<SequenceSettings> {
        let counter = self
            .counter
            .checked_add(1)
            .ok_or(CoreError::CounterExhausted {
                counter: self.counter,
            })?;

        Ok(SequenceSettings {
            counter,
            ..self.clone()
        })
    }
}

impl Configuration {
    /// Returns the reference the next document will get.
    pub fn peek_reference(&self) -> String {
        self.sequence.peek()
    }

    /// Returns the complete configuration with the counter advanced by one.
    ///
    /// The whole document is returned because persisting is a full rewrite.
    pub fn advanced(&self) -> CoreResult<Configuration> {
        Ok(Configuration {
            sequence: self.sequence.advanced()?,
            ..self.clone()
        })
    }
}
