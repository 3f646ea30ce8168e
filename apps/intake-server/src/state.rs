//! Shared application state handed to every handler.

use std::sync::Arc;

use intake_store::ReferenceLedger;

use crate::document::DocumentBackend;

/// Application state.
///
/// Built once at startup from the loaded configuration; handlers never
/// reach for a global.
#[derive(Clone)]
pub struct AppState {
    /// Configuration and reference counter.
    pub ledger: Arc<ReferenceLedger>,

    /// Fills the document template.
    pub backend: Arc<dyn DocumentBackend>,
}

impl AppState {
    pub fn new(ledger: Arc<ReferenceLedger>, backend: Arc<dyn DocumentBackend>) -> Self {
        AppState { ledger, backend }
    }
}
