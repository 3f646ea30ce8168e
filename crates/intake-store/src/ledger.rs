//! # Reference Ledger
//!
//! The in-memory configuration plus the file it was loaded from, guarded by
//! a single mutex so that issuing a reference is one critical section.
//!
//! ## Issuing a Reference
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Critical Section (one at a time)                     │
//! │                                                                         │
//! │  ledger.lock().await                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  guard.reference() ──► "#OO-030"                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  produce document (caller) ── fails ──► drop(guard), counter stays 30  │
//! │       │ ok                                                              │
//! │       ▼                                                                 │
//! │  guard.advance() ──► memory: 31 ──► persist with retry                 │
//! │                                           │                             │
//! │                         ok ◄──────────────┴──────► PersistFailed       │
//! │                                                   (logged, returned,   │
//! │                                                    memory stays 31)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Crash Window
//! The index page reads the in-memory counter. Between a document being
//! written and the advanced counter reaching the disk, a crash makes the
//! next run start from the old counter and re-issue that number once.

use std::path::{Path, PathBuf};
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use intake_core::Configuration;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::file;

// =============================================================================
// Retry Policy
// =============================================================================

/// How hard to try persisting an advanced counter before giving up.
#[derive(Debug, Clone)]
pub struct PersistRetry {
    /// Initial backoff duration.
    pub initial_backoff: Duration,

    /// Maximum backoff duration.
    pub max_backoff: Duration,

    /// Total time budget for all attempts.
    pub max_elapsed: Duration,
}

impl Default for PersistRetry {
    fn default() -> Self {
        PersistRetry {
            initial_backoff: Duration::from_millis(50),
            max_backoff: Duration::from_millis(500),
            max_elapsed: Duration::from_secs(2),
        }
    }
}

impl PersistRetry {
    /// No retries: one attempt only.
    pub fn none() -> Self {
        PersistRetry {
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            max_elapsed: Duration::ZERO,
        }
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_backoff,
            max_interval: self.max_backoff,
            max_elapsed_time: Some(self.max_elapsed),
            ..ExponentialBackoff::default()
        }
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// The process-wide configuration and its file.
pub struct ReferenceLedger {
    path: PathBuf,
    config: Mutex<Configuration>,
    retry: PersistRetry,
}

impl ReferenceLedger {
    /// Loads the configuration at `path`. Advances are persisted back to
    /// the same path.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let config = file::load(&path)?;
        Ok(Self::new(path, config))
    }

    /// Wraps an already loaded configuration.
    pub fn new(path: impl Into<PathBuf>, config: Configuration) -> Self {
        ReferenceLedger {
            path: path.into(),
            config: Mutex::new(config),
            retry: PersistRetry::default(),
        }
    }

    /// Replaces the persist retry policy.
    pub fn with_retry(mut self, retry: PersistRetry) -> Self {
        self.retry = retry;
        self
    }

    /// The file advances are persisted to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the reference the next document will get. Does not mutate.
    pub async fn peek(&self) -> String {
        self.config.lock().await.peek_reference()
    }

    /// Returns a copy of the current configuration.
    pub async fn snapshot(&self) -> Configuration {
        self.config.lock().await.clone()
    }

    /// Enters the critical section.
    ///
    /// Concurrent callers queue here; each sees the counter left by the
    /// previous one.
    pub async fn lock(&self) -> LedgerGuard<'_> {
        LedgerGuard {
            config: self.config.lock().await,
            path: &self.path,
            retry: &self.retry,
        }
    }
}

// =============================================================================
// Guard
// =============================================================================

/// Exclusive access to the counter.
///
/// Dropping the guard without calling [`LedgerGuard::advance`] leaves the
/// counter unchanged.
pub struct LedgerGuard<'a> {
    config: MutexGuard<'a, Configuration>,
    path: &'a Path,
    retry: &'a PersistRetry,
}

impl LedgerGuard<'_> {
    /// The configuration as of entering the critical section.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// The reference to use for the document produced under this guard.
    pub fn reference(&self) -> String {
        self.config.peek_reference()
    }

    /// Advances the counter by one and writes the whole configuration
    /// through to disk.
    ///
    /// The in-memory counter is advanced before persisting and stays
    /// advanced even if every persist attempt fails, so this process never
    /// issues the same number twice. Returns the new counter.
    pub async fn advance(mut self) -> StoreResult<u64> {
        let next = self.config.advanced()?;
        *self.config = next;

        let counter = self.config.sequence.counter;
        persist_with_retry(&self.config, self.path, self.retry).await?;

        info!(
            counter,
            next_reference = %self.config.peek_reference(),
            "Reference counter advanced"
        );
        Ok(counter)
    }
}

async fn persist_with_retry(
    config: &Configuration,
    path: &Path,
    retry: &PersistRetry,
) -> StoreResult<()> {
    let mut backoff = retry.create_backoff();
    let mut attempt = 1u32;

    loop {
        match save_blocking(config.clone(), path.to_path_buf()).await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_retryable() => match backoff.next_backoff() {
                Some(delay) => {
                    warn!(
                        ?path,
                        attempt,
                        ?delay,
                        error = %e,
                        "Persisting reference counter failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    error!(
                        ?path,
                        attempt,
                        counter = config.sequence.counter,
                        error = %e,
                        "Persisting reference counter failed; disk is behind memory"
                    );
                    return Err(e);
                }
            },
            Err(e) => {
                error!(?path, error = %e, "Reference counter could not be serialized");
                return Err(e);
            }
        }
    }
}

/// Runs the synchronous rewrite on the blocking pool so the fsync never
/// stalls a runtime worker.
async fn save_blocking(config: Configuration, path: PathBuf) -> StoreResult<()> {
    let target = path.clone();
    tokio::task::spawn_blocking(move || file::save(&config, &path))
        .await
        .map_err(|e| StoreError::Write {
            path: target,
            source: std::io::Error::new(std::io::ErrorKind::Other, e),
        })?
}

/// Returns true if an error came from persisting, which leaves the disk
/// behind the in-memory counter.
pub fn is_persist_failure(err: &StoreError) -> bool {
    matches!(err, StoreError::Write { .. } | StoreError::Serialize(_))
}
