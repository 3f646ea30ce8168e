//! # Configuration File
//!
//! Loading and persisting the single YAML configuration document.
//!
//! ## Load
//! ```text
//! path ──► metadata ──┬── missing ──────► NotFound
//!                     ├── directory ────► IsDirectory
//!                     └── file ──► read ──► parse YAML ──► validate
//!                                             │              │
//!                                             ▼              ▼
//!                                           Parse         Invalid
//! ```
//!
//! No partial or default configuration is ever synthesized.
//!
//! ## Persist
//! Every persist is a full-document rewrite. The YAML is written to a
//! sibling temp file, flushed to disk and renamed over the original, so a
//! crash leaves either the old or the new document, never half of one.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use intake_core::{Configuration, CoreError};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// Loads and validates the configuration at `path`.
pub fn load(path: &Path) -> StoreResult<Configuration> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StoreError::NotFound {
            path: path.to_path_buf(),
        },
        _ => StoreError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if metadata.is_dir() {
        return Err(StoreError::IsDirectory {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path).map_err(|e| StoreError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Configuration =
        serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    config.validate().map_err(|e| StoreError::Invalid {
        path: path.to_path_buf(),
        message: match e {
            CoreError::InvalidConfig(message) => message,
            other => other.to_string(),
        },
    })?;

    info!(
        ?path,
        reference = %config.peek_reference(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Persists the complete configuration to `path`.
pub fn save(config: &Configuration, path: &Path) -> StoreResult<()> {
    let contents = serde_yaml::to_string(config)?;

    let temp = temp_path(path);
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(&temp).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);

    if let Err(e) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(write_err(e));
    }

    debug!(?path, counter = config.sequence.counter, "Configuration saved");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "config.yml".into());
    name.push(".tmp");
    path.with_file_name(name)
}
