//! Shared fixtures for the server integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use intake_core::config::TimeoutSettings;
use intake_core::DocumentFields;
use intake_server::{router, AppState, DocumentBackend, DocumentError, DocumentResult};
use intake_store::{PersistRetry, ReferenceLedger};

pub const REFERER: &str = "http://localhost:8080/";

/// Writes a configuration with the given counter whose documents go to
/// `<dir>/out`, and returns its path.
pub fn write_config(dir: &Path, counter: u64) -> PathBuf {
    let out = dir.join("out");
    std::fs::create_dir_all(&out).unwrap();

    let yaml = format!(
        r##"tester:
  name: "Max Prüfer"
testcenter:
  street: "Hauptstr. 1"
  plz: "12345"
  city: "Musterstadt"
  phone: "0123 456789"
  email: "test@example.org"
ldnr:
  prefix: "#OO-"
  counter: {counter}
  numlength: 3
test:
  hersteller: "ACME Diagnostics"
  pzn: "12345678"
  ref: "REF-1"
server:
  host: "127.0.0.1"
  port: 0
  save_path: "{out}"
  launch_viewer: false
  timeout:
    server: 5
    read: 5
    write: 5
    idle: 5
"##,
        counter = counter,
        out = out.display()
    );

    let path = dir.join("config.yml");
    std::fs::write(&path, yaml).unwrap();
    path
}

/// Writes the issued reference into the destination instead of a PDF.
#[derive(Default)]
pub struct RecordingBackend {
    pub issued: Mutex<Vec<String>>,
}

#[async_trait]
impl DocumentBackend for RecordingBackend {
    async fn fill(
        &self,
        fields: &DocumentFields,
        _template: &Path,
        destination: &Path,
    ) -> DocumentResult<()> {
        let reference = fields.get("ldnr").unwrap_or_default().to_string();
        tokio::fs::write(destination, &reference)
            .await
            .map_err(|source| DocumentError::Io {
                path: destination.to_path_buf(),
                source,
            })?;
        self.issued.lock().unwrap().push(reference);
        Ok(())
    }
}

/// Always fails like a crashed pdftk.
pub struct FailingBackend;

#[async_trait]
impl DocumentBackend for FailingBackend {
    async fn fill(
        &self,
        _fields: &DocumentFields,
        _template: &Path,
        _destination: &Path,
    ) -> DocumentResult<()> {
        Err(DocumentError::BackendFailed {
            status: Some(1),
            stderr: "Error: Failed to open form data file".into(),
        })
    }
}

/// Takes `delay` before writing the document, like a pdftk run on a busy
/// machine.
pub struct SlowBackend {
    pub delay: Duration,
    pub inner: RecordingBackend,
}

#[async_trait]
impl DocumentBackend for SlowBackend {
    async fn fill(
        &self,
        fields: &DocumentFields,
        template: &Path,
        destination: &Path,
    ) -> DocumentResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.fill(fields, template, destination).await
    }
}

pub fn app(
    ledger: ReferenceLedger,
    backend: Arc<dyn DocumentBackend>,
) -> (Router, Arc<ReferenceLedger>) {
    app_with_timeouts(ledger, backend, TimeoutSettings::default())
}

pub fn app_with_timeouts(
    ledger: ReferenceLedger,
    backend: Arc<dyn DocumentBackend>,
    timeouts: TimeoutSettings,
) -> (Router, Arc<ReferenceLedger>) {
    let ledger = Arc::new(ledger.with_retry(PersistRetry::none()));
    let app = router(AppState::new(ledger.clone(), backend), timeouts);
    (app, ledger)
}

pub fn submit(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/fillform")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::REFERER, REFERER)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub const VALID_FORM: &str =
    "fname=Anna&lname=Muster&street=Weg+2&zip=54321&city=Dorf&bday=2010-01-01&ldnr=%23OO-030";

/// File names in the output directory, sorted.
pub fn documents(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.join("out"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
