//! # Document Backend
//!
//! Fills the fixed template with a [`DocumentFields`] map and writes the
//! result to the output directory.
//!
//! ## pdftk Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  DocumentFields ──► XFDF (escaped) ──► <save_path>/AB-007.xfdf         │
//! │                                                │                        │
//! │                                                ▼                        │
//! │  pdftk formular.pdf fill_form AB-007.xfdf output AB-007.pdf flatten    │
//! │                                                │                        │
//! │                              ┌─────────────────┴───────────┐           │
//! │                              ▼                             ▼           │
//! │                        exit 0: done              spawn error / exit≠0  │
//! │                                                   → DocumentError      │
//! │                                                                         │
//! │  The XFDF file is removed in both cases.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use intake_core::reference::document_file_name;
use intake_core::DocumentFields;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{DocumentError, DocumentResult};

/// Default name of the pdftk executable.
pub const PDFTK_PROGRAM: &str = "pdftk";

/// Produces a filled document from a field map.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Fills `template` with `fields` and writes the result to
    /// `destination`, overwriting an existing file.
    async fn fill(
        &self,
        fields: &DocumentFields,
        template: &Path,
        destination: &Path,
    ) -> DocumentResult<()>;
}

/// Returns `<save_path>/<sanitized reference>.pdf`.
pub fn document_path(save_path: &Path, reference: &str) -> PathBuf {
    save_path.join(document_file_name(reference))
}

// =============================================================================
// pdftk
// =============================================================================

/// Fills PDF forms by running the `pdftk` command line tool.
#[derive(Debug, Clone)]
pub struct PdftkBackend {
    program: String,
}

impl Default for PdftkBackend {
    fn default() -> Self {
        PdftkBackend {
            program: PDFTK_PROGRAM.to_string(),
        }
    }
}

impl PdftkBackend {
    /// Uses a specific executable instead of `pdftk` from `PATH`.
    pub fn with_program(program: impl Into<String>) -> Self {
        PdftkBackend {
            program: program.into(),
        }
    }
}

#[async_trait]
impl DocumentBackend for PdftkBackend {
    async fn fill(
        &self,
        fields: &DocumentFields,
        template: &Path,
        destination: &Path,
    ) -> DocumentResult<()> {
        if tokio::fs::metadata(template).await.is_err() {
            return Err(DocumentError::TemplateMissing {
                path: template.to_path_buf(),
            });
        }

        if let Some(dir) = destination.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| DocumentError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        let xfdf = destination.with_extension("xfdf");
        tokio::fs::write(&xfdf, to_xfdf(fields))
            .await
            .map_err(|source| DocumentError::Io {
                path: xfdf.clone(),
                source,
            })?;

        let output = Command::new(&self.program)
            .arg(template)
            .arg("fill_form")
            .arg(&xfdf)
            .arg("output")
            .arg(destination)
            .arg("flatten")
            .output()
            .await;

        if let Err(e) = tokio::fs::remove_file(&xfdf).await {
            warn!(path = ?xfdf, error = %e, "Failed to remove field data file");
        }

        let output = output.map_err(|source| DocumentError::BackendUnavailable {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(DocumentError::BackendFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(?destination, fields = fields.len(), "Document filled");
        Ok(())
    }
}

/// Serializes a field map as XFDF.
pub fn to_xfdf(fields: &DocumentFields) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <xfdf xmlns=\"http://ns.adobe.com/xfdf/\" xml:space=\"preserve\">\n\
         <fields>\n",
    );
    for (name, value) in fields.iter() {
        xml.push_str(&format!(
            "<field name=\"{}\"><value>{}</value></field>\n",
            escape_xml(name),
            escape_xml(value)
        ));
    }
    xml.push_str("</fields>\n</xfdf>\n");
    xml
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use intake_core::{Configuration, RawSubmission, Submission};

    const CONFIG: &str = r##"
testcenter: { street: "Hauptstr. 1", plz: "12345", city: "Musterstadt", phone: "0123", email: "a@b.de" }
ldnr: { prefix: "#AB-", counter: 7, numlength: 3 }
test: { hersteller: "Smith & Sons <Labs>", pzn: "42" }
server: { host: "127.0.0.1", port: 8080, save_path: "./out" }
"##;

    fn config() -> Configuration {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, CONFIG).unwrap();
        intake_store::load(&path).unwrap()
    }

    fn fields() -> DocumentFields {
        let submission = Submission::parse(RawSubmission {
            fname: "Anna".into(),
            lname: "O'Muster".into(),
            bday: "2010-01-01".into(),
            ..RawSubmission::default()
        })
        .unwrap();
        let now = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        DocumentFields::map(&submission, &config(), "#AB-007", now)
    }

    #[test]
    fn test_document_path_strips_marker() {
        assert_eq!(
            document_path(Path::new("/srv/out"), "#AB-007"),
            PathBuf::from("/srv/out/AB-007.pdf")
        );
    }

    #[test]
    fn test_xfdf_escapes_values() {
        let xml = to_xfdf(&fields());

        assert!(xml.contains("<field name=\"testManufacturer\"><value>Smith &amp; Sons &lt;Labs&gt;</value></field>"));
        assert!(xml.contains("<value>Anna O&apos;Muster</value>"));
        assert!(xml.contains("<field name=\"ldnr\"><value>#AB-007</value></field>"));
        assert_eq!(xml.matches("<field ").count(), fields().len());
    }

    #[tokio::test]
    async fn test_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let err = PdftkBackend::default()
            .fill(
                &fields(),
                &dir.path().join("nope.pdf"),
                &dir.path().join("AB-007.pdf"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DocumentError::TemplateMissing { .. }));
    }

    #[tokio::test]
    async fn test_missing_program_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("formular.pdf");
        std::fs::write(&template, b"%PDF-1.4").unwrap();
        let destination = dir.path().join("out").join("AB-007.pdf");

        let err = PdftkBackend::with_program("intake-no-such-pdftk")
            .fill(&fields(), &template, &destination)
            .await
            .unwrap_err();

        assert!(matches!(err, DocumentError::BackendUnavailable { .. }));
        assert!(!destination.with_extension("xfdf").exists());
        assert!(destination.parent().unwrap().is_dir());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("formular.pdf");
        std::fs::write(&template, b"%PDF-1.4").unwrap();

        let err = PdftkBackend::with_program("false")
            .fill(&fields(), &template, &dir.path().join("AB-007.pdf"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DocumentError::BackendFailed { status: Some(1), .. }
        ));
    }
}
