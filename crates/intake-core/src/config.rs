//! # Configuration Data Model
//!
//! The single settings document of the intake tool. Loading and persisting
//! the file is done by `intake-store`; this module only defines the shape
//! and the rules a loaded document must satisfy.
//!
//! ## Configuration File Format
//! ```yaml
//! tester:
//!   name: "Max Prüfer"
//! testcenter:
//!   street: "Hauptstr. 1"
//!   plz: "12345"
//!   city: "Musterstadt"
//!   phone: "0123 456789"
//!   email: "test@example.org"
//! ldnr:
//!   prefix: "#OO-"
//!   counter: 30
//!   numlength: 3
//! test:
//!   hersteller: "ACME Diagnostics"
//!   pzn: "12345678"
//!   ref: "REF-1"
//! server:
//!   host: "127.0.0.1"
//!   port: 8080
//!   save_path: "./out"
//!   timeout:
//!     server: 10
//!     read: 15
//!     write: 15
//!     idle: 5
//! ```
//!
//! The key names follow the documents already in use at the test centers,
//! so the Rust field names are mapped with `#[serde(rename)]` where they
//! differ.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Tester
// =============================================================================

/// The person conducting the tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TesterSettings {
    /// Printed on the document.
    #[serde(default)]
    pub name: String,
}

// =============================================================================
// Test Center
// =============================================================================

/// Address and contact data of the test center (display only).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCenterSettings {
    pub street: String,

    #[serde(rename = "plz")]
    pub postal_code: String,

    pub city: String,

    pub phone: String,

    pub email: String,
}

impl TestCenterSettings {
    /// Returns `"<postal code> <city>"`.
    pub fn postal_code_city(&self) -> String {
        format!("{} {}", self.postal_code, self.city)
    }
}

// =============================================================================
// Reference Sequence
// =============================================================================

/// Settings of the reference number (Ldnr) sequence.
///
/// ## Invariant
/// `counter` only ever grows, by exactly one, and only after a document
/// was produced for the current value. See [`crate::reference`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSettings {
    /// Decorative prefix, e.g. `"#OO-"`.
    pub prefix: String,

    /// The next number to issue.
    pub counter: u64,

    /// Minimum number of digits; shorter numbers are zero-padded.
    #[serde(rename = "numlength")]
    pub num_length: usize,
}

// =============================================================================
// Test Product
// =============================================================================

/// The antigen test product in use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSettings {
    #[serde(rename = "hersteller")]
    pub manufacturer: String,

    /// Pharmazentralnummer of the product.
    pub pzn: String,

    /// Manufacturer reference code.
    #[serde(rename = "ref", default)]
    pub reference_code: String,
}

// =============================================================================
// Server
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Local address to bind the HTTP server to.
    pub host: String,

    /// Local TCP port to bind the HTTP server to.
    pub port: u16,

    /// Directory generated documents are written to.
    pub save_path: PathBuf,

    /// The fillable document template.
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,

    /// Open the intake page at startup and each generated document.
    #[serde(default = "default_true")]
    pub launch_viewer: bool,

    #[serde(default)]
    pub timeout: TimeoutSettings,
}

fn default_template_path() -> PathBuf {
    PathBuf::from("formular.pdf")
}

fn default_true() -> bool {
    true
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the address the operator's browser should open.
    pub fn local_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

/// Timeouts in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutSettings {
    /// Upper bound for the graceful shutdown.
    #[serde(default = "default_server_timeout")]
    pub server: u64,

    /// Upper bound for receiving a request body.
    #[serde(default = "default_read_timeout")]
    pub read: u64,

    /// Upper bound for handling a request and writing the response.
    #[serde(default = "default_write_timeout")]
    pub write: u64,

    /// Keep-alive time of an idle connection.
    #[serde(default = "default_idle_timeout")]
    pub idle: u64,
}

fn default_server_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    15
}

fn default_write_timeout() -> u64 {
    15
}

fn default_idle_timeout() -> u64 {
    5
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        TimeoutSettings {
            server: default_server_timeout(),
            read: default_read_timeout(),
            write: default_write_timeout(),
            idle: default_idle_timeout(),
        }
    }
}

impl TimeoutSettings {
    pub fn shutdown(&self) -> Duration {
        Duration::from_secs(self.server)
    }

    pub fn read(&self) -> Duration {
        Duration::from_secs(self.read)
    }

    pub fn write(&self) -> Duration {
        Duration::from_secs(self.write)
    }

    pub fn idle(&self) -> Duration {
        Duration::from_secs(self.idle)
    }
}

// =============================================================================
// Complete Configuration
// =============================================================================

/// Complete intake configuration.
///
/// One value per process. It is handed to the HTTP service at construction
/// time; there is no global instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub tester: TesterSettings,

    #[serde(rename = "testcenter")]
    pub test_center: TestCenterSettings,

    #[serde(rename = "ldnr")]
    pub sequence: SequenceSettings,

    pub test: TestSettings,

    pub server: ServerSettings,
}

impl Configuration {
    /// Validates rules that deserialization alone cannot express.
    ///
    /// ## Rules
    /// - `ldnr.numlength` must be at least 1
    /// - `server.host` and `server.save_path` must not be empty
    /// - every timeout must be at least one second
    pub fn validate(&self) -> CoreResult<()> {
        if self.sequence.num_length == 0 {
            return Err(CoreError::InvalidConfig(
                "ldnr.numlength must be greater than 0".into(),
            ));
        }

        if self.server.host.trim().is_empty() {
            return Err(CoreError::InvalidConfig("server.host is required".into()));
        }

        if self.server.save_path.as_os_str().is_empty() {
            return Err(CoreError::InvalidConfig(
                "server.save_path is required".into(),
            ));
        }

        let timeouts = [
            ("server", self.server.timeout.server),
            ("read", self.server.timeout.read),
            ("write", self.server.timeout.write),
            ("idle", self.server.timeout.idle),
        ];
        for (name, secs) in timeouts {
            if secs == 0 {
                return Err(CoreError::InvalidConfig(format!(
                    "server.timeout.{} must be at least 1 second",
                    name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
testcenter:
  street: "Hauptstr. 1"
  plz: "12345"
  city: "Musterstadt"
  phone: "0123 456789"
  email: "test@example.org"
ldnr:
  prefix: "#OO-"
  counter: 30
  numlength: 3
test:
  hersteller: "ACME Diagnostics"
  pzn: "12345678"
server:
  host: "127.0.0.1"
  port: 8080
  save_path: "./out"
"##;

    #[test]
    fn test_parses_short_key_names() {
        let config: Configuration = serde_yaml::from_str(SAMPLE).unwrap();

        assert_eq!(config.test_center.postal_code, "12345");
        assert_eq!(config.sequence.prefix, "#OO-");
        assert_eq!(config.sequence.counter, 30);
        assert_eq!(config.sequence.num_length, 3);
        assert_eq!(config.test.manufacturer, "ACME Diagnostics");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_optional_sections_default() {
        let config: Configuration = serde_yaml::from_str(SAMPLE).unwrap();

        assert_eq!(config.tester.name, "");
        assert_eq!(config.test.reference_code, "");
        assert_eq!(config.server.template_path, PathBuf::from("formular.pdf"));
        assert!(config.server.launch_viewer);
        assert_eq!(config.server.timeout, TimeoutSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serializes_back_to_short_keys() {
        let config: Configuration = serde_yaml::from_str(SAMPLE).unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();

        assert!(yaml.contains("testcenter:"));
        assert!(yaml.contains("plz:"));
        assert!(yaml.contains("ldnr:"));
        assert!(yaml.contains("numlength: 3"));
        assert!(yaml.contains("hersteller:"));
    }

    #[test]
    fn test_validation() {
        let mut config: Configuration = serde_yaml::from_str(SAMPLE).unwrap();

        config.sequence.num_length = 0;
        assert!(config.validate().is_err());
        config.sequence.num_length = 3;

        config.server.host = "  ".to_string();
        assert!(config.validate().is_err());
        config.server.host = "0.0.0.0".to_string();

        config.server.timeout.server = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.timeout.server"));
    }

    #[test]
    fn test_addresses() {
        let config: Configuration = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(config.server.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.server.local_url(), "http://localhost:8080");
        assert_eq!(config.test_center.postal_code_city(), "12345 Musterstadt");
    }
}
