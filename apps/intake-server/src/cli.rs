//! Command line of the intake server binary.
//!
//! Besides the usual `--config`/`-c`, the single-dash long form `-config`
//! is accepted, so existing launch scripts keep working.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

/// Testing center intake form server.
#[derive(Debug, Parser)]
#[command(name = "intake-server", version, about)]
pub struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "./config.yml")]
    pub config: PathBuf,
}

impl Cli {
    /// Parses the process arguments, exiting with usage on error.
    pub fn from_env() -> Self {
        Cli::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Rewrites `-config` and `-config=<path>` to their double-dash forms.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-config") => OsString::from("--config"),
            Some(s) if s.starts_with("-config=") => OsString::from(format!("-{s}")),
            _ => arg,
        })
        .collect()
}
