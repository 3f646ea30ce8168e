//! Opens a file or URL with the platform's default application.
//!
//! Fire-and-forget: the child is never awaited and a failure to start it
//! is only logged.

use std::ffi::OsStr;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

/// Opens `target` in the default viewer without waiting for it.
pub fn open(target: impl AsRef<OsStr>) {
    let target = target.as_ref();
    let mut command = opener(target);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    match command.spawn() {
        Ok(_child) => debug!(?target, "Viewer launched"),
        Err(e) => warn!(?target, error = %e, "Failed to launch viewer"),
    }
}

#[cfg(target_os = "windows")]
fn opener(target: &OsStr) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(target);
    command
}

#[cfg(target_os = "macos")]
fn opener(target: &OsStr) -> Command {
    let mut command = Command::new("open");
    command.arg(target);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn opener(target: &OsStr) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(target);
    command
}
