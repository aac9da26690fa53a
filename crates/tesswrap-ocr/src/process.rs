use std::env;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tesswrap_core::{Error, Result};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_COMMAND: &str = "tesseract";

/// Captured output of a successful engine run
#[derive(Debug, Default)]
pub struct RunOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl RunOutput {
    /// Stdout as text, falling back to stderr for engines that report there
    pub fn text(&self) -> String {
        let stdout = String::from_utf8_lossy(&self.stdout);
        if stdout.trim().is_empty() {
            String::from_utf8_lossy(&self.stderr).into_owned()
        } else {
            stdout.into_owned()
        }
    }
}

/// Resolve the engine executable.
///
/// An existing path is used as is. A bare name is searched for on `PATH`.
pub fn resolve_program(cmd: Option<&Path>) -> Result<PathBuf> {
    let cmd = cmd.unwrap_or(Path::new(DEFAULT_COMMAND));
    if cmd.is_file() {
        return Ok(cmd.to_path_buf());
    }

    let is_bare_name = cmd.is_relative() && cmd.components().count() == 1;
    if is_bare_name {
        if let Some(found) = search_path(cmd.as_os_str()) {
            return Ok(found);
        }
    }
    tracing::debug!("Tesseract executable not found: {}", cmd.display());
    Err(Error::TesseractNotFound)
}

fn search_path(name: &OsStr) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths).find_map(|dir| {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = candidate.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

/// Build the child command, wrapping it in `nice` on Unix when requested
pub fn command(program: &Path, args: &[OsString], nice: i32) -> Command {
    let mut cmd = if nice != 0 && cfg!(unix) {
        let mut cmd = Command::new("nice");
        cmd.arg("-n").arg(nice.to_string()).arg(program);
        cmd
    } else {
        if nice != 0 {
            tracing::warn!("Process priority is only supported on Unix, ignoring nice={nice}");
        }
        Command::new(program)
    };
    cmd.args(args);
    cmd
}

/// Run `cmd` to completion under an optional deadline and cancellation token.
///
/// The child is killed when the deadline passes, the token fires, or the
/// returned future is dropped.
pub async fn run(
    mut cmd: Command,
    deadline: Option<Duration>,
    cancel: Option<&CancellationToken>,
) -> Result<RunOutput> {
    if cancel.is_some_and(CancellationToken::is_cancelled) {
        return Err(Error::Cancelled);
    }

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::TesseractNotFound,
        _ => Error::Io(e),
    })?;
    let pid = child.id();

    let output = tokio::select! {
        output = child.wait_with_output() => output?,
        _ = expire(deadline) => {
            tracing::warn!("Killing tesseract (pid {pid:?}) after {deadline:?}");
            return Err(Error::Timeout(deadline.unwrap_or_default()));
        }
        _ = cancelled(cancel) => {
            tracing::debug!("Killing tesseract (pid {pid:?}) on cancellation");
            return Err(Error::Cancelled);
        }
    };

    if !output.status.success() {
        return Err(Error::Process {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(RunOutput {
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

async fn expire(deadline: Option<Duration>) {
    match deadline {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending().await,
    }
}

async fn cancelled(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}
