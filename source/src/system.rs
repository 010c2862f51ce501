//! Manual source backed by the system `man` command.
//!
//! The page is rendered by `man` with pagers disabled, then passed through
//! `col -b` to drop backspace overstrikes. When `col` is missing or fails the
//! overstrikes are removed in-process instead.

use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use smartman_core::{ManError, Result};
use thiserror::Error;
use tracing::debug;
use wait_timeout::ChildExt;

use crate::ManSource;
use crate::normalize::strip_formatting;

/// Default time allowed for one `man` invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Search path handed to `man` and its helpers.
const MAN_PATH: &str = "/usr/bin:/bin:/usr/local/bin";

/// Resolves manual pages by running `man`.
#[derive(Debug, Clone)]
pub struct SystemManSource {
    timeout: Duration,
    man_binary: Option<PathBuf>,
}

impl Default for SystemManSource {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            man_binary: None,
        }
    }
}

impl SystemManSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Uses `path` instead of looking `man` up on `PATH`.
    pub fn with_man_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.man_binary = Some(path.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn resolve_man_binary(&self) -> Option<PathBuf> {
        self.man_binary.clone().or_else(|| find_executable("man"))
    }
}

impl ManSource for SystemManSource {
    fn fetch(&self, command: &str) -> Result<String> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        if parts.is_empty() {
            return Err(ManError::not_found(command));
        }

        let Some(man) = self.resolve_man_binary() else {
            debug!(command, "No man binary found on PATH");
            return Err(ManError::not_found(command));
        };

        debug!(command = ?parts, man = %man.display(), "Fetching man page");
        let output = match run_captured(&man, &parts, None, self.timeout) {
            Ok(output) => output,
            Err(err) => {
                debug!(command, error = %err, "man invocation failed");
                return Err(ManError::not_found(command));
            }
        };

        if !output.status.success() || output.stdout.trim().is_empty() {
            debug!(
                command,
                exit_code = ?output.status.code(),
                length = output.stdout.len(),
                "man produced no page"
            );
            return Err(ManError::not_found(command));
        }

        Ok(remove_overstrikes(output.stdout, self.timeout))
    }
}

/// Pipes `raw` through `col -b`, falling back to in-process stripping.
fn remove_overstrikes(raw: String, timeout: Duration) -> String {
    let Some(col) = find_executable("col") else {
        debug!("col not found, stripping overstrikes in-process");
        return strip_formatting(&raw);
    };

    match run_captured(&col, &["-b"], Some(raw.clone()), timeout) {
        Ok(output) if output.status.success() => output.stdout,
        Ok(output) => {
            debug!(exit_code = ?output.status.code(), "col -b failed, stripping in-process");
            strip_formatting(&raw)
        }
        Err(err) => {
            debug!(error = %err, "col -b failed, stripping in-process");
            strip_formatting(&raw)
        }
    }
}

#[derive(Debug, Error)]
enum ProcessError {
    #[error("spawn failed: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("wait failed: {0}")]
    Wait(#[source] std::io::Error),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

struct CapturedOutput {
    status: ExitStatus,
    stdout: String,
}

fn run_captured(
    program: &Path,
    args: &[&str],
    stdin: Option<String>,
    timeout: Duration,
) -> std::result::Result<CapturedOutput, ProcessError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in pager_env() {
        command.env(key, value);
    }

    let mut child = command.spawn().map_err(ProcessError::Spawn)?;

    // Feed stdin and drain both pipes on their own threads so a full pipe
    // buffer cannot stall the child.
    let stdin_thread = match (child.stdin.take(), stdin) {
        (Some(mut pipe), Some(input)) => Some(std::thread::spawn(move || {
            if let Err(err) = pipe.write_all(input.as_bytes())
                && err.kind() != ErrorKind::BrokenPipe
            {
                debug!(error = %err, "Failed to write child stdin");
            }
        })),
        _ => None,
    };
    let stdout_thread = child.stdout.take().map(drain_pipe);
    let stderr_thread = child.stderr.take().map(drain_pipe);

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ProcessError::Timeout(timeout));
        }
        Err(err) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ProcessError::Wait(err));
        }
    };

    if let Some(handle) = stdin_thread {
        let _ = handle.join();
    }
    let stdout = join_pipe(stdout_thread);
    let stderr = String::from_utf8_lossy(&join_pipe(stderr_thread)).into_owned();
    if !stderr.trim().is_empty() {
        debug!(program = %program.display(), stderr = %stderr.trim(), "Child wrote to stderr");
    }

    Ok(CapturedOutput {
        status,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
    })
}

fn drain_pipe<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(err) = pipe.read_to_end(&mut buf) {
            debug!(error = %err, "Failed to read child output");
        }
        buf
    })
}

fn join_pipe(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|thread| thread.join().ok())
        .unwrap_or_default()
}

fn pager_env() -> Vec<(&'static str, &'static str)> {
    vec![
        ("MANPAGER", "cat"),
        ("PAGER", "cat"),
        ("PATH", MAN_PATH),
        ("TERM", "dumb"),
        ("NO_COLOR", "1"),
        // Ask groff for classic overstrikes instead of SGR escapes.
        ("GROFF_NO_SGR", "1"),
    ]
}

/// Looks `name` up on the caller's `PATH`, then on the fixed man path.
fn find_executable(name: &str) -> Option<PathBuf> {
    let caller_path = std::env::var_os("PATH").unwrap_or_default();
    std::env::split_paths(&caller_path)
        .chain(std::env::split_paths(MAN_PATH))
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command_is_not_found() {
        let source = SystemManSource::new();
        assert_eq!(source.fetch("   "), Err(ManError::not_found("   ")));
    }

    #[test]
    fn test_missing_man_binary_is_not_found() {
        let source = SystemManSource::new().with_man_binary("/nonexistent/bin/man");
        assert_eq!(source.fetch("ls"), Err(ManError::not_found("ls")));
    }

    #[test]
    fn test_builder_sets_timeout() {
        let source = SystemManSource::new().with_timeout(Duration::from_millis(250));
        assert_eq!(source.timeout(), Duration::from_millis(250));
        assert_eq!(SystemManSource::new().timeout(), DEFAULT_TIMEOUT);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_is_not_found() {
        let Some(false_bin) = find_executable("false") else {
            return;
        };
        let source = SystemManSource::new().with_man_binary(false_bin);
        assert_eq!(source.fetch("ls"), Err(ManError::not_found("ls")));
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_program_times_out() {
        let Some(sleep_bin) = find_executable("sleep") else {
            return;
        };
        let source = SystemManSource::new()
            .with_man_binary(sleep_bin)
            .with_timeout(Duration::from_millis(100));
        // `sleep 5` stands in for a hung man invocation.
        assert_eq!(source.fetch("5"), Err(ManError::not_found("5")));
    }

    #[cfg(unix)]
    #[test]
    fn test_echo_output_is_returned() {
        let Some(echo_bin) = find_executable("echo") else {
            return;
        };
        let source = SystemManSource::new().with_man_binary(echo_bin);
        let text = source.fetch("NAME").unwrap();
        assert_eq!(text.trim(), "NAME");
    }
}
