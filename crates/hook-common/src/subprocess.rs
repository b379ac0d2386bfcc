//! Subprocess execution utilities.

use std::io;
use std::path::Path;
use std::process::Output;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Result of a command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Exit code (None if killed by signal)
    pub exit_code: Option<i32>,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
}

impl CommandResult {
    /// Create from std::process::Output.
    pub fn from_output(output: &Output) -> Self {
        Self {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        }
    }
}

/// Why a command could not produce a [`CommandResult`].
#[derive(Debug, Error)]
pub enum RunError {
    #[error("empty command line")]
    EmptyCommand,

    #[error("`{program}` not found")]
    NotFound { program: String },

    #[error("`{program}` timed out after {}s", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },

    #[error("failed to run `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Seam for running external programs.
pub trait CommandRunner {
    fn run(&self, argv: &[String], cwd: &Path, timeout: Duration)
    -> Result<CommandResult, RunError>;
}

/// Runs programs as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        argv: &[String],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<CommandResult, RunError> {
        run_argv(argv, cwd, timeout)
    }
}

/// Run a program (no shell) in `cwd`, capturing both output streams.
///
/// The child is killed once `timeout` elapses. A nonzero exit status is
/// returned as a normal result, not an error.
pub fn run_argv(argv: &[String], cwd: &Path, timeout: Duration) -> Result<CommandResult, RunError> {
    let (program, args) = argv.split_first().ok_or(RunError::EmptyCommand)?;

    let handle = duct::cmd(program.as_str(), args)
        .dir(cwd)
        .stdin_null()
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .start()
        .map_err(|source| spawn_error(program, source))?;

    let start = Instant::now();
    loop {
        match handle.try_wait() {
            Ok(Some(output)) => return Ok(CommandResult::from_output(output)),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = handle.kill();
                    return Err(RunError::TimedOut {
                        program: program.clone(),
                        timeout,
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                return Err(RunError::Io {
                    program: program.clone(),
                    source,
                });
            }
        }
    }
}

fn spawn_error(program: &str, source: io::Error) -> RunError {
    if source.kind() == io::ErrorKind::NotFound {
        RunError::NotFound {
            program: program.to_string(),
        }
    } else {
        RunError::Io {
            program: program.to_string(),
            source,
        }
    }
}

/// Check if a command exists in PATH without running it.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}
