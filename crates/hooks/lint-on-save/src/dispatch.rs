//! Linter execution.
//!
//! Each linter runs as a child process with the project root as its working
//! directory. Failures are returned as outcomes so one linter never stops
//! the next from running.

use crate::config::{CommandTemplate, LinterSpec};
use crate::probe::{AvailableLinter, GRADLE_WRAPPER, Launcher};
use hook_common::subprocess::{CommandResult, CommandRunner, RunError};
use std::path::Path;
use std::time::Duration;

/// What happened when a linter ran against the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintOutcome {
    /// Exit 0, either directly or after the fix pass
    Clean,
    /// Residual failure with diagnostics to surface
    Issues(String),
    /// Nonzero exit with nothing on either stream
    Silent { exit_code: Option<i32> },
    TimedOut(Duration),
    LaunchFailed(String),
}

impl LintOutcome {
    /// Whether the step produced nothing that should block.
    #[cfg(test)]
    pub(crate) fn is_success(&self) -> bool {
        matches!(self, Self::Clean | Self::Silent { .. })
    }

    /// Linter-scoped text for the block reason, if any.
    pub fn failure_message(&self, name: &str) -> Option<String> {
        match self {
            Self::Clean | Self::Silent { .. } => None,
            Self::Issues(text) => Some(format!("{} errors:\n{}", name, text)),
            Self::TimedOut(timeout) => Some(format!(
                "{} timed out after {}s",
                name,
                timeout.as_secs()
            )),
            Self::LaunchFailed(err) => Some(format!("{} could not be started: {}", name, err)),
        }
    }

    fn from_result(result: &CommandResult) -> Self {
        if result.success {
            return Self::Clean;
        }
        let stderr = result.stderr.trim();
        let text = if stderr.is_empty() {
            result.stdout.trim()
        } else {
            stderr
        };
        if text.is_empty() {
            Self::Silent {
                exit_code: result.exit_code,
            }
        } else {
            Self::Issues(text.to_string())
        }
    }

    fn from_error(err: &RunError) -> Self {
        match err {
            RunError::TimedOut { timeout, .. } => Self::TimedOut(*timeout),
            other => Self::LaunchFailed(other.to_string()),
        }
    }
}

/// Runs available linters for one project.
pub struct Dispatcher<'r, R: CommandRunner> {
    runner: &'r R,
    root: &'r Path,
}

impl<'r, R: CommandRunner> Dispatcher<'r, R> {
    pub fn new(runner: &'r R, root: &'r Path) -> Self {
        Self { runner, root }
    }

    /// Run one linter; the fix command, if declared, only runs after the
    /// check fails.
    pub fn run(&self, linter: &AvailableLinter<'_>, file: &Path) -> LintOutcome {
        let spec = linter.spec;
        let outcome = match self.invoke(linter, &spec.command, file) {
            Ok(result) if result.success => LintOutcome::Clean,
            Ok(result) => match &spec.fix_command {
                Some(fix) => match self.invoke(linter, fix, file) {
                    Ok(fixed) => LintOutcome::from_result(&fixed),
                    Err(err) => LintOutcome::from_error(&err),
                },
                None => LintOutcome::from_result(&result),
            },
            Err(err) => LintOutcome::from_error(&err),
        };

        match &outcome {
            LintOutcome::Silent { exit_code } => eprintln!(
                "Warning: {} exited with status {} and no output",
                spec.name,
                exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string())
            ),
            LintOutcome::LaunchFailed(err) => {
                eprintln!("Warning: {} not available: {}", spec.name, err)
            }
            _ => {}
        }
        outcome
    }

    fn invoke(
        &self,
        linter: &AvailableLinter<'_>,
        template: &CommandTemplate,
        file: &Path,
    ) -> Result<CommandResult, RunError> {
        let argv = build_argv(template, &linter.launcher, file, self.root);
        self.runner.run(&argv, self.root, linter.spec.timeout())
    }
}

/// Expand `template` into an argument vector.
///
/// Tokens are split before substitution so a path containing spaces stays a
/// single argument.
pub fn build_argv(
    template: &CommandTemplate,
    launcher: &Launcher,
    file: &Path,
    root: &Path,
) -> Vec<String> {
    let expanded = template.expand(&file.to_string_lossy(), &gradle_command(launcher, root));
    if *launcher == Launcher::Npx {
        std::iter::once("npx".to_string()).chain(expanded).collect()
    } else {
        expanded
    }
}

fn gradle_command(launcher: &Launcher, root: &Path) -> String {
    if let Launcher::GradleWrapper(path) = launcher {
        return path.to_string_lossy().to_string();
    }
    let wrapper = root.join(GRADLE_WRAPPER);
    if wrapper.is_file() {
        wrapper.to_string_lossy().to_string()
    } else {
        "gradle".to_string()
    }
}

/// Run every linter in order, collecting outcomes.
pub fn run_all<'a, 'spec: 'a, R: CommandRunner>(
    dispatcher: &Dispatcher<'_, R>,
    linters: impl IntoIterator<Item = &'a AvailableLinter<'spec>>,
    file: &Path,
) -> Vec<(&'spec LinterSpec, LintOutcome)> {
    linters
        .into_iter()
        .map(|linter| (linter.spec, dispatcher.run(linter, file)))
        .collect()
}
