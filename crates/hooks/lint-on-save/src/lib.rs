//! Post-edit lint hook.
//!
//! Resolves the edited file's language and project root, checks which of
//! the language's linters the project configures and whether they can be
//! launched, runs them in declaration order, and folds the results into a
//! single allow/block decision for the host.

pub mod config;
pub mod dispatch;
pub mod probe;
pub mod project;
pub mod report;

use hook_common::subprocess::CommandRunner;
use std::path::{Path, PathBuf};

pub use config::{ConfigSource, LanguageRegistry, LanguageSpec, LinterSpec};
pub use dispatch::{Dispatcher, LintOutcome};
pub use probe::{LinterScan, PathLocator, ToolLocator};
pub use project::ProjectContext;
pub use report::{Block, BlockKind, Decision};

pub const HOOK_NAME: &str = "lint-on-save";

/// Process environment the hook reads.
#[derive(Debug, Clone, Default)]
pub struct HookEnv {
    /// `CLAUDE_PROJECT_DIR`; only honored when it names an existing directory
    pub project_dir: Option<PathBuf>,
}

impl HookEnv {
    pub fn from_env() -> Self {
        Self {
            project_dir: std::env::var_os("CLAUDE_PROJECT_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Full result of one evaluation, kept for logging.
#[derive(Debug)]
pub struct Evaluation<'a> {
    pub context: ProjectContext<'a>,
    pub decision: Decision,
}

/// Lint `file` and decide whether the host should block.
///
/// Unsupported files and projects without configured linters are allowed.
/// Missing tooling blocks before any linter is spawned.
pub fn evaluate<'a, R: CommandRunner>(
    file: &Path,
    env: &HookEnv,
    registry: &'a LanguageRegistry,
    tools: &impl ToolLocator,
    runner: &R,
) -> Evaluation<'a> {
    let context = ProjectContext::resolve(file, env.project_dir.as_deref(), registry);

    let Some(language) = context.language else {
        return Evaluation {
            context,
            decision: Decision::Allow,
        };
    };

    let scan = probe::scan(&context.root, language, tools);
    if scan.configured.is_empty() {
        return Evaluation {
            context,
            decision: Decision::Allow,
        };
    }
    if let Some(blocked) = report::missing_tools(&context.file, &scan) {
        return Evaluation {
            context,
            decision: blocked,
        };
    }

    let extension = context.extension.as_deref();
    let dispatcher = Dispatcher::new(runner, &context.root);
    let results = dispatch::run_all(
        &dispatcher,
        scan.available
            .iter()
            .filter(|linter| linter.spec.applies_to(extension)),
        &context.file,
    );

    let decision = report::report(&context.file, &scan, &results);
    Evaluation { context, decision }
}
