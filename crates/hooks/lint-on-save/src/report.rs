//! Turns probe and lint results into the hook's decision.

use crate::config::LinterSpec;
use crate::dispatch::LintOutcome;
use crate::probe::LinterScan;
use hook_common::output::HookOutput;
use std::fmt::Write as _;
use std::path::Path;

pub const LINT_HINT: &str = "Lint issues need to be fixed. Use the lint-fixer skill for guidance.";
pub const MISSING_HINT: &str = "Install the missing linters, then retry the edit.";

/// Why a run was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Configured linters whose binaries can't be found
    MissingLinters,
    /// Linters ran and left errors behind
    LintFailures,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub reason: String,
    pub hint: &'static str,
}

impl Block {
    /// Missing tooling exits 1; lint failures exit 0 and rely on the JSON
    /// decision alone.
    pub fn exit_code(&self) -> i32 {
        match self.kind {
            BlockKind::MissingLinters => 1,
            BlockKind::LintFailures => 0,
        }
    }

    pub fn to_output(&self) -> HookOutput {
        HookOutput::post_tool_use()
            .block(&self.reason)
            .with_context(self.hint)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Block(Block),
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Block(_) => "block",
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::Allow => "",
            Self::Block(block) => &block.reason,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Allow => 0,
            Self::Block(block) => block.exit_code(),
        }
    }
}

/// Block on missing tooling, if any configured linter can't be launched.
pub fn missing_tools(file: &Path, scan: &LinterScan<'_>) -> Option<Decision> {
    if scan.missing.is_empty() {
        return None;
    }

    let mut reason = format!("Missing linters for {}:", file.display());
    for missing in &scan.missing {
        let _ = write!(reason, "\n- {}: {}", missing.spec.name, missing.install);
        if !missing.spec.docs.is_empty() {
            let _ = write!(reason, "\n  Docs: {}", missing.spec.docs);
        }
    }

    Some(Decision::Block(Block {
        kind: BlockKind::MissingLinters,
        reason,
        hint: MISSING_HINT,
    }))
}

/// Aggregate a run into one decision. Messages keep declaration order.
pub fn report(
    file: &Path,
    scan: &LinterScan<'_>,
    results: &[(&LinterSpec, LintOutcome)],
) -> Decision {
    if let Some(blocked) = missing_tools(file, scan) {
        return blocked;
    }

    let messages: Vec<String> = results
        .iter()
        .filter_map(|(spec, outcome)| outcome.failure_message(&spec.name))
        .collect();

    if messages.is_empty() {
        return Decision::Allow;
    }

    Decision::Block(Block {
        kind: BlockKind::LintFailures,
        reason: format!(
            "Lint issues found in {}:\n{}",
            file.display(),
            messages.join("\n")
        ),
        hint: LINT_HINT,
    })
}
