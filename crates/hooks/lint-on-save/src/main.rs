//! Post-tool hook: lint the file an Edit or Write just touched.
//!
//! Runs the linters the project configures for the file's language,
//! auto-fixing where the linter supports it, and blocks with remediation
//! text when tooling is missing or errors remain.

use anyhow::Result;
use hook_common::prelude::*;
use lint_on_save::{ConfigSource, Decision, HOOK_NAME, HookEnv, LanguageRegistry, PathLocator};

fn main() -> Result<()> {
    let input = HookInput::from_stdin().context("Invalid JSON input")?;

    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let Some(file) = input.target_file(&cwd) else {
        return Ok(());
    };
    if !file.exists() {
        return Ok(());
    }

    let registry = LanguageRegistry::load(&ConfigSource::from_env())?;
    let env = HookEnv::from_env();

    let eval = lint_on_save::evaluate(&file, &env, &registry, &PathLocator, &SystemRunner);

    let mut log = HookDebugLog::new(HOOK_NAME, &eval.context.file)
        .with_language(eval.context.language.map(|l| l.id.as_str()))
        .with_decision(eval.decision.label(), eval.decision.reason());
    if let Decision::Block(block) = &eval.decision {
        log = log.with_context(block.hint);
    }
    if let Err(e) = log.write(&eval.context.root) {
        eprintln!("Warning: Failed to write hook debug log: {}", e);
    }

    if let Decision::Block(block) = &eval.decision {
        block.to_output().write_stdout()?;
        if block.exit_code() != 0 {
            std::process::exit(block.exit_code());
        }
    }

    Ok(())
}
