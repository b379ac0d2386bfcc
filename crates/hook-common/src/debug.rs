//! Debug logging for hooks.
//!
//! Appends hook decisions to a JSONL file under the project so a block (or a
//! silent pass) can be traced after the fact.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Debug log entry for hook execution
#[derive(Debug, Serialize)]
pub struct HookDebugLog {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Hook name (e.g., "lint-on-save")
    pub hook_name: String,
    /// File the hook ran against
    pub target: String,
    /// Detected language, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Decision made (allow/block)
    pub decision: String,
    /// Reason for the decision
    pub reason: String,
    /// Additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl HookDebugLog {
    pub fn new(hook_name: &str, target: &Path) -> Self {
        Self {
            timestamp: Utc::now(),
            hook_name: hook_name.to_string(),
            target: target.display().to_string(),
            language: None,
            decision: String::new(),
            reason: String::new(),
            context: None,
        }
    }

    pub fn with_language(mut self, language: Option<&str>) -> Self {
        self.language = language.map(str::to_string);
        self
    }

    pub fn with_decision(mut self, decision: &str, reason: &str) -> Self {
        self.decision = decision.to_string();
        // Keep entries readable when a linter dumps a full report
        self.reason = truncate(reason, 2000);
        self
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(context.to_string());
        self
    }

    /// Append the entry to the project's debug log if debugging is enabled.
    pub fn write(&self, project_dir: &Path) -> std::io::Result<()> {
        if !is_debug_enabled(project_dir) {
            return Ok(());
        }

        let log_path = debug_log_path(project_dir);

        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let json = serde_json::to_string(self).unwrap_or_default();
        writeln!(file, "{}", json)?;

        Ok(())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Check if debug mode is enabled
pub fn is_debug_enabled(project_dir: &Path) -> bool {
    if std::env::var_os("CLAUDE_HOOK_DEBUG").is_some() {
        return true;
    }

    project_dir.join(".claude").join(".hook-debug").exists()
}

/// Get debug log file path
pub fn debug_log_path(project_dir: &Path) -> PathBuf {
    project_dir
        .join(".claude")
        .join("logs")
        .join("hook-debug.jsonl")
}
