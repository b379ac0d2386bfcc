//! Hook input parsing from stdin.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Hook input received from the agent runtime after a tool call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookInput {
    /// The name of the tool that ran (e.g., "Edit", "Write")
    #[serde(default)]
    pub tool_name: String,

    /// Tool-specific input parameters
    #[serde(default)]
    pub tool_input: ToolInput,

    /// Hook event name (e.g., "PostToolUse")
    #[serde(default)]
    pub hook_event_name: Option<String>,

    /// Session ID
    #[serde(default)]
    pub session_id: Option<String>,

    /// Additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Tool input parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolInput {
    /// File path for Edit/Write tools
    #[serde(default)]
    pub file_path: Option<String>,

    /// Additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl HookInput {
    /// Read and parse hook input from stdin.
    pub fn from_stdin() -> anyhow::Result<Self> {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        Self::parse(&input)
    }

    /// Parse hook input from a JSON string.
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        let parsed: HookInput = serde_json::from_str(json)?;
        Ok(parsed)
    }

    /// Get the raw file path if one was supplied.
    pub fn get_file_path(&self) -> Option<&str> {
        self.tool_input
            .file_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
    }

    /// Get the edited file as an absolute path, resolving relative paths
    /// against `cwd`.
    pub fn target_file(&self, cwd: &Path) -> Option<PathBuf> {
        let path = Path::new(self.get_file_path()?);
        if path.is_absolute() {
            Some(path.to_path_buf())
        } else {
            Some(cwd.join(path))
        }
    }
}
