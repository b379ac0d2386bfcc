//! Common utilities for Claude Code hooks.
//!
//! This crate provides shared functionality for Rust-based hooks:
//! - JSON input/output parsing
//! - Subprocess execution with timeouts
//! - PATH probing
//! - Debug logging

pub mod debug;
pub mod input;
pub mod output;
pub mod subprocess;

pub use debug::{HookDebugLog, is_debug_enabled};
pub use input::{HookInput, ToolInput};
pub use output::{Decision, HookOutput};
pub use subprocess::{CommandResult, CommandRunner, RunError, SystemRunner, command_exists};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::debug::{HookDebugLog, is_debug_enabled};
    pub use crate::input::{HookInput, ToolInput};
    pub use crate::output::HookOutput;
    pub use crate::subprocess::{CommandResult, CommandRunner, RunError, SystemRunner};
    pub use anyhow::{Context, Result};
    pub use serde::{Deserialize, Serialize};
}
