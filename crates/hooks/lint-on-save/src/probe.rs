//! Linter availability: which linters the project configures, and which of
//! those can actually be launched.

use crate::config::{LanguageSpec, LinterSpec};
use hook_common::subprocess::command_exists;
use std::path::{Path, PathBuf};

/// Seam for PATH lookups.
pub trait ToolLocator {
    fn has(&self, binary: &str) -> bool;
}

/// Looks executables up on the real PATH.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLocator;

impl ToolLocator for PathLocator {
    fn has(&self, binary: &str) -> bool {
        command_exists(binary)
    }
}

/// How an available linter gets launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
    /// Binary found on PATH
    Direct,
    /// Run through `npx`
    Npx,
    /// `{gradle}` resolves to the project's wrapper script
    GradleWrapper(PathBuf),
}

#[derive(Debug, Clone)]
pub struct AvailableLinter<'a> {
    pub spec: &'a LinterSpec,
    pub launcher: Launcher,
}

#[derive(Debug, Clone)]
pub struct MissingLinter<'a> {
    pub spec: &'a LinterSpec,
    pub install: String,
}

/// Probe result, each list in declaration order.
#[derive(Debug, Clone, Default)]
pub struct LinterScan<'a> {
    pub configured: Vec<&'a LinterSpec>,
    pub available: Vec<AvailableLinter<'a>>,
    pub missing: Vec<MissingLinter<'a>>,
}

#[cfg(test)]
impl LinterScan<'_> {
    pub(crate) fn is_configured(&self, name: &str) -> bool {
        self.configured.iter().any(|l| l.name == name)
    }

    pub(crate) fn is_missing(&self, name: &str) -> bool {
        self.missing.iter().any(|m| m.spec.name == name)
    }
}

struct PackageManager {
    key: &'static str,
    template: &'static str,
    /// Launcher that must be on PATH for the suggestion to be usable
    requires: Option<&'static str>,
}

/// Install suggestions, highest priority first.
const PACKAGE_MANAGERS: &[PackageManager] = &[
    PackageManager {
        key: "npm",
        template: "npm install --save-dev {package}",
        requires: None,
    },
    PackageManager {
        key: "pip",
        template: "pip install {package}",
        requires: None,
    },
    PackageManager {
        key: "brew",
        template: "brew install {package}",
        requires: Some("brew"),
    },
    PackageManager {
        key: "rustup",
        template: "rustup component add {package}",
        requires: Some("rustup"),
    },
    PackageManager {
        key: "cargo",
        template: "cargo install {package}",
        requires: Some("cargo"),
    },
    PackageManager {
        key: "go",
        template: "go install {package}",
        requires: Some("go"),
    },
];

pub const GRADLE_WRAPPER: &str = "gradlew";

/// A linter is configured when one of its config files sits directly in
/// the project root.
pub fn is_configured(root: &Path, linter: &LinterSpec) -> bool {
    linter
        .config_files
        .iter()
        .any(|name| root.join(name).exists())
}

/// Decide how `linter` would be launched, or `None` if it can't be.
pub fn launcher_for(
    root: &Path,
    linter: &LinterSpec,
    tools: &impl ToolLocator,
) -> Option<Launcher> {
    if linter.uses_gradle() {
        let wrapper = root.join(GRADLE_WRAPPER);
        if wrapper.is_file() {
            return Some(Launcher::GradleWrapper(wrapper));
        }
    }
    if tools.has(&linter.binary) {
        return Some(Launcher::Direct);
    }
    if linter.npx && tools.has("npx") {
        return Some(Launcher::Npx);
    }
    None
}

/// Install command for a missing linter.
pub fn install_command(linter: &LinterSpec, tools: &impl ToolLocator) -> String {
    PACKAGE_MANAGERS
        .iter()
        .filter(|pm| pm.requires.is_none_or(|launcher| tools.has(launcher)))
        .find_map(|pm| {
            linter
                .install
                .get(pm.key)
                .map(|package| pm.template.replace("{package}", package))
        })
        .unwrap_or_else(|| format!("Install {} manually (see {})", linter.name, linter.docs))
}

/// Sort the language's linters into configured, available and missing.
/// Nothing here executes a linter.
pub fn scan<'a>(
    root: &Path,
    language: &'a LanguageSpec,
    tools: &impl ToolLocator,
) -> LinterScan<'a> {
    let mut result = LinterScan::default();

    for linter in &language.linters {
        if !is_configured(root, linter) {
            continue;
        }
        result.configured.push(linter);

        match launcher_for(root, linter, tools) {
            Some(launcher) => result.available.push(AvailableLinter {
                spec: linter,
                launcher,
            }),
            None => result.missing.push(MissingLinter {
                spec: linter,
                install: install_command(linter, tools),
            }),
        }
    }

    result
}
