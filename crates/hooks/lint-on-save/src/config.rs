//! Static linter table: languages, the extensions they claim, and the
//! linters each one may run.

use camino::Utf8PathBuf;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

/// Linter table compiled into the binary.
pub const BUILTIN_CONFIG: &str = include_str!("../config/linters.json");

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Placeholders a command template may use.
pub const PLACEHOLDERS: &[&str] = &["file", "gradle"];

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is valid"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read linter config {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse linter config {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid linter config {origin}: {message}")]
    Invalid { origin: String, message: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("command template is empty")]
    Empty,

    #[error("unknown placeholder `{{{placeholder}}}` in `{template}`")]
    UnknownPlaceholder {
        placeholder: String,
        template: String,
    },

    #[error("`{0}` has no `{{file}}` placeholder")]
    MissingFile(String),
}

/// A command line with `{file}` and optional `{gradle}` placeholders,
/// checked when the config is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct CommandTemplate(String);

impl TryFrom<String> for CommandTemplate {
    type Error = TemplateError;

    fn try_from(template: String) -> Result<Self, Self::Error> {
        if template.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut has_file = false;
        for caps in PLACEHOLDER_RE.captures_iter(&template) {
            let name = &caps[1];
            if !PLACEHOLDERS.contains(&name) {
                return Err(TemplateError::UnknownPlaceholder {
                    placeholder: name.to_string(),
                    template: template.clone(),
                });
            }
            has_file |= name == "file";
        }

        if !has_file {
            return Err(TemplateError::MissingFile(template));
        }
        Ok(Self(template))
    }
}

impl CommandTemplate {
    /// Split on whitespace, then fill placeholders in each token.
    ///
    /// Substitution is a single pass, so placeholder text inside `file` or
    /// `gradle` is left alone.
    pub fn expand(&self, file: &str, gradle: &str) -> Vec<String> {
        self.0
            .split_whitespace()
            .map(|token| {
                PLACEHOLDER_RE
                    .replace_all(token, |caps: &Captures<'_>| match &caps[1] {
                        "file" => file.to_string(),
                        "gradle" => gradle.to_string(),
                        _ => caps[0].to_string(),
                    })
                    .into_owned()
            })
            .collect()
    }

    pub fn uses_gradle(&self) -> bool {
        self.0.contains("{gradle}")
    }
}

/// One linter or formatter a language may run.
#[derive(Debug, Clone, Deserialize)]
pub struct LinterSpec {
    /// Display name used in messages
    pub name: String,

    /// Primary invocation
    pub command: CommandTemplate,

    /// Run only when `command` fails; its residual failure is what gets reported
    #[serde(default)]
    pub fix_command: Option<CommandTemplate>,

    /// Files in the project root that mean "this linter is configured"
    #[serde(default)]
    pub config_files: Vec<String>,

    /// Executable probed on PATH
    pub binary: String,

    /// Launchable through `npx` when the binary itself is not on PATH
    #[serde(default)]
    pub npx: bool,

    /// Package manager key -> package name
    #[serde(default)]
    pub install: BTreeMap<String, String>,

    #[serde(default)]
    pub docs: String,

    #[serde(rename = "timeout", default = "default_timeout")]
    pub timeout_secs: u64,

    /// Restricts the linter to these extensions within its language
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl LinterSpec {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn uses_gradle(&self) -> bool {
        self.command.uses_gradle()
            || self
                .fix_command
                .as_ref()
                .is_some_and(CommandTemplate::uses_gradle)
    }

    /// Whether the extension allow-list, if any, admits `extension`.
    pub fn applies_to(&self, extension: Option<&str>) -> bool {
        match (&self.extensions, extension) {
            (None, _) => true,
            (Some(allowed), Some(ext)) => allowed.iter().any(|a| a == ext),
            (Some(_), None) => false,
        }
    }
}

/// A language and the linters declared for it, in declaration order.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageSpec {
    pub id: String,
    pub extensions: Vec<String>,
    #[serde(default)]
    pub linters: Vec<LinterSpec>,
}

#[derive(Debug, Deserialize)]
struct LinterConfig {
    languages: Vec<LanguageSpec>,
}

/// Where the linter table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(Utf8PathBuf),
    Builtin,
}

impl ConfigSource {
    /// `LINT_ON_SAVE_CONFIG`, then `$CLAUDE_PLUGIN_ROOT/config/linters.json`,
    /// then the built-in table.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("LINT_ON_SAVE_CONFIG").ok(),
            std::env::var("CLAUDE_PLUGIN_ROOT").ok(),
        )
    }

    pub fn from_vars(explicit: Option<String>, plugin_root: Option<String>) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        if let Some(path) = non_empty(explicit) {
            return Self::File(Utf8PathBuf::from(path));
        }
        if let Some(root) = non_empty(plugin_root) {
            return Self::File(Utf8PathBuf::from(root).join("config").join("linters.json"));
        }
        Self::Builtin
    }
}

/// Extension-to-language lookup over the validated linter table.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<LanguageSpec>,
}

impl LanguageRegistry {
    pub fn load(source: &ConfigSource) -> Result<Self, ConfigError> {
        match source {
            ConfigSource::Builtin => Self::from_json(BUILTIN_CONFIG, "<builtin>"),
            ConfigSource::File(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                Self::from_json(&json, path.as_str())
            }
        }
    }

    pub fn builtin() -> Result<Self, ConfigError> {
        Self::load(&ConfigSource::Builtin)
    }

    pub fn from_json(json: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: LinterConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse {
                origin: origin.to_string(),
                source,
            })?;

        let invalid = |message: String| ConfigError::Invalid {
            origin: origin.to_string(),
            message,
        };

        let mut seen_ids = HashSet::new();
        let mut languages = config.languages;
        for language in &mut languages {
            if language.id.trim().is_empty() {
                return Err(invalid("language with empty id".to_string()));
            }
            if !seen_ids.insert(language.id.clone()) {
                return Err(invalid(format!("duplicate language `{}`", language.id)));
            }
            language.extensions = normalize_extensions(&language.extensions);

            for linter in &mut language.linters {
                if linter.name.trim().is_empty() || linter.binary.trim().is_empty() {
                    return Err(invalid(format!(
                        "linter under `{}` needs a name and a binary",
                        language.id
                    )));
                }
                if linter.timeout_secs == 0 {
                    return Err(invalid(format!("{} has a zero timeout", linter.name)));
                }
                if let Some(exts) = &linter.extensions {
                    linter.extensions = Some(normalize_extensions(exts));
                }
            }
        }

        Ok(Self { languages })
    }

    /// Look up a language by extension (".py", case-insensitive).
    /// Earlier languages win when two claim the same extension.
    pub fn resolve(&self, extension: &str) -> Option<&LanguageSpec> {
        let ext = normalize_extension(extension);
        self.languages
            .iter()
            .find(|lang| lang.extensions.iter().any(|e| *e == ext))
    }

    pub fn resolve_path(&self, path: &Path) -> Option<&LanguageSpec> {
        self.resolve(&extension_of(path)?)
    }

    #[cfg(test)]
    pub(crate) fn languages(&self) -> &[LanguageSpec] {
        &self.languages
    }
}

/// Lowercased extension of `path` with its leading dot.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

fn normalize_extensions(exts: &[String]) -> Vec<String> {
    exts.iter().map(|e| normalize_extension(e)).collect()
}
