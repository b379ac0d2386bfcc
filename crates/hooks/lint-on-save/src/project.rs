//! Project root discovery.

use crate::config::{LanguageRegistry, LanguageSpec, extension_of};
use std::path::{Component, Path, PathBuf};

/// Files whose presence marks a project root, checked in order.
pub const PROJECT_MARKERS: &[&str] = &[
    "package.json",
    "pyproject.toml",
    "setup.cfg",
    "requirements.txt",
    ".swiftlint.yml",
    "Package.swift",
    "build.gradle",
    "build.gradle.kts",
    "detekt.yml",
    "Cargo.toml",
    "go.mod",
    ".git",
];

/// Find the project root for `file`.
///
/// An existing `hint` directory wins outright. Otherwise the nearest ancestor
/// holding a marker is returned, falling back to the file's own directory.
/// The filesystem root itself is never treated as a project.
pub fn locate(file: &Path, hint: Option<&Path>) -> PathBuf {
    if let Some(hint) = hint.filter(|h| h.is_dir()) {
        return absolute(hint);
    }

    let file = absolute(file);
    let start = file.parent().unwrap_or(Path::new("/")).to_path_buf();

    start
        .ancestors()
        .take_while(|dir| dir.parent().is_some())
        .find(|dir| has_marker(dir))
        .map(Path::to_path_buf)
        .unwrap_or(start)
}

fn has_marker(dir: &Path) -> bool {
    PROJECT_MARKERS
        .iter()
        .any(|marker| dir.join(marker).exists())
}

/// Absolute form of `path` with `.` and `..` folded away lexically.
fn absolute(path: &Path) -> PathBuf {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            other => normalized.push(other),
        }
    }
    normalized
}

/// Everything one invocation knows about the edited file.
#[derive(Debug, Clone)]
pub struct ProjectContext<'a> {
    pub root: PathBuf,
    pub file: PathBuf,
    /// Lowercased extension with its leading dot
    pub extension: Option<String>,
    pub language: Option<&'a LanguageSpec>,
}

impl<'a> ProjectContext<'a> {
    pub fn resolve(file: &Path, hint: Option<&Path>, registry: &'a LanguageRegistry) -> Self {
        let file = absolute(file);
        Self {
            root: locate(&file, hint),
            extension: extension_of(&file),
            language: registry.resolve_path(&file),
            file,
        }
    }
}
