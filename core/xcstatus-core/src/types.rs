//! Shared types: the polled status snapshot and its persisted form.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Bundle suffixes Xcode uses for openable projects and workspaces.
pub const PROJECT_BUNDLE_EXTENSIONS: &[&str] = &[".xcworkspace", ".xcodeproj"];

/// An open project as reported by the probe. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectHandle {
    /// Absolute path to the project bundle.
    pub path: PathBuf,
    /// Basename with known bundle suffixes stripped.
    pub name: String,
}

impl ProjectHandle {
    pub fn new(path: PathBuf) -> Self {
        let mut name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        for ext in PROJECT_BUNDLE_EXTENSIONS {
            if let Some(stripped) = name.strip_suffix(ext) {
                name = stripped.to_string();
            }
        }
        Self { path, name }
    }

    /// Name with spaces mapped to underscores. DerivedData directories
    /// use either form depending on Xcode version.
    pub fn normalized_name(&self) -> String {
        self.name.replace(' ', "_")
    }
}

/// Returns true if the path points into a project bundle rather than a
/// plain source file. Used to filter bogus front-document answers.
pub fn is_bundle_path(path: &Path) -> bool {
    let s = path.to_string_lossy();
    PROJECT_BUNDLE_EXTENSIONS.iter().any(|ext| s.contains(ext))
}

/// One full poll result. Recomputed from scratch on every pass; there is
/// no incremental mutation across polls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub xcode_running: bool,
    pub project_name: String,
    pub project_path: String,
    pub current_file: String,
    pub current_file_path: String,
    pub build_errors: u64,
    pub detailed_errors: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

/// The on-disk JSON document. The whole file is replaced on every write;
/// `enabled` is the only field other processes mutate (via `toggle`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusFile {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub xcode_running: bool,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub project_path: String,
    #[serde(default)]
    pub current_file: String,
    #[serde(default)]
    pub current_file_path: String,
    #[serde(default)]
    pub build_errors: u64,
    #[serde(default)]
    pub detailed_errors: Vec<String>,
}

impl Default for StatusFile {
    fn default() -> Self {
        StatusFile {
            enabled: true,
            timestamp: String::new(),
            xcode_running: false,
            project_name: String::new(),
            project_path: String::new(),
            current_file: String::new(),
            current_file_path: String::new(),
            build_errors: 0,
            detailed_errors: Vec::new(),
        }
    }
}

impl StatusFile {
    /// Stamps a snapshot with the current time and the caller-provided
    /// enabled flag (which is owned by the toggle command, not the poll).
    pub fn from_snapshot(snapshot: &StatusSnapshot, enabled: bool) -> Self {
        StatusFile {
            enabled,
            timestamp: chrono::Local::now().to_rfc3339(),
            xcode_running: snapshot.xcode_running,
            project_name: snapshot.project_name.clone(),
            project_path: snapshot.project_path.clone(),
            current_file: snapshot.current_file.clone(),
            current_file_path: snapshot.current_file_path.clone(),
            build_errors: snapshot.build_errors,
            detailed_errors: snapshot.detailed_errors.clone(),
        }
    }
}
