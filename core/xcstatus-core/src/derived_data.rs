//! Locates the DerivedData build root for an open Xcode project.
//!
//! Xcode names per-project build directories `<ProjectName>-<hash>` with
//! an opaque hash, so a name prefix match alone is ambiguous. Each
//! candidate is confirmed by round-tripping through its `Info.plist`:
//! the recorded `WorkspacePath` must resolve to the same real
//! (symlink-free) path as the open project.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::storage::{StorageConfig, INFO_PLIST_FILENAME};
use crate::types::ProjectHandle;

/// Per-build-root metadata Xcode writes alongside artifacts. Schema owned
/// by Xcode; every field optional.
#[derive(Debug, Default, Deserialize)]
struct DerivedDataInfo {
    #[serde(default, rename = "WorkspacePath")]
    workspace_path: Option<String>,
}

/// A confirmed build root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBuildRoot {
    /// DerivedData subdirectory holding this project's artifacts.
    pub path: PathBuf,
    /// Project/workspace path recorded in the directory's Info.plist.
    pub workspace_path: PathBuf,
}

/// Finds the build root matching `project`, or None.
///
/// Candidates are tried in directory-listing order and the first whose
/// Info.plist round-trips to the project's real path wins. A missing
/// DerivedData root is a valid miss, and failures on individual
/// candidates are swallowed: an unreadable candidate is a non-match,
/// never fatal.
pub fn resolve(config: &StorageConfig, project: &ProjectHandle) -> Option<ResolvedBuildRoot> {
    let entries = fs_err::read_dir(config.derived_data_dir()).ok()?;
    let normalized = project.normalized_name();

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let dir_name = file_name.to_string_lossy();
        if !(dir_name.starts_with(project.name.as_str()) || dir_name.starts_with(&normalized)) {
            continue;
        }
        let candidate = entry.path();
        if let Some(workspace_path) = confirm(&candidate, &project.path) {
            debug!(path = %candidate.display(), "Resolved build root");
            return Some(ResolvedBuildRoot {
                path: candidate,
                workspace_path,
            });
        }
    }
    None
}

/// Reads the candidate's Info.plist and compares canonical paths.
fn confirm(candidate: &Path, project_path: &Path) -> Option<PathBuf> {
    let info: DerivedDataInfo = plist::from_file(candidate.join(INFO_PLIST_FILENAME)).ok()?;
    let workspace_path = PathBuf::from(info.workspace_path?);
    let real_workspace = fs_err::canonicalize(&workspace_path).ok()?;
    let real_project = fs_err::canonicalize(project_path).ok()?;
    (real_workspace == real_project).then_some(workspace_path)
}
