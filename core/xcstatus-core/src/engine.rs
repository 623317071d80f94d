//! One full status poll: probe, resolve, read, extract, persist, render.
//!
//! The pass is synchronous and total. Any missing piece (probe timeout,
//! unresolved build root, corrupt manifest) degrades its field to the
//! default; nothing here aborts a pass.

use std::path::PathBuf;

use tracing::warn;

use crate::derived_data::{self, ResolvedBuildRoot};
use crate::extract::extract_errors;
use crate::files::locate_source_file;
use crate::manifest;
use crate::probe::{XcodeProbe, TITLE_SEPARATOR};
use crate::render::format_status_line;
use crate::storage::StorageConfig;
use crate::store::{load_status, save_status};
use crate::types::{is_bundle_path, ProjectHandle, StatusFile, StatusSnapshot};

pub struct StatusEngine<P: XcodeProbe> {
    probe: P,
    storage: StorageConfig,
}

impl<P: XcodeProbe> StatusEngine<P> {
    pub fn new(probe: P, storage: StorageConfig) -> Self {
        Self { probe, storage }
    }

    /// Performs one poll pass and returns a freshly computed snapshot.
    pub fn poll(&self) -> StatusSnapshot {
        if !self.probe.is_running() {
            return StatusSnapshot::default();
        }

        let mut snapshot = StatusSnapshot {
            xcode_running: true,
            ..Default::default()
        };

        if let Some((project_name, file_name)) = split_window_title(&self.probe.window_title()) {
            snapshot.project_name = project_name;
            snapshot.current_file = file_name;
        }

        let build_root = self
            .probe
            .active_project()
            .map(ProjectHandle::new)
            .and_then(|project| derived_data::resolve(&self.storage, &project));

        if let Some(root) = &build_root {
            snapshot.project_path = root.workspace_path.to_string_lossy().into_owned();
            self.read_build_status(root, &mut snapshot);
        }

        snapshot.current_file_path = self
            .locate_current_file(build_root.as_ref(), &snapshot.current_file)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        snapshot
    }

    /// Runs a full pass: poll, persist (preserving the externally owned
    /// `enabled` flag), and render. A persistence failure is logged and
    /// the line still returned.
    pub fn persist_and_render(&self) -> String {
        let snapshot = self.poll();
        let status_path = self.storage.status_file();
        let enabled = load_status(&status_path).enabled;
        let status = StatusFile::from_snapshot(&snapshot, enabled);
        if let Err(err) = save_status(&status_path, &status) {
            warn!(error = %err, "Failed to persist status file");
        }
        format_status_line(&status)
    }

    fn read_build_status(&self, root: &ResolvedBuildRoot, snapshot: &mut StatusSnapshot) {
        let manifest_path = self.storage.manifest_file(&root.path);
        if !manifest_path.exists() {
            return;
        }
        let outcome = manifest::latest_outcome(&manifest_path);
        if !outcome.failed {
            return;
        }
        let detailed = manifest::latest_failed_log(&manifest_path)
            .map(|log| extract_errors(&log))
            .unwrap_or_default();
        snapshot.build_errors = if detailed.is_empty() {
            outcome.error_count
        } else {
            detailed.len() as u64
        };
        snapshot.detailed_errors = detailed;
    }

    fn locate_current_file(
        &self,
        root: Option<&ResolvedBuildRoot>,
        file_name: &str,
    ) -> Option<PathBuf> {
        if file_name.is_empty() {
            return None;
        }
        if let Some(root) = root {
            let project = ProjectHandle::new(root.workspace_path.clone());
            if let Some(path) = locate_source_file(&root.workspace_path, &project.name, file_name)
            {
                return Some(path);
            }
        }
        // The document query sometimes answers with the project bundle
        // itself; that is not a linkable source file.
        self.probe.front_document().filter(|p| !is_bundle_path(p))
    }
}

/// Splits an Xcode window title into (project name, focused file).
///
/// Titles look like `MyApp — ViewController.swift`; the first segment is
/// the project and the last the file. Returns None when the separator is
/// absent (e.g. the welcome window).
pub fn split_window_title(title: &str) -> Option<(String, String)> {
    if !title.contains(TITLE_SEPARATOR) {
        return None;
    }
    let parts: Vec<&str> = title.split(TITLE_SEPARATOR).collect();
    Some((parts.first()?.to_string(), parts.last()?.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_title_two_segments() {
        assert_eq!(
            split_window_title("MyApp — ViewController.swift"),
            Some(("MyApp".to_string(), "ViewController.swift".to_string()))
        );
    }

    #[test]
    fn test_split_title_takes_first_and_last_segment() {
        assert_eq!(
            split_window_title("MyApp — MyScheme — Main.swift"),
            Some(("MyApp".to_string(), "Main.swift".to_string()))
        );
    }

    #[test]
    fn test_split_title_without_separator() {
        assert_eq!(split_window_title("Welcome to Xcode"), None);
        // A plain hyphen is not the em-dash separator.
        assert_eq!(split_window_title("MyApp - Main.swift"), None);
    }
}
