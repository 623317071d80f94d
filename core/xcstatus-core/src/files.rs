//! Locates the focused file's absolute path within the project tree.
//!
//! The window title only carries a bare file name; to hyperlink it we
//! search the directory containing the project bundle.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Directories never descended into: VCS metadata and build output, which
/// are large and can shadow real sources with stale copies.
const PRUNED_DIRS: &[&str] = &[".git", ".build", "DerivedData"];

/// Conventional source directories tried as fallbacks when the walk finds
/// nothing.
const SOURCE_DIRECTORIES: &[&str] = &["Sources", "src"];

/// Bounds the walk; a traversal cannot be timed out from the inside, so
/// both depth and entry count are capped to keep one poll pass short.
const MAX_WALK_DEPTH: usize = 12;
const MAX_WALK_ENTRIES: usize = 20_000;

/// Best-effort search for `file_name` under the directory containing the
/// project bundle at `workspace_path`. Returns the first hit in walk
/// order, falling back to a fixed list of conventional locations.
pub fn locate_source_file(
    workspace_path: &Path,
    project_name: &str,
    file_name: &str,
) -> Option<PathBuf> {
    if file_name.is_empty() {
        return None;
    }
    let project_dir = workspace_path.parent()?;

    if let Some(path) = walk_for_file(project_dir, file_name, MAX_WALK_ENTRIES) {
        return Some(path);
    }

    candidate_paths(project_dir, project_name, file_name)
        .into_iter()
        .find(|p| p.exists())
}

fn walk_for_file(project_dir: &Path, file_name: &str, max_entries: usize) -> Option<PathBuf> {
    WalkDir::new(project_dir)
        .max_depth(MAX_WALK_DEPTH)
        .into_iter()
        .filter_entry(|e| !is_pruned(e))
        .filter_map(|e| e.ok())
        .take(max_entries)
        .find(|e| e.file_type().is_file() && e.file_name().to_string_lossy() == file_name)
        .map(|e| e.into_path())
}

fn is_pruned(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map_or(false, |name| PRUNED_DIRS.contains(&name))
}

fn candidate_paths(project_dir: &Path, project_name: &str, file_name: &str) -> Vec<PathBuf> {
    let mut paths = vec![
        project_dir.join(project_name).join(file_name),
        project_dir.join(file_name),
    ];
    for src in SOURCE_DIRECTORIES {
        paths.push(project_dir.join(src).join(file_name));
        paths.push(project_dir.join(project_name).join(src).join(file_name));
    }
    paths
}
