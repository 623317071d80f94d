//! Whole-document persistence of the status file.
//!
//! The file is replaced atomically (temp file + rename in the same
//! directory) so concurrent readers never observe a partial record. A
//! separate process may flip `enabled` between polls, so there is no
//! in-memory caching: callers read before rendering and write on toggle.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, XcStatusError};
use crate::types::StatusFile;

/// Loads the status document, returning defaults when the file is
/// missing, empty, or corrupt.
pub fn load_status(path: &Path) -> StatusFile {
    fs_err::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

/// Replaces the status document in full.
pub fn save_status(path: &Path, status: &StatusFile) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs_err::create_dir_all(dir).map_err(|source| XcStatusError::Io {
        context: format!("create {}", dir.display()),
        source,
    })?;

    let content =
        serde_json::to_string_pretty(status).map_err(|source| XcStatusError::Json {
            context: "serialize status".to_string(),
            source,
        })?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|source| XcStatusError::Io {
        context: format!("create temp file in {}", dir.display()),
        source,
    })?;
    tmp.write_all(content.as_bytes())
        .map_err(|source| XcStatusError::Io {
            context: "write status".to_string(),
            source,
        })?;
    tmp.persist(path).map_err(|err| XcStatusError::Io {
        context: format!("replace {}", path.display()),
        source: err.error,
    })?;
    Ok(())
}

/// Mutates only the `enabled` flag, creating the file with defaults if
/// absent. Returns the flag as written.
pub fn set_enabled(path: &Path, enabled: bool) -> Result<bool> {
    let mut status = load_status(path);
    status.enabled = enabled;
    save_status(path, &status)?;
    Ok(enabled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_defaults() {
        let temp = tempdir().unwrap();
        let status = load_status(&temp.path().join("status.json"));
        assert!(status.enabled);
        assert!(!status.xcode_running);
    }

    #[test]
    fn test_corrupt_file_loads_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("status.json");
        fs_err::write(&path, "{not json").unwrap();
        assert!(load_status(&path).enabled);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("status.json");
        let status = StatusFile {
            xcode_running: true,
            project_name: "MyApp".to_string(),
            build_errors: 2,
            ..Default::default()
        };
        save_status(&path, &status).unwrap();
        assert_eq!(load_status(&path), status);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested/dir/status.json");
        save_status(&path, &StatusFile::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_set_enabled_creates_file_with_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("status.json");
        assert!(!set_enabled(&path, false).unwrap());

        let status = load_status(&path);
        assert!(!status.enabled);
        assert_eq!(status.build_errors, 0);
    }

    #[test]
    fn test_set_enabled_preserves_other_fields() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("status.json");
        let status = StatusFile {
            project_name: "MyApp".to_string(),
            build_errors: 4,
            ..Default::default()
        };
        save_status(&path, &status).unwrap();

        set_enabled(&path, false).unwrap();
        let reloaded = load_status(&path);
        assert!(!reloaded.enabled);
        assert_eq!(reloaded.project_name, "MyApp");
        assert_eq!(reloaded.build_errors, 4);
    }
}
