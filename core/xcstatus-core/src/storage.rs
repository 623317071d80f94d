//! Storage configuration and path management for xcstatus.
//!
//! Centralizes every filesystem location the crate touches:
//!
//! - our own data directory (status file, watch-mode logs)
//! - Xcode's DerivedData root and the well-known files inside each
//!   per-project build directory
//!
//! Production code uses `StorageConfig::default()`; tests inject temp
//! directories with `with_root()` / `with_roots()`.

use std::path::{Path, PathBuf};

/// Name of the build index inside a build root's `Logs/Build` directory.
pub const MANIFEST_FILENAME: &str = "LogStoreManifest.plist";
/// Per-build-root metadata file holding the owning workspace path.
pub const INFO_PLIST_FILENAME: &str = "Info.plist";

const BUILD_LOGS_SUBPATH: &str = "Logs/Build";

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for xcstatus data (default: ~/.xcstatus).
    root: PathBuf,
    /// Xcode's build-artifacts root. Owned by Xcode; never created by us,
    /// and its absence is a valid "no build root" outcome.
    derived_data_root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let home = dirs::home_dir().expect("Could not find home directory");
        Self {
            root: home.join(".xcstatus"),
            derived_data_root: home
                .join("Library")
                .join("Developer")
                .join("Xcode")
                .join("DerivedData"),
        }
    }
}

impl StorageConfig {
    /// Creates a StorageConfig rooted in a custom directory, with the
    /// DerivedData root placed alongside. Used for testing.
    pub fn with_root(root: PathBuf) -> Self {
        let derived_data_root = root.join("DerivedData");
        Self {
            root,
            derived_data_root,
        }
    }

    /// Creates a StorageConfig with both roots set explicitly.
    pub fn with_roots(root: PathBuf, derived_data_root: PathBuf) -> Self {
        Self {
            root,
            derived_data_root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Xcode's DerivedData root directory.
    pub fn derived_data_dir(&self) -> &Path {
        &self.derived_data_root
    }

    /// Path to the persisted status document.
    pub fn status_file(&self) -> PathBuf {
        self.root.join("status.json")
    }

    /// Directory for watch-mode log files.
    pub fn log_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Build-log directory inside a resolved build root.
    pub fn build_logs_dir(&self, build_root: &Path) -> PathBuf {
        build_root.join(BUILD_LOGS_SUBPATH)
    }

    /// Manifest file inside a resolved build root.
    pub fn manifest_file(&self, build_root: &Path) -> PathBuf {
        self.build_logs_dir(build_root).join(MANIFEST_FILENAME)
    }

    /// Ensures our own data directory exists. DerivedData is never created.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        fs_err::create_dir_all(&self.root)
    }
}
