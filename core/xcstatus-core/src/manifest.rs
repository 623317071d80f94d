//! Reader for Xcode's `LogStoreManifest.plist` build index.
//!
//! The manifest maps opaque build ids to per-build records. Its schema is
//! owned by Xcode, so every field is optional with a documented default,
//! and any parse failure yields the quiet default (no failure, zero
//! errors) rather than an error.
//!
//! Two "latest" selections exist on purpose and must not be merged:
//! [`latest_outcome`] looks at the most recent build overall, while
//! [`latest_failed_log`] looks at the most recent *failed* build, which
//! may be older than a successful build that followed it. Only failed
//! builds carry useful error logs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

/// `highLevelStatus` code Xcode writes for a failed build.
pub const STATUS_FAILED: &str = "E";
/// Default status when the field is absent (success-equivalent).
const STATUS_SUCCESS: &str = "S";
/// A record started within this window with no stop time counts as an
/// active build.
pub const BUILD_ACTIVE_THRESHOLD_SECS: f64 = 300.0;

#[derive(Debug, Default, Deserialize)]
struct LogStoreManifest {
    /// Build id → record. BTreeMap so iteration order is the build-id
    /// order: ties on stop time resolve to the lexicographically smallest
    /// id, keeping selection deterministic for tests.
    #[serde(default)]
    logs: BTreeMap<String, BuildRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct BuildRecord {
    #[serde(default, rename = "timeStartedRecording")]
    time_started_recording: Option<f64>,
    #[serde(default, rename = "timeStoppedRecording")]
    time_stopped_recording: Option<f64>,
    #[serde(default, rename = "fileName")]
    file_name: String,
    #[serde(default, rename = "primaryObservable")]
    primary_observable: PrimaryObservable,
}

#[derive(Debug, Clone, Deserialize)]
struct PrimaryObservable {
    #[serde(default = "default_status", rename = "highLevelStatus")]
    high_level_status: String,
    #[serde(default, rename = "totalNumberOfErrors")]
    total_number_of_errors: u64,
}

fn default_status() -> String {
    STATUS_SUCCESS.to_string()
}

impl Default for PrimaryObservable {
    fn default() -> Self {
        PrimaryObservable {
            high_level_status: default_status(),
            total_number_of_errors: 0,
        }
    }
}

impl BuildRecord {
    fn stop_time(&self) -> f64 {
        self.time_stopped_recording.unwrap_or(0.0)
    }

    fn failed(&self) -> bool {
        self.primary_observable.high_level_status == STATUS_FAILED
    }
}

/// Pass/fail classification of the most recent build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOutcome {
    pub failed: bool,
    pub error_count: u64,
}

fn load(manifest_path: &Path) -> LogStoreManifest {
    match plist::from_file(manifest_path) {
        Ok(manifest) => manifest,
        Err(err) => {
            debug!(path = %manifest_path.display(), error = %err, "Unreadable build manifest, treating as empty");
            LogStoreManifest::default()
        }
    }
}

/// Most-recently-stopped record, strictly-greater comparison so the first
/// record (smallest build id) wins ties.
fn latest<'a>(records: impl Iterator<Item = &'a BuildRecord>) -> Option<&'a BuildRecord> {
    let mut best: Option<&BuildRecord> = None;
    for record in records {
        if best.map_or(true, |b| record.stop_time() > b.stop_time()) {
            best = Some(record);
        }
    }
    best
}

/// Classifies the latest build overall. Empty or corrupt manifests report
/// the quiet default: no failure, zero errors.
pub fn latest_outcome(manifest_path: &Path) -> BuildOutcome {
    let manifest = load(manifest_path);
    match latest(manifest.logs.values()) {
        Some(record) => BuildOutcome {
            failed: record.failed(),
            error_count: record.primary_observable.total_number_of_errors,
        },
        None => BuildOutcome::default(),
    }
}

/// Log file of the latest *failed* build, resolved against the manifest's
/// directory. None if no failed record exists, its `fileName` is empty,
/// or the log file is missing on disk.
pub fn latest_failed_log(manifest_path: &Path) -> Option<PathBuf> {
    let manifest = load(manifest_path);
    let record = latest(manifest.logs.values().filter(|r| r.failed()))?;
    if record.file_name.is_empty() {
        return None;
    }
    let log_path = manifest_path.parent()?.join(&record.file_name);
    log_path.exists().then_some(log_path)
}

/// True if any record started within the active window and has no stop
/// time yet, i.e. a build is still recording.
pub fn build_in_progress(manifest_path: &Path, now: f64) -> bool {
    load(manifest_path).logs.values().any(|record| {
        record.time_stopped_recording.is_none()
            && record
                .time_started_recording
                .is_some_and(|start| start > now - BUILD_ACTIVE_THRESHOLD_SECS)
    })
}
