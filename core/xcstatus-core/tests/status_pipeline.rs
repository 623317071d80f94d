//! End-to-end poll passes against an on-disk DerivedData fixture and a
//! canned probe.

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use plist::{Dictionary, Value};
use tempfile::{tempdir, TempDir};

use xcstatus_core::probe::XcodeProbe;
use xcstatus_core::store::{load_status, set_enabled};
use xcstatus_core::{StatusEngine, StorageConfig};

#[derive(Debug, Clone, Default)]
struct FakeProbe {
    running: bool,
    title: String,
    project: Option<PathBuf>,
    document: Option<PathBuf>,
}

impl XcodeProbe for FakeProbe {
    fn is_running(&self) -> bool {
        self.running
    }

    fn window_title(&self) -> String {
        self.title.clone()
    }

    fn active_project(&self) -> Option<PathBuf> {
        self.project.clone()
    }

    fn front_document(&self) -> Option<PathBuf> {
        self.document.clone()
    }
}

struct Fixture {
    _temp: TempDir,
    storage: StorageConfig,
    project_path: PathBuf,
    build_logs_dir: PathBuf,
}

/// Builds a project bundle plus a matching DerivedData entry with an
/// empty Logs/Build directory.
fn fixture(project: &str) -> Fixture {
    let temp = tempdir().unwrap();
    let project_path = temp.path().join(format!("{project}.xcodeproj"));
    fs_err::create_dir_all(&project_path).unwrap();

    let derived = temp.path().join("DerivedData");
    let build_root = derived.join(format!("{project}-aaaabbbbcccc"));
    let build_logs_dir = build_root.join("Logs/Build");
    fs_err::create_dir_all(&build_logs_dir).unwrap();

    let mut info = Dictionary::new();
    info.insert(
        "WorkspacePath".into(),
        Value::String(project_path.to_string_lossy().into_owned()),
    );
    Value::Dictionary(info)
        .to_file_xml(build_root.join("Info.plist"))
        .unwrap();

    let storage = StorageConfig::with_roots(temp.path().join(".xcstatus"), derived);
    Fixture {
        _temp: temp,
        storage,
        project_path,
        build_logs_dir,
    }
}

fn write_failed_manifest(build_logs_dir: &Path, error_count: u64, log_name: &str) {
    let mut observable = Dictionary::new();
    observable.insert("highLevelStatus".into(), Value::String("E".into()));
    observable.insert("totalNumberOfErrors".into(), Value::Integer(error_count.into()));
    let mut record = Dictionary::new();
    record.insert("timeStoppedRecording".into(), Value::Real(100.0));
    record.insert("fileName".into(), Value::String(log_name.into()));
    record.insert("primaryObservable".into(), Value::Dictionary(observable));
    let mut logs = Dictionary::new();
    logs.insert("build-1".into(), Value::Dictionary(record));
    let mut root = Dictionary::new();
    root.insert("logs".into(), Value::Dictionary(logs));
    Value::Dictionary(root)
        .to_file_xml(build_logs_dir.join("LogStoreManifest.plist"))
        .unwrap();
}

fn write_gzipped_log(path: &Path, content: &str) {
    let file = fs_err::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

#[test]
fn poll_when_xcode_closed() {
    let fix = fixture("MyApp");
    let probe = FakeProbe::default();
    let engine = StatusEngine::new(probe, fix.storage.clone());

    let snapshot = engine.poll();
    assert!(!snapshot.xcode_running);
    assert_eq!(snapshot.project_name, "");
    assert_eq!(snapshot.build_errors, 0);

    let line = engine.persist_and_render();
    assert!(line.contains("xcode closed"));
    assert!(line.contains("open now"));
    assert!(!line.contains("build error"));
}

#[test]
fn poll_without_build_root() {
    let temp = tempdir().unwrap();
    // DerivedData root does not exist at all.
    let storage = StorageConfig::with_roots(
        temp.path().join(".xcstatus"),
        temp.path().join("DerivedData"),
    );
    let probe = FakeProbe {
        running: true,
        title: "MyApp — ViewController.swift".to_string(),
        project: Some(temp.path().join("MyApp.xcodeproj")),
        document: None,
    };
    let engine = StatusEngine::new(probe, storage);

    let snapshot = engine.poll();
    assert!(snapshot.xcode_running);
    assert_eq!(snapshot.project_name, "MyApp");
    assert_eq!(snapshot.current_file, "ViewController.swift");
    assert_eq!(snapshot.build_errors, 0);
    assert!(snapshot.detailed_errors.is_empty());

    let line = engine.persist_and_render();
    assert!(line.contains("MyApp"));
    assert!(line.contains("ViewController.swift"));
    assert!(!line.contains("build error"));
}

#[test]
fn detailed_extraction_overrides_manifest_count() {
    let fix = fixture("MyApp");
    write_failed_manifest(&fix.build_logs_dir, 5, "failed.xcactivitylog");
    write_gzipped_log(
        &fix.build_logs_dir.join("failed.xcactivitylog"),
        "/App/Main.swift:3:1: error: missing semicolon\n\
         /App/Main.swift:3:1: error: missing semicolon\n\
         /App/View.swift:9:5: error: bad call\n",
    );

    let probe = FakeProbe {
        running: true,
        title: "MyApp — Main.swift".to_string(),
        project: Some(fix.project_path.clone()),
        document: None,
    };
    let engine = StatusEngine::new(probe, fix.storage.clone());

    let snapshot = engine.poll();
    assert!(snapshot.xcode_running);
    // Manifest says 5 errors, the log deduplicates to 2.
    assert_eq!(snapshot.build_errors, 2);
    assert_eq!(snapshot.detailed_errors.len(), 2);
    assert_eq!(
        snapshot.project_path,
        fix.project_path.to_string_lossy().to_string()
    );

    let line = engine.persist_and_render();
    assert!(line.contains("2 build errors"));

    let persisted = load_status(&fix.storage.status_file());
    assert!(persisted.xcode_running);
    assert_eq!(persisted.build_errors, 2);
    assert_eq!(persisted.detailed_errors.len(), 2);
    assert!(!persisted.timestamp.is_empty());
}

#[test]
fn manifest_count_used_when_log_unreadable() {
    let fix = fixture("MyApp");
    // fileName references a log that was never written.
    write_failed_manifest(&fix.build_logs_dir, 5, "gone.xcactivitylog");

    let probe = FakeProbe {
        running: true,
        title: "MyApp — Main.swift".to_string(),
        project: Some(fix.project_path.clone()),
        document: None,
    };
    let engine = StatusEngine::new(probe, fix.storage.clone());

    let snapshot = engine.poll();
    assert_eq!(snapshot.build_errors, 5);
    assert!(snapshot.detailed_errors.is_empty());
}

#[test]
fn current_file_located_in_project_tree() {
    let fix = fixture("MyApp");
    let source = fix
        .project_path
        .parent()
        .unwrap()
        .join("MyApp/ViewController.swift");
    fs_err::create_dir_all(source.parent().unwrap()).unwrap();
    fs_err::write(&source, b"// swift").unwrap();

    let probe = FakeProbe {
        running: true,
        title: "MyApp — ViewController.swift".to_string(),
        project: Some(fix.project_path.clone()),
        document: None,
    };
    let engine = StatusEngine::new(probe, fix.storage.clone());

    let snapshot = engine.poll();
    assert_eq!(snapshot.current_file_path, source.to_string_lossy());
}

#[test]
fn toggle_round_trip_disables_rendering() {
    let fix = fixture("MyApp");
    let status_path = fix.storage.status_file();

    assert!(!set_enabled(&status_path, false).unwrap());
    assert!(!load_status(&status_path).enabled);

    let probe = FakeProbe {
        running: true,
        title: "MyApp — Main.swift".to_string(),
        project: Some(fix.project_path.clone()),
        document: None,
    };
    let engine = StatusEngine::new(probe, fix.storage.clone());

    // The pass still persists a snapshot but renders nothing.
    assert_eq!(engine.persist_and_render(), "");
    let persisted = load_status(&status_path);
    assert!(!persisted.enabled);
    assert!(persisted.xcode_running);

    assert!(set_enabled(&status_path, true).unwrap());
    assert_ne!(engine.persist_and_render(), "");
}
