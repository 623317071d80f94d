//! Error extraction from Xcode build logs.
//!
//! `.xcactivitylog` files are gzip-compressed archives of a structured
//! format we do not parse; instead the decompressed text is scanned for
//! compiler diagnostic lines. Two pattern tiers are tried: Swift
//! file-location diagnostics first, then generic `error:` markers only if
//! the first tier found nothing, so high-signal matches suppress noisier
//! generic ones.

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::patterns::{GENERIC_ERROR_PATTERNS, RE_HEX_RUN, SWIFT_ERROR_PATTERNS};

/// Composed messages at or past this length are linker dumps or
/// serialized blobs, not human-readable diagnostics.
pub const MAX_ERROR_LENGTH: usize = 500;

/// Extracts a deduplicated, ordered list of error messages from a build
/// log. Total: unreadable or undecodable input yields an empty list.
pub fn extract_errors(log_path: &Path) -> Vec<String> {
    let raw = match fs_err::read(log_path) {
        Ok(raw) => raw,
        Err(err) => {
            debug!(path = %log_path.display(), error = %err, "Unreadable build log");
            return Vec::new();
        }
    };
    extract_from_text(&decode_log(&raw))
}

/// Gzip-decodes the log, falling back to treating the bytes as plain
/// text. Neither path can fail the caller.
fn decode_log(raw: &[u8]) -> String {
    let mut decoder = GzDecoder::new(raw);
    let mut buf = Vec::new();
    match decoder.read_to_end(&mut buf) {
        Ok(_) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => String::from_utf8_lossy(raw).into_owned(),
    }
}

/// Runs the tiered extraction over already-decoded log text.
pub fn extract_from_text(content: &str) -> Vec<String> {
    let lines: Vec<&str> = content.lines().collect();
    let swift = swift_errors(&lines);
    if !swift.is_empty() {
        return swift;
    }
    generic_errors(&lines)
}

fn swift_errors(lines: &[&str]) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();
    for line in lines {
        let Some(caps) = SWIFT_ERROR_PATTERNS.iter().find_map(|p| p.captures(line)) else {
            continue;
        };
        let location = caps.get(1).map_or("", |m| m.as_str());
        let message = caps.get(2).map_or("", |m| m.as_str());
        if message.to_lowercase().contains("warning:") {
            continue;
        }
        let composed = if message.is_empty() {
            location.to_string()
        } else {
            format!("{location}: {message}")
        };
        if accept(&composed, &errors) {
            errors.push(composed);
        }
    }
    errors
}

fn generic_errors(lines: &[&str]) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();
    for line in lines {
        let Some(caps) = GENERIC_ERROR_PATTERNS.iter().find_map(|p| p.captures(line)) else {
            continue;
        };
        let message = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
        if !message.is_empty() && accept(&message, &errors) {
            errors.push(message);
        }
    }
    errors
}

/// Length, hex-noise, and order-preserving dedup filters shared by both
/// tiers.
fn accept(candidate: &str, seen: &[String]) -> bool {
    candidate.len() < MAX_ERROR_LENGTH
        && !RE_HEX_RUN.is_match(candidate)
        && !seen.iter().any(|s| s == candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_gzipped(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let file = fs_err::File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap();
        path
    }

    #[test]
    fn test_swift_error_extracted_with_location() {
        let log = "/App/ViewController.swift:10:5: error: use of unresolved identifier 'foo'";
        assert_eq!(
            extract_from_text(log),
            vec!["/App/ViewController.swift:10:5: use of unresolved identifier 'foo'".to_string()]
        );
    }

    #[test]
    fn test_warning_lines_rejected() {
        let log = "/App/Main.swift:3:1: warning: unused variable 'x'";
        assert!(extract_from_text(log).is_empty());
    }

    #[test]
    fn test_hex_token_rejected() {
        let log = "/App/Main.swift:3:1: error: blob 0123456789ABCDEF01234567 failed";
        assert!(extract_from_text(log).is_empty());
    }

    #[test]
    fn test_overlong_message_rejected() {
        let message = "x".repeat(600);
        let log = format!("/App/Main.swift:3:1: error: {message}");
        assert!(extract_from_text(&log).is_empty());
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let line = "/App/Main.swift:3:1: error: missing semicolon";
        let other = "/App/Other.swift:9:2: error: bad call";
        let log = format!("{line}\n{other}\n{line}\n{line}");
        let errors = extract_from_text(&log);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], "/App/Main.swift:3:1: missing semicolon");
    }

    #[test]
    fn test_tier2_engaged_only_on_tier1_miss() {
        let log = "ld: error: disk full";
        assert_eq!(extract_from_text(log), vec!["disk full".to_string()]);
    }

    #[test]
    fn test_tier1_suppresses_tier2() {
        let log = "/App/Main.swift:3:1: error: missing semicolon\nld: error: disk full";
        let errors = extract_from_text(log);
        assert_eq!(errors, vec!["/App/Main.swift:3:1: missing semicolon".to_string()]);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let log = "/App/A.swift:1:1: error: one\nld: error: two\n/App/B.swift:2:2: error: three";
        let first = extract_from_text(log);
        let second = extract_from_text(log);
        assert_eq!(first, second);
    }

    #[test]
    fn test_gzipped_log_decoded() {
        let temp = tempdir().unwrap();
        let path = write_gzipped(
            temp.path(),
            "build.xcactivitylog",
            "/App/Main.swift:3:1: error: missing semicolon\n",
        );
        assert_eq!(
            extract_errors(&path),
            vec!["/App/Main.swift:3:1: missing semicolon".to_string()]
        );
    }

    #[test]
    fn test_plain_text_fallback() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("build.log");
        fs_err::write(&path, "fatal error: out of memory\n").unwrap();
        assert_eq!(extract_errors(&path), vec!["out of memory".to_string()]);
    }

    #[test]
    fn test_missing_log_yields_empty() {
        assert!(extract_errors(Path::new("/nonexistent/build.log")).is_empty());
    }
}
