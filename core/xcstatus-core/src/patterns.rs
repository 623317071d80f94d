//! Compiled regex patterns for extracting errors from Xcode build logs.
//!
//! Each tier is an ordered table evaluated with first-match-wins semantics
//! per line: the first pattern that hits ends pattern testing for that
//! line. New log shapes are added by extending a table, not by touching
//! the extraction control flow.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tier 1: Swift diagnostic lines carrying a file location.
/// Group 1 = `path:line:col`, group 2 = message text.
pub static SWIFT_ERROR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(.+\.swift:\d+:\d+):\s+error:\s+(.+)",
        r"(.+\.swift:\d+:\d+):\s+(.+)",
        r"(/[^:]+\.swift:\d+:\d+):\s+error:\s+(.+)",
        r"(/[^:]+\.swift:\d+:\d+):\s+(.+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Tier 2: generic error markers, tried only when tier 1 finds nothing.
/// Group 1 = trailing message text.
pub static GENERIC_ERROR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)error:\s+(.+)",
        r"(?i)Error:\s+(.+)",
        r"(?i)fatal error:\s+(.+)",
        r"(?i)compilation failed:\s+(.+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Runs of 20+ hex characters are hashes or addresses, not diagnostics.
pub static RE_HEX_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9A-F]{20,}").unwrap());
