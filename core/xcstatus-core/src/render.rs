//! Terminal rendering of the persisted status.
//!
//! Output is one line with ANSI colors and OSC 8 hyperlinks
//! (`ESC]8;;URI ESC\ text ESC]8;; ESC\`), or the empty string when the
//! status line is disabled.

use crate::types::StatusFile;

const COLOR_RED: &str = "\x1b[31m";
const COLOR_GREEN: &str = "\x1b[32m";
const COLOR_BLUE: &str = "\x1b[34m";
const COLOR_RESET: &str = "\x1b[0m";

const XCODE_APP_URI: &str = "file:///Applications/Xcode.app";

fn hyperlink(uri: &str, text: &str) -> String {
    format!("\x1b]8;;{uri}\x1b\\{text}\x1b]8;;\x1b\\")
}

/// Renders the status as a single line for the status-line host.
pub fn format_status_line(status: &StatusFile) -> String {
    if !status.enabled {
        return String::new();
    }

    if !status.xcode_running {
        let open_link = hyperlink(XCODE_APP_URI, "open now");
        return format!("{COLOR_RED}\u{23fa}{COLOR_RESET} xcode closed | {open_link}");
    }

    let mut parts = Vec::new();
    if status.project_name.is_empty() {
        parts.push(format!(
            "{COLOR_GREEN}\u{23fa}{COLOR_RESET} xcode opened but not focused"
        ));
    } else {
        parts.push(format!(
            "{COLOR_GREEN}\u{23fa}{COLOR_RESET} {}",
            status.project_name
        ));
    }

    if !status.current_file.is_empty() {
        let file_text = if status.current_file_path.is_empty() {
            status.current_file.clone()
        } else {
            hyperlink(
                &format!("file://{}", status.current_file_path),
                &status.current_file,
            )
        };
        parts.push(format!(
            " | {COLOR_BLUE}\u{29c9} In {file_text}{COLOR_RESET}"
        ));
    }

    // The detailed list, when present, is the authoritative count.
    let error_count = if status.detailed_errors.is_empty() {
        status.build_errors
    } else {
        status.detailed_errors.len() as u64
    };
    if error_count > 0 {
        let word = if error_count == 1 { "error" } else { "errors" };
        parts.push(format!(" | {error_count} build {word}"));
    }

    parts.concat()
}
