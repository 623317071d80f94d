//! Xcode introspection via System Events and AppleScript.
//!
//! Every query is best-effort with a short fixed timeout: a hung or
//! missing automation surface degrades the affected field to its default
//! rather than failing the poll pass. The [`XcodeProbe`] trait is the
//! seam for tests, which substitute a canned fake.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use sysinfo::System;
use tracing::{debug, warn};

/// Timeout for the workspace-document query, which can be slow while
/// Xcode is indexing.
pub const OSASCRIPT_TIMEOUT: Duration = Duration::from_secs(5);
/// Timeout for the cheap window-title and document queries.
pub const OSASCRIPT_SHORT_TIMEOUT: Duration = Duration::from_secs(2);

/// Window-title separator between project name and focused file.
pub const TITLE_SEPARATOR: &str = " — ";

const XCODE_PROCESS_NAME: &str = "Xcode";

const GET_PROJECT_SCRIPT: &str = r#"
tell application "System Events"
    if exists (process "Xcode") then
        tell application "Xcode"
            try
                if exists active workspace document then
                    return path of active workspace document
                end if
            end try
        end tell
    end if
end tell
return ""
"#;

const GET_WINDOW_TITLE_SCRIPT: &str = r#"
tell application "System Events"
    if exists (process "Xcode") then
        tell process "Xcode"
            try
                return value of attribute "AXTitle" of window 1
            on error
                return ""
            end try
        end tell
    end if
end tell
"#;

const GET_DOCUMENT_SCRIPT: &str = r#"
tell application "Xcode"
    try
        if exists front document then
            set currentDocument to front document
            if exists (contents of currentDocument) then
                set sourceFile to path of (contents of currentDocument)
                if sourceFile contains ":" then
                    return POSIX path of sourceFile
                else
                    return sourceFile as string
                end if
            end if
        end if
    end try
end tell
return ""
"#;

/// Read-only view of the running IDE. All methods are total: failures and
/// timeouts surface as empty/None values.
pub trait XcodeProbe {
    fn is_running(&self) -> bool;
    fn window_title(&self) -> String;
    fn active_project(&self) -> Option<PathBuf>;
    fn front_document(&self) -> Option<PathBuf>;
}

/// Production probe backed by `osascript` and the process table.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsaScriptProbe;

impl XcodeProbe for OsaScriptProbe {
    fn is_running(&self) -> bool {
        let mut sys = System::new();
        sys.refresh_processes();
        let running = sys
            .processes_by_exact_name(XCODE_PROCESS_NAME)
            .next()
            .is_some();
        running
    }

    fn window_title(&self) -> String {
        run_osascript(GET_WINDOW_TITLE_SCRIPT, OSASCRIPT_SHORT_TIMEOUT).unwrap_or_default()
    }

    fn active_project(&self) -> Option<PathBuf> {
        let out = run_osascript(GET_PROJECT_SCRIPT, OSASCRIPT_TIMEOUT)?;
        if out.is_empty() {
            return None;
        }
        Some(PathBuf::from(out))
    }

    fn front_document(&self) -> Option<PathBuf> {
        let out = run_osascript(GET_DOCUMENT_SCRIPT, OSASCRIPT_SHORT_TIMEOUT)?;
        if out.is_empty() || out == "missing value" {
            return None;
        }
        Some(PathBuf::from(out))
    }
}

/// Runs an AppleScript snippet and returns its trimmed stdout.
///
/// None on spawn failure, non-zero exit, or timeout. A timed-out child is
/// killed and reaped so wedged `osascript` processes cannot pile up
/// across polls.
pub fn run_osascript(script: &str, timeout: Duration) -> Option<String> {
    let mut command = Command::new("osascript");
    command.arg("-e").arg(script);
    run_with_timeout(command, timeout)
}

fn run_with_timeout(mut command: Command, timeout: Duration) -> Option<String> {
    let mut child = match command.stdout(Stdio::piped()).stderr(Stdio::null()).spawn() {
        Ok(child) => child,
        Err(err) => {
            warn!(error = %err, "Failed to spawn osascript");
            return None;
        }
    };

    // Drained on its own thread: a child writing more than the pipe
    // buffer would otherwise block forever and read as a timeout.
    let mut stdout = child.stdout.take()?;
    let reader = std::thread::spawn(move || {
        let mut out = String::new();
        let _ = stdout.read_to_string(&mut out);
        out
    });

    match wait_with_timeout(&mut child, timeout) {
        Some(status) if status.success() => {
            let out = reader.join().ok()?;
            Some(out.trim().to_string())
        }
        Some(status) => {
            debug!(?status, "osascript exited with failure");
            None
        }
        None => {
            debug!(timeout_secs = timeout.as_secs(), "osascript timed out");
            let _ = child.kill();
            let _ = child.wait();
            let _ = reader.join();
            None
        }
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Option<ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Some(status),
            Ok(None) if Instant::now() >= deadline => return None,
            Ok(None) => std::thread::sleep(Duration::from_millis(50)),
            Err(_) => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(script);
        command
    }

    #[test]
    fn test_output_larger_than_pipe_buffer_fully_drained() {
        let out = run_with_timeout(
            sh("head -c 200000 /dev/zero | tr '\\0' 'a'"),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(out.len(), 200_000);
    }

    #[test]
    fn test_trimmed_small_output() {
        let out = run_with_timeout(sh("echo ' hello '"), Duration::from_secs(10)).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn test_nonzero_exit_is_none() {
        assert!(run_with_timeout(sh("exit 3"), Duration::from_secs(10)).is_none());
    }

    #[test]
    fn test_hung_child_times_out() {
        assert!(run_with_timeout(sh("sleep 5"), Duration::from_millis(200)).is_none());
    }
}
