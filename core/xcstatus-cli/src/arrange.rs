//! Side-by-side window arrangement for a terminal and a main app.
//!
//! Pure AppleScript glue over System Events. Every query here is
//! best-effort with a generous timeout; a failed query falls back to a
//! sensible default (primary screen, `Terminal`) instead of aborting.

use std::thread::sleep;
use std::time::Duration;

use clap::ValueEnum;
use tracing::debug;

use xcstatus_core::probe::run_osascript;

const ARRANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Reserved vertical space: menu bar above, dock allowance below.
const MENU_BAR_HEIGHT: i64 = 24;
const DOCK_ALLOWANCE: i64 = 80;

const FALLBACK_SCREEN: (i64, i64, i64, i64) = (0, 0, 1920, 1080);

const TERMINAL_CANDIDATES: &[&str] = &[
    "iTerm2", "Terminal", "iTerm", "Alacritty", "Kitty", "Hyper", "Warp", "WezTerm", "Tabby",
    "Ghostty",
];

const SYSTEM_APPS: &[&str] = &[
    "Finder",
    "Dock",
    "SystemUIServer",
    "ControlCenter",
    "NotificationCenter",
    "Spotlight",
    "loginwindow",
    "WindowManager",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Position {
    Left,
    Right,
}

/// Arranges the current terminal and a main application side by side.
/// `proportion` is the terminal's share of the screen width in percent.
pub fn run(position: Position, proportion: u8, preferred_app: Option<&str>) -> Result<(), String> {
    if !(10..=90).contains(&proportion) {
        return Err(format!(
            "Invalid proportion {proportion}%. Must be between 10 and 90."
        ));
    }

    let terminal = current_terminal();
    let main_app = best_main_app(preferred_app, &terminal).ok_or_else(|| match preferred_app {
        Some(app) => format!("Could not find or arrange application '{app}'"),
        None => "No suitable main application found with windows".to_string(),
    })?;

    let (x1, y1, x2, y2) = screen_bounds_for(&terminal);
    let screen_width = x2 - x1;
    let screen_height = y2 - y1;
    let terminal_width = screen_width * i64::from(proportion) / 100;
    let main_width = screen_width - terminal_width;
    let usable_height = screen_height - DOCK_ALLOWANCE;
    let top = y1 + MENU_BAR_HEIGHT;

    let (terminal_x, main_x) = match position {
        Position::Left => (x1, x1 + terminal_width),
        Position::Right => (x1 + main_width, x1),
    };

    println!("Arranging {main_app} and {terminal} (terminal on {position:?} side)");

    activate_app(&terminal);
    sleep(Duration::from_secs(1));
    set_window_frame(&terminal, terminal_x, top, terminal_width, usable_height);
    sleep(Duration::from_millis(500));

    if main_app != terminal && has_main_window(&main_app) {
        set_window_frame(&main_app, main_x, top, main_width, usable_height);
        sleep(Duration::from_millis(300));
        activate_app(&main_app);
        println!(
            "Arranged {main_app} ({}% width) and {terminal} ({proportion}% width)",
            100 - u32::from(proportion)
        );
    } else {
        println!("Terminal positioned ({proportion}% width). No main app window to resize.");
    }

    Ok(())
}

/// Finds the running terminal emulator with at least one window.
fn current_terminal() -> String {
    let running = run_osascript(
        r#"tell application "System Events" to get name of processes"#,
        ARRANGE_TIMEOUT,
    )
    .unwrap_or_default();

    let available: Vec<&str> = TERMINAL_CANDIDATES
        .iter()
        .copied()
        .filter(|name| running.contains(name))
        .collect();
    if available.is_empty() {
        return "Terminal".to_string();
    }

    for terminal in &available {
        if window_count(terminal) > 0 {
            return terminal.to_string();
        }
    }
    available[0].to_string()
}

fn window_count(app_name: &str) -> u32 {
    let script = format!(
        r#"
tell application "System Events"
    tell process "{app_name}"
        try
            return count of windows
        on error
            return "0"
        end try
    end tell
end tell
"#
    );
    run_osascript(&script, ARRANGE_TIMEOUT)
        .and_then(|out| out.parse().ok())
        .unwrap_or(0)
}

fn has_main_window(app_name: &str) -> bool {
    window_count(app_name) > 0
}

/// Picks the app to pair with the terminal. A preferred name must match
/// a visible process (exact first, then case-insensitive substring).
/// Without a preference: Xcode, then the frontmost non-terminal app,
/// then any visible app with a window.
fn best_main_app(preferred: Option<&str>, terminal: &str) -> Option<String> {
    let visible = visible_apps();

    if let Some(preferred) = preferred {
        if has_main_window(preferred) {
            return Some(preferred.to_string());
        }
        let wanted = preferred.to_lowercase();
        return visible
            .iter()
            .find(|app| {
                let name = app.to_lowercase();
                (name.contains(&wanted) || wanted.contains(&name)) && has_main_window(app)
            })
            .cloned();
    }

    if visible.iter().any(|app| app == "Xcode") && has_main_window("Xcode") {
        return Some("Xcode".to_string());
    }

    if let Some(front) = frontmost_app() {
        if front != terminal && !SYSTEM_APPS.contains(&front.as_str()) && has_main_window(&front) {
            return Some(front);
        }
    }

    visible
        .iter()
        .find(|app| {
            app.as_str() != terminal
                && !SYSTEM_APPS.contains(&app.as_str())
                && has_main_window(app)
        })
        .cloned()
}

fn visible_apps() -> Vec<String> {
    let script = r#"
tell application "System Events"
    set appList to {}
    repeat with proc in (processes whose visible is true)
        set end of appList to name of proc
    end repeat
    return appList
end tell
"#;
    run_osascript(script, ARRANGE_TIMEOUT)
        .map(|out| out.split(", ").map(|s| s.trim().to_string()).collect())
        .unwrap_or_default()
}

fn frontmost_app() -> Option<String> {
    run_osascript(
        r#"tell application "System Events" to return name of first process whose frontmost is true"#,
        ARRANGE_TIMEOUT,
    )
    .filter(|out| !out.is_empty())
}

/// Returns the bounds of the screen hosting the terminal's first window,
/// falling back to the primary screen.
fn screen_bounds_for(terminal: &str) -> (i64, i64, i64, i64) {
    let pos_script = format!(
        r#"
tell application "System Events"
    tell process "{terminal}"
        try
            tell window 1
                return position
            end tell
        on error
            return "0, 0"
        end try
    end tell
end tell
"#
    );
    let (term_x, term_y) = run_osascript(&pos_script, ARRANGE_TIMEOUT)
        .and_then(|out| parse_coords(&out, 2).map(|c| (c[0], c[1])))
        .unwrap_or((0, 0));

    let desktops_script = r#"
tell application "System Events"
    set allBounds to {}
    repeat with d in desktops
        set end of allBounds to bounds of d
    end repeat
    return allBounds
end tell
"#;
    if let Some(out) = run_osascript(desktops_script, ARRANGE_TIMEOUT) {
        for chunk in out.split("}, {") {
            if let Some(coords) = parse_coords(chunk, 4) {
                let (x1, y1, x2, y2) = (coords[0], coords[1], coords[2], coords[3]);
                if (x1..=x2).contains(&term_x) && (y1..=y2).contains(&term_y) {
                    return (x1, y1, x2, y2);
                }
            }
        }
    }

    let primary = run_osascript(
        r#"tell application "Finder" to return bounds of window of desktop"#,
        ARRANGE_TIMEOUT,
    );
    primary
        .and_then(|out| parse_coords(&out, 4).map(|c| (c[0], c[1], c[2], c[3])))
        .unwrap_or(FALLBACK_SCREEN)
}

/// Parses at least `min` comma-separated integers out of an AppleScript
/// list rendering such as `{0, 0, 1920, 1080}`.
fn parse_coords(raw: &str, min: usize) -> Option<Vec<i64>> {
    let coords: Vec<i64> = raw
        .trim_matches(|c| c == '{' || c == '}' || c == ' ')
        .split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect();
    if coords.len() >= min {
        Some(coords)
    } else {
        None
    }
}

fn set_window_frame(app_name: &str, x: i64, y: i64, width: i64, height: i64) {
    let script = format!(
        r#"
tell application "System Events"
    tell process "{app_name}"
        try
            set frontmost to true
            tell window 1
                set position to {{{x}, {y}}}
                set size to {{{width}, {height}}}
            end tell
        end try
    end tell
end tell
"#
    );
    if run_osascript(&script, ARRANGE_TIMEOUT).is_none() {
        debug!(app = app_name, "window frame script failed");
    }
}

fn activate_app(app_name: &str) {
    let script = format!(r#"tell application "{app_name}" to activate"#);
    let _ = run_osascript(&script, ARRANGE_TIMEOUT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coords_from_bounds_list() {
        assert_eq!(
            parse_coords("{0, 0, 1920, 1080}", 4),
            Some(vec![0, 0, 1920, 1080])
        );
    }

    #[test]
    fn test_parse_coords_position_pair() {
        assert_eq!(parse_coords("100, 50", 2), Some(vec![100, 50]));
    }

    #[test]
    fn test_parse_coords_rejects_short_input() {
        assert_eq!(parse_coords("100", 2), None);
        assert_eq!(parse_coords("not numbers", 2), None);
    }

    #[test]
    fn test_proportion_bounds_rejected() {
        assert!(run(Position::Right, 5, None).is_err());
        assert!(run(Position::Right, 95, None).is_err());
    }
}
