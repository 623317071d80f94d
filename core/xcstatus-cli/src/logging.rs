//! Tracing setup for the CLI.
//!
//! Stdout belongs to the status line, so diagnostics never go there.
//! One-shot commands log to stderr; `watch` writes to a daily-rolling
//! file under the data directory so a long-lived poller can be debugged
//! after the fact.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use xcstatus_core::StorageConfig;

const LOG_ENV_VAR: &str = "XCSTATUS_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes stderr logging for one-shot commands.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// Initializes rolling-file logging for watch mode. The returned guard
/// must stay alive for the duration of the loop or buffered lines are
/// dropped.
pub fn init_watch(storage: &StorageConfig) -> Option<WorkerGuard> {
    let log_dir = storage.log_dir();
    if fs_err::create_dir_all(&log_dir).is_err() {
        // Fall back to stderr rather than running blind.
        init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(log_dir, "xcstatus.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}
