use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::io::paths::log_dir;

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "WROK_LOG";

const LOG_FILE: &str = "wrok.log";

/// Install the global subscriber writing to `<data dir>/logs/wrok.log`.
///
/// The terminal belongs to the TUI, so nothing is logged to stdout or
/// stderr. `level` (from config) applies when `WROK_LOG` is unset. The
/// returned guard flushes the writer on drop and must outlive the program.
pub fn init_logging(data_dir: &Path, level: &str) -> Option<WorkerGuard> {
    let dir = log_dir(data_dir);
    if std::fs::create_dir_all(&dir).is_err() {
        return None;
    }

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::Layer::default()
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .ok()?;

    Some(guard)
}
