use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use tokio::task;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 3);
const LOG_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Keeps the non-blocking file writer alive; drop it to flush.
#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

/// Install console and daily-rotated file logging.
///
/// `level` is the default directive; `RUST_LOG` overrides it. Must be called
/// from within a tokio runtime (old log files are pruned by a background task).
pub fn init_logging(log_dir: impl AsRef<Path>, prefix: &str, level: &str) -> anyhow::Result<LoggerGuard> {
    let log_dir = log_dir.as_ref().to_path_buf();
    let requested = level;
    let level = normalize_level(requested);

    let builder = EnvFilter::builder().with_default_directive(level.parse()?);
    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&rust_log);
    let file_filter = builder.parse_lossy(&rust_log);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(&log_dir)
        .with_context(|| format!("Failed to create log file appender in {}", log_dir.display()))?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if !requested.trim().eq_ignore_ascii_case(level) {
        tracing::warn!("Invalid log level '{}', defaulting to 'info'", requested);
    }

    start_log_cleanup_task(log_dir, prefix.to_string());

    Ok(LoggerGuard(guard))
}

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Lowercased level name, or "info" when it is not a known level
fn normalize_level(level: &str) -> &'static str {
    let level = level.trim().to_ascii_lowercase();
    LEVELS
        .iter()
        .find(|&&known| known == level)
        .copied()
        .unwrap_or("info")
}

fn start_log_cleanup_task(log_dir: PathBuf, prefix: String) {
    task::spawn(async move {
        loop {
            if let Err(e) = cleanup_old_logs(&log_dir, &prefix, LOG_MAX_AGE) {
                tracing::warn!("Failed to delete old log file: {}", e);
            }
            tokio::time::sleep(LOG_CLEANUP_INTERVAL).await;
        }
    });
}

/// Delete `{prefix}*.log` files in `log_dir` last modified more than `max_age` ago.
fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.starts_with(prefix) || !file_name.ends_with(".log") {
            continue;
        }

        let modified = fs::metadata(&path)?.modified()?;
        if now.duration_since(modified).unwrap_or_default() > max_age {
            fs::remove_file(&path)?;
            removed += 1;
            tracing::info!("Old log file deleted: {}", file_name);
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("debug"), "debug");
        assert_eq!(normalize_level(" WARN "), "warn");
        assert_eq!(normalize_level("verbose"), "info");
        assert_eq!(normalize_level(""), "info");
    }

    #[test]
    fn test_cleanup_keeps_recent_and_foreign_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("neo-backend.2026-01-01.log"), "x").unwrap();
        fs::write(dir.path().join("other.log"), "x").unwrap();
        fs::write(dir.path().join("neo-backend.txt"), "x").unwrap();

        let removed = cleanup_old_logs(dir.path(), "neo-backend", LOG_MAX_AGE).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_cleanup_removes_expired_logs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("neo-backend.2026-01-01.log"), "x").unwrap();
        fs::write(dir.path().join("other.log"), "x").unwrap();
        std::thread::sleep(Duration::from_millis(20));

        let removed = cleanup_old_logs(dir.path(), "neo-backend", Duration::from_millis(1)).unwrap();
        assert_eq!(removed, 1);
        assert!(dir.path().join("other.log").exists());
        assert!(!dir.path().join("neo-backend.2026-01-01.log").exists());
    }
}
