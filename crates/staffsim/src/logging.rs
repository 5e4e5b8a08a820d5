//! File logging for the CLI
//!
//! Everything goes to `staffsim.log` in the data directory. The file is
//! trimmed at startup once it grows past a size cap, keeping the newest lines.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::WrapErr;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "staffsim.log";
const ROTATION_MARKER: &[u8] = b"--- Log rotated (older entries removed) ---\n";

/// Size cap for the log file and how much of its tail survives a trim
#[derive(Debug, Clone, Copy)]
struct RotationPolicy {
    max_bytes: u64,
    keep_bytes: u64,
}

impl RotationPolicy {
    /// Trim past 5 MB, keeping the newest 1 MB
    const DEFAULT: Self = Self {
        max_bytes: 5 * 1024 * 1024,
        keep_bytes: 1024 * 1024,
    };

    /// Trim `path` down to its last `keep_bytes`, starting on a line boundary.
    ///
    /// Returns `true` if the file was rewritten. A missing file is left alone.
    fn apply(&self, path: &Path) -> io::Result<bool> {
        let len = match fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err),
        };
        if len <= self.max_bytes {
            return Ok(false);
        }

        let tail = read_from(path, len.saturating_sub(self.keep_bytes))?;
        let body = match tail.iter().position(|&b| b == b'\n') {
            Some(newline) => &tail[newline + 1..],
            None => &tail[..],
        };

        let mut trimmed = Vec::with_capacity(ROTATION_MARKER.len() + body.len());
        trimmed.extend_from_slice(ROTATION_MARKER);
        trimmed.extend_from_slice(body);
        fs::write(path, trimmed)?;
        Ok(true)
    }
}

fn read_from(path: &Path, offset: u64) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Send `tracing` output to `{data_dir}/staffsim.log`.
///
/// `RUST_LOG` takes precedence over `level`. Engine events are limited to
/// warnings unless `RUST_LOG` asks for more.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<()> {
    fs::create_dir_all(data_dir).wrap_err_with(|| {
        format!("Failed to create data directory {}", data_dir.display())
    })?;

    let log_path = data_dir.join(LOG_FILE);
    let rotation = RotationPolicy::DEFAULT.apply(&log_path);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .wrap_err_with(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("staffsim={level},staffsim_core=warn")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();

    match rotation {
        Ok(true) => tracing::info!("Log file trimmed to its most recent entries"),
        Ok(false) => {}
        Err(err) => tracing::warn!(error = %err, "Failed to trim log file"),
    }
    tracing::info!(log_path = %log_path.display(), "StaffSim logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn policy(max_bytes: u64, keep_bytes: u64) -> RotationPolicy {
        RotationPolicy {
            max_bytes,
            keep_bytes,
        }
    }

    #[test]
    fn test_small_log_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        fs::write(&path, "one\ntwo\n").unwrap();

        assert!(!policy(1024, 8).apply(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_rotation_keeps_recent_whole_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        let content: String = (0..100).map(|i| format!("line {i:03}\n")).collect();
        fs::write(&path, &content).unwrap();

        // Each line is 9 bytes; keeping 30 bytes starts mid-line
        assert!(policy(100, 30).apply(&path).unwrap());

        let rotated = fs::read_to_string(&path).unwrap();
        assert_eq!(
            rotated,
            "--- Log rotated (older entries removed) ---\nline 097\nline 098\nline 099\n"
        );
    }

    #[test]
    fn test_tail_without_newline_is_kept_whole() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        fs::write(&path, "x".repeat(50)).unwrap();

        assert!(policy(20, 10).apply(&path).unwrap());
        let rotated = fs::read_to_string(&path).unwrap();
        assert!(rotated.ends_with(&"x".repeat(10)));
        assert!(rotated.starts_with("--- Log rotated"));
    }

    #[test]
    fn test_missing_log_is_fine() {
        let dir = tempdir().unwrap();
        assert!(!policy(10, 5).apply(&dir.path().join(LOG_FILE)).unwrap());
    }
}
