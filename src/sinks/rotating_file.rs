//! Size-based rotating file sink
//!
//! When the active file reaches the configured size, it is renamed to
//! `<name>.1` (shifting older backups up to `<name>.<max_backups>`) and a
//! fresh file is opened. Rotated files can be gzip-compressed to
//! `<name>.<n>.gz`.

use super::text_line;
use crate::core::{LogRecord, LoggerError, Result, Sink, TimestampFormat};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// When and how to rotate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate once the active file reaches this many bytes
    pub max_bytes: u64,
    /// Number of rotated files to keep
    pub max_backups: usize,
    /// Gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            max_backups: 5,
            compress: false,
        }
    }
}

impl RotationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

struct ActiveFile {
    writer: BufWriter<File>,
    size: u64,
}

pub struct RotatingFileSink {
    base_path: PathBuf,
    policy: RotationPolicy,
    active: Mutex<ActiveFile>,
    timestamp_format: TimestampFormat,
}

impl RotatingFileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        if policy.max_bytes == 0 {
            return Err(LoggerError::config("RotationPolicy", "max_bytes must be greater than zero"));
        }

        let base_path = path.as_ref().to_path_buf();
        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let active = Self::open(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            active: Mutex::new(active),
            timestamp_format: TimestampFormat::default(),
        })
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.base_path
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Bytes written to the active file
    pub fn current_size(&self) -> u64 {
        self.active.lock().size
    }

    /// Path of the `index`-th backup, uncompressed
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let filename = self
            .base_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log");
        self.base_path.with_file_name(format!("{}.{}", filename, index))
    }

    fn compressed_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".gz");
        PathBuf::from(name)
    }

    fn open(path: &Path) -> Result<ActiveFile> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_sink(path.display().to_string(), format!("Failed to open: {}", e))
            })?;
        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_sink(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok(ActiveFile {
            writer: BufWriter::new(file),
            size,
        })
    }

    /// Shift backups up by one and move the active file to `.1`
    fn rotate(&self, active: &mut ActiveFile) -> Result<()> {
        active.writer.flush().map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to flush before rotation: {}", e),
            )
        })?;

        if self.policy.max_backups == 0 {
            // Nothing is kept: truncate in place
            let file = File::create(&self.base_path)?;
            active.writer = BufWriter::new(file);
            active.size = 0;
            return Ok(());
        }

        let oldest = self.backup_path(self.policy.max_backups);
        for candidate in [Self::compressed_path(&oldest), oldest] {
            if candidate.exists() {
                if let Err(e) = fs::remove_file(&candidate) {
                    eprintln!("[LOGGER WARNING] Failed to remove oldest backup {}: {}", candidate.display(), e);
                }
            }
        }

        for index in (1..self.policy.max_backups).rev() {
            let from = self.backup_path(index);
            let to = self.backup_path(index + 1);
            for (from, to) in [
                (Self::compressed_path(&from), Self::compressed_path(&to)),
                (from, to),
            ] {
                if from.exists() {
                    fs::rename(&from, &to).map_err(|e| {
                        LoggerError::file_rotation(
                            from.display().to_string(),
                            format!("Failed to shift backup: {}", e),
                        )
                    })?;
                }
            }
        }

        let first_backup = self.backup_path(1);
        fs::rename(&self.base_path, &first_backup).map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to rotate current log file: {}", e),
            )
        })?;

        *active = Self::open(&self.base_path)?;

        if self.policy.compress {
            Self::compress_file(&first_backup)?;
        }

        Ok(())
    }

    /// Gzip `path` into `path.gz`, removing the original only on success
    fn compress_file(path: &Path) -> Result<()> {
        let gz_path = Self::compressed_path(path);
        let mut tmp_name = gz_path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let compress = || -> std::io::Result<()> {
            let mut reader = BufReader::new(File::open(path)?);
            let output = BufWriter::new(File::create(&tmp_path)?);
            let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
            std::io::copy(&mut reader, &mut encoder)?;
            encoder.finish()?.flush()?;
            fs::rename(&tmp_path, &gz_path)
        };

        if let Err(e) = compress() {
            let _ = fs::remove_file(&tmp_path);
            return Err(LoggerError::io_operation(
                "compress log file",
                path.display().to_string(),
                e,
            ));
        }

        if let Err(e) = fs::remove_file(path) {
            eprintln!(
                "[LOGGER WARNING] Compressed {} but failed to remove the original: {}",
                path.display(),
                e
            );
        }
        Ok(())
    }
}

impl Sink for RotatingFileSink {
    fn write(&self, record: &LogRecord) -> Result<()> {
        let mut line = text_line(&self.timestamp_format.now(), record);
        line.push('\n');

        let mut active = self.active.lock();
        if active.size > 0 && active.size + line.len() as u64 > self.policy.max_bytes {
            if let Err(e) = self.rotate(&mut active) {
                // Keep writing to whatever file is open rather than losing the record
                eprintln!("[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.", e);
                active.size = 0;
            }
        }

        active.writer.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::file_sink(
                self.base_path.display().to_string(),
                format!("Failed to write log record: {}", e),
            )
        })?;
        active.size += line.len() as u64;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.active.lock().writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "rotating_file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        let _ = self.active.get_mut().writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogTag, Severity};
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    fn record(message: &str) -> LogRecord {
        LogRecord::new(Severity::Info, LogTag::with_subsystem("s", "rot"), message, "r.rs", 1)
    }

    #[test]
    fn test_policy_builder() {
        let policy = RotationPolicy::new()
            .with_max_bytes(1024)
            .with_max_backups(3)
            .with_compression(true);
        assert_eq!(policy.max_bytes, 1024);
        assert_eq!(policy.max_backups, 3);
        assert!(policy.compress);
    }

    #[test]
    fn test_zero_size_rejected() {
        let dir = tempdir().unwrap();
        let result = RotatingFileSink::with_policy(
            dir.path().join("app.log"),
            RotationPolicy::new().with_max_bytes(0),
        );
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_rotates_by_size() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");
        let sink = RotatingFileSink::with_policy(
            &path,
            RotationPolicy::new().with_max_bytes(200).with_max_backups(2),
        )?;

        for i in 0..20 {
            sink.write(&record(&format!("message number {}", i)))?;
        }
        sink.flush()?;

        assert!(path.exists());
        assert!(sink.backup_path(1).exists());
        assert!(sink.backup_path(2).exists());
        assert!(!sink.backup_path(3).exists());
        assert!(sink.current_size() <= 200);

        let newest = fs::read_to_string(&path)?;
        assert!(newest.contains("message number 19"));
        Ok(())
    }

    #[test]
    fn test_compressed_backups() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");
        let sink = RotatingFileSink::with_policy(
            &path,
            RotationPolicy::new()
                .with_max_bytes(150)
                .with_max_backups(3)
                .with_compression(true),
        )?;

        for i in 0..10 {
            sink.write(&record(&format!("compressed entry {}", i)))?;
        }
        sink.flush()?;

        let gz = RotatingFileSink::compressed_path(&sink.backup_path(1));
        assert!(gz.exists());
        assert!(!sink.backup_path(1).exists());

        let mut decoded = String::new();
        GzDecoder::new(File::open(&gz)?).read_to_string(&mut decoded)?;
        assert!(decoded.contains("compressed entry"));
        Ok(())
    }

    #[test]
    fn test_no_backups_truncates() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");
        let sink = RotatingFileSink::with_policy(
            &path,
            RotationPolicy::new().with_max_bytes(100).with_max_backups(0),
        )?;

        for i in 0..10 {
            sink.write(&record(&format!("entry {}", i)))?;
        }
        sink.flush()?;

        assert!(!sink.backup_path(1).exists());
        assert!(fs::metadata(&path)?.len() <= 100);
        Ok(())
    }
}
