//! File sink implementation

use super::text_line;
use crate::core::{LogRecord, LoggerError, Result, Sink, TimestampFormat};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    timestamp_format: TimestampFormat,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::file_sink(path.display().to_string(), format!("Failed to open: {}", e)))?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
            timestamp_format: TimestampFormat::default(),
        })
    }

    /// Set the timestamp format for this sink
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tagged_logger::sinks::FileSink;
    /// use tagged_logger::TimestampFormat;
    ///
    /// let sink = FileSink::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_timestamp_format(TimestampFormat::Rfc3339);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write(&self, record: &LogRecord) -> Result<()> {
        let mut output = text_line(&self.timestamp_format.now(), record);
        output.push('\n');

        self.writer.lock().write_all(output.as_bytes()).map_err(|e| {
            LoggerError::io_operation("writing log file", self.path.display().to_string(), e)
        })
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.writer.get_mut().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogTag, Severity};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_file_sink_writes_lines() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");
        let sink = FileSink::new(&path)?;
        let tag = LogTag::with_subsystem("com.example", "io");

        sink.write(&LogRecord::new(Severity::Info, tag.clone(), "first", "a.rs", 1))?;
        sink.write(&LogRecord::new(Severity::Error, tag, "second\nline", "a.rs", 2))?;
        sink.flush()?;

        let content = fs::read_to_string(&path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[INFO   ] [com.example/io] a.rs:1 - first"));
        assert!(lines[1].ends_with("a.rs:2 - second\\nline"));
        Ok(())
    }

    #[test]
    fn test_file_sink_appends() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("append.log");
        let record = LogRecord::new(Severity::Info, LogTag::new("io"), "entry", "a.rs", 1);

        for _ in 0..2 {
            let sink = FileSink::new(&path)?;
            sink.write(&record)?;
        }

        assert_eq!(fs::read_to_string(&path)?.lines().count(), 2);
        Ok(())
    }

    #[test]
    fn test_open_failure() {
        let dir = tempdir().unwrap();
        let result = FileSink::new(dir.path().join("missing").join("app.log"));
        assert!(matches!(result, Err(LoggerError::FileSinkError { .. })));
    }
}
