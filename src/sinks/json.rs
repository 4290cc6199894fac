//! JSON-lines sink
//!
//! Writes each record as a single-line JSON object, for log shippers that
//! ingest JSONL (ELK, Loki, etc).

use crate::core::{LogRecord, Result, Sink, TimestampFormat};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct JsonSink {
    writer: Mutex<BufWriter<File>>,
    timestamp_format: TimestampFormat,
}

impl JsonSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            timestamp_format: TimestampFormat::Rfc3339,
        })
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }
}

impl Sink for JsonSink {
    fn write(&self, record: &LogRecord) -> Result<()> {
        let timestamp = self.timestamp_format.now();
        let json = serde_json::to_string(&record.view(&timestamp))?;

        writeln!(self.writer.lock(), "{}", json)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogTag, Severity};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_json_sink() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("test.jsonl");
        let sink = JsonSink::new(&log_path)?;

        let tag = LogTag::with_subsystem("com.example", "auth");
        sink.write(&LogRecord::new(Severity::Info, tag, "User\nlogged in", "auth.rs", 10))?;
        sink.flush()?;

        let content = fs::read_to_string(&log_path)?;
        let parsed: serde_json::Value = serde_json::from_str(content.trim())?;
        assert_eq!(parsed["message"], "User\nlogged in");
        assert_eq!(parsed["severity"], "Info");
        assert_eq!(parsed["subsystem"], "com.example");
        assert_eq!(parsed["category"], "auth");
        assert_eq!(parsed["line"], 10);
        assert!(parsed["timestamp"].is_string());
        Ok(())
    }

    #[test]
    fn test_json_sink_one_object_per_line() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("multi.jsonl");
        let sink = JsonSink::new(&log_path)?;

        for i in 0..5 {
            let record = LogRecord::new(
                Severity::Debug,
                LogTag::new("loop"),
                format!("Iteration {}", i),
                "loop.rs",
                i,
            );
            sink.write(&record)?;
        }
        sink.flush()?;

        let content = fs::read_to_string(&log_path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line)?;
            assert!(parsed["message"].is_string());
        }
        Ok(())
    }
}
