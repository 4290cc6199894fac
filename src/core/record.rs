//! Log record structure

use super::severity::Severity;
use super::tag::{LogTag, Tag};
use serde::Serialize;
use std::fmt;

/// A single accepted log call.
///
/// Records carry no timestamp; each sink stamps the time it writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub severity: Severity,
    pub tag: LogTag,
    pub message: String,
    pub file: String,
    pub line: u32,
}

impl LogRecord {
    pub fn new(
        severity: Severity,
        tag: LogTag,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            severity,
            tag,
            message: message.into(),
            file: file.into(),
            line,
        }
    }

    /// Line emitted through the platform channel:
    /// `prefix + "[" + SEVERITY + "] " + file + ":" + line + " : " + message`
    pub fn platform_line(&self) -> String {
        format!(
            "{}[{}] {}:{} : {}",
            self.tag.prefix(),
            self.severity,
            self.file,
            self.line,
            self.message
        )
    }

    /// Message with line breaks and tabs escaped.
    ///
    /// Line-oriented sinks use this so a message cannot forge extra entries.
    pub fn sanitized_message(&self) -> String {
        self.message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    /// Borrowed serializable view, used by the JSON sink
    pub(crate) fn view<'a>(&'a self, timestamp: &'a str) -> RecordView<'a> {
        RecordView {
            timestamp,
            severity: self.severity,
            subsystem: self.tag.subsystem(),
            category: self.tag.name(),
            file: &self.file,
            line: self.line,
            message: &self.message,
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.platform_line())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RecordView<'a> {
    pub timestamp: &'a str,
    pub severity: Severity,
    pub subsystem: &'a str,
    pub category: &'a str,
    pub file: &'a str,
    pub line: u32,
    pub message: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(message: &str) -> LogRecord {
        LogRecord::new(
            Severity::Warning,
            LogTag::with_subsystem("com.example", "net"),
            message,
            "src/main.rs",
            42,
        )
    }

    #[test]
    fn test_platform_line_format() {
        assert_eq!(
            record("timeout").platform_line(),
            "[NET] [WARNING] src/main.rs:42 : timeout"
        );
    }

    #[test]
    fn test_platform_line_uses_custom_prefix() {
        let mut r = record("x");
        r.tag = r.tag.with_prefix("");
        assert_eq!(r.platform_line(), "[WARNING] src/main.rs:42 : x");
    }

    #[test]
    fn test_sanitized_message() {
        let r = record("a\nb\tc\rd");
        assert_eq!(r.sanitized_message(), "a\\nb\\tc\\rd");
        assert_eq!(r.message, "a\nb\tc\rd");
    }

    #[test]
    fn test_view_serializes() {
        let r = record("hello");
        let json = serde_json::to_string(&r.view("t0")).unwrap();
        assert!(json.contains("\"severity\":\"Warning\""));
        assert!(json.contains("\"category\":\"net\""));
        assert!(json.contains("\"line\":42"));
    }
}
