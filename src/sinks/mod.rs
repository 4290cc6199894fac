//! Sink implementations

#[cfg(feature = "console")]
pub mod console;
pub mod file;
pub mod json;
pub mod memory;
#[cfg(feature = "network")]
pub mod network;
pub mod rotating_file;

#[cfg(feature = "console")]
pub use console::ConsoleSink;
pub use file::FileSink;
pub use json::JsonSink;
pub use memory::MemorySink;
#[cfg(feature = "network")]
pub use network::NetworkSink;
pub use rotating_file::{RotatingFileSink, RotationPolicy};

pub use crate::core::Sink;

use crate::core::{LogRecord, Tag};

/// Plain-text line shared by the line-oriented sinks:
/// `[timestamp] [SEVERITY] [subsystem/category] file:line - message`
pub(crate) fn text_line(timestamp: &str, record: &LogRecord) -> String {
    format!(
        "[{}] [{:7}] [{}/{}] {}:{} - {}",
        timestamp,
        record.severity.name(),
        record.tag.subsystem(),
        record.tag.name(),
        record.file,
        record.line,
        record.sanitized_message()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogTag, Severity};

    #[test]
    fn test_text_line_layout() {
        let record = LogRecord::new(
            Severity::Info,
            LogTag::with_subsystem("com.example", "http"),
            "GET /\nforged",
            "server.rs",
            9,
        );
        assert_eq!(
            text_line("T", &record),
            "[T] [INFO   ] [com.example/http] server.rs:9 - GET /\\nforged"
        );
    }
}
