//! Console sink implementation

use crate::core::{LogRecord, Result, Severity, Sink, Tag, TimestampFormat};
use colored::Colorize;
use std::io::Write;

pub struct ConsoleSink {
    use_colors: bool,
    timestamp_format: TimestampFormat,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            timestamp_format: TimestampFormat::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// Set the timestamp format for this sink
    ///
    /// # Examples
    ///
    /// ```
    /// use tagged_logger::sinks::ConsoleSink;
    /// use tagged_logger::TimestampFormat;
    ///
    /// let sink = ConsoleSink::new()
    ///     .with_timestamp_format(TimestampFormat::Iso8601Micros);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn format_text(&self, record: &LogRecord) -> String {
        let severity = format!("{:7}", record.severity.name());
        let severity = if self.use_colors {
            severity.color(record.severity.color()).to_string()
        } else {
            severity
        };

        format!(
            "[{}] [{}] {}{}:{} - {}",
            self.timestamp_format.now(),
            severity,
            record.tag.prefix(),
            record.file,
            record.line,
            record.sanitized_message()
        )
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&self, record: &LogRecord) -> Result<()> {
        let output = self.format_text(record);

        // Errors go to stderr, everything else to stdout
        match record.severity {
            Severity::Error => writeln!(std::io::stderr().lock(), "{}", output)?,
            _ => writeln!(std::io::stdout().lock(), "{}", output)?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
