//! Platform logging channel.
//!
//! The dispatcher forwards every accepted record to a host logging facility
//! keyed by `(subsystem, category)`. A [`PlatformChannel`] hands out one
//! [`PlatformHandle`] per pair; the dispatcher caches handles so each pair is
//! requested from the channel once.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Message types understood by the platform channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformType {
    Debug,
    Info,
    /// Visible by default, neither informational nor an error
    Default,
    Error,
    Fault,
}

impl PlatformType {
    pub fn to_str(&self) -> &'static str {
        match self {
            PlatformType::Debug => "debug",
            PlatformType::Info => "info",
            PlatformType::Default => "default",
            PlatformType::Error => "error",
            PlatformType::Fault => "fault",
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Handle bound to one `(subsystem, category)` pair
pub trait PlatformHandle: Send + Sync {
    /// Emit a preformatted line. Failures are absorbed by the handle.
    fn emit(&self, kind: PlatformType, line: &str);
}

/// Factory for platform handles
pub trait PlatformChannel: Send + Sync {
    fn handle(&self, subsystem: &str, category: &str) -> Arc<dyn PlatformHandle>;
}

/// Platform channel that writes to the process's stderr.
///
/// Lines look like `default com.example[net] [NET] [WARNING] main.rs:3 : msg`.
/// `debug` lines are hidden unless enabled, mirroring host facilities that
/// do not persist debug messages by default.
#[derive(Debug, Clone, Default)]
pub struct StderrChannel {
    show_debug: bool,
}

impl StderrChannel {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_debug(mut self, show_debug: bool) -> Self {
        self.show_debug = show_debug;
        self
    }
}

impl PlatformChannel for StderrChannel {
    fn handle(&self, subsystem: &str, category: &str) -> Arc<dyn PlatformHandle> {
        Arc::new(StderrHandle {
            label: format!("{}[{}]", subsystem, category),
            show_debug: self.show_debug,
        })
    }
}

struct StderrHandle {
    label: String,
    show_debug: bool,
}

impl PlatformHandle for StderrHandle {
    fn emit(&self, kind: PlatformType, line: &str) {
        if kind == PlatformType::Debug && !self.show_debug {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{:<7} {} {}", kind.to_str(), self.label, line);
    }
}

/// Platform channel that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChannel;

impl PlatformChannel for NullChannel {
    fn handle(&self, _subsystem: &str, _category: &str) -> Arc<dyn PlatformHandle> {
        Arc::new(NullChannel)
    }
}

impl PlatformHandle for NullChannel {
    fn emit(&self, _kind: PlatformType, _line: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(PlatformType::Default.to_str(), "default");
        assert_eq!(PlatformType::Error.to_string(), "error");
    }

    #[test]
    fn test_null_channel_accepts_everything() {
        let handle = NullChannel.handle("com.example", "net");
        handle.emit(PlatformType::Fault, "ignored");
    }

    #[test]
    fn test_stderr_channel_handles_are_independent() {
        let channel = StderrChannel::new().with_debug(true);
        let a = channel.handle("com.example", "a");
        let b = channel.handle("com.example", "b");
        assert!(!Arc::ptr_eq(&a, &b));
        a.emit(PlatformType::Debug, "visible debug line");
        b.emit(PlatformType::Info, "info line");
    }
}
