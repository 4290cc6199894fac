//! # Tagged Logger
//!
//! A logging facade that filters tagged messages by severity and fans
//! accepted records out to pluggable sinks and a platform logging channel.
//!
//! ## Features
//!
//! - **Lazy messages**: message closures only run when the severity passes
//!   the dispatcher's threshold
//! - **Non-blocking**: accepted records are written by a background worker,
//!   in submission order
//! - **Tags**: every record carries a subsystem and category; platform
//!   handles are cached per `(subsystem, category)`
//! - **Sinks**: console, file, rotating file, JSON lines, TCP, in-memory
//!
//! ```
//! use tagged_logger::prelude::*;
//!
//! let dispatcher = Dispatcher::builder()
//!     .min_severity(Severity::Info)
//!     .sink(MemorySink::new())
//!     .platform_channel(NullChannel)
//!     .build();
//!
//! let tag = LogTag::with_subsystem("com.example.app", "startup");
//! dispatcher.info(&tag, || "ready");
//! ```

pub mod macros;

pub mod core;
pub mod global;
pub mod sinks;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    pub use crate::sinks::{FileSink, MemorySink};
    pub use crate::core::{
        Dispatcher, DispatcherBuilder, DispatcherConfig, LogRecord, LogTag, LoggerError,
        NullChannel, PlatformChannel, PlatformHandle, PlatformType, Result, Severity, Sink,
        StderrChannel, Tag, TimestampFormat,
    };
}

#[cfg(feature = "console")]
pub use sinks::ConsoleSink;
pub use sinks::{FileSink, JsonSink, MemorySink, RotatingFileSink, RotationPolicy};
pub use core::{
    default_prefix, default_subsystem, set_default_subsystem, Dispatcher, DispatcherBuilder,
    DispatcherConfig, DispatcherMetrics, LogRecord, LogTag, LoggerError, NullChannel,
    PlatformChannel, PlatformChannelKind, PlatformHandle, PlatformType, Result, Severity, Sink,
    StderrChannel, Tag, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
};
