//! Core dispatcher types and traits

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod platform;
pub mod record;
pub mod severity;
pub mod sink;
pub mod tag;
pub mod timestamp;

pub use config::{DispatcherConfig, PlatformChannelKind};
pub use dispatcher::{Dispatcher, DispatcherBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use error::{LoggerError, Result};
pub use metrics::DispatcherMetrics;
pub use platform::{NullChannel, PlatformChannel, PlatformHandle, PlatformType, StderrChannel};
pub use record::LogRecord;
pub use severity::Severity;
pub use sink::Sink;
pub use tag::{default_prefix, default_subsystem, set_default_subsystem, LogTag, Tag};
pub use timestamp::TimestampFormat;
