//! Logging macros with `format!`-style arguments.
//!
//! Formatting is wrapped in a closure, so the arguments are only rendered
//! when the dispatcher accepts the severity.
//!
//! # Examples
//!
//! ```
//! use tagged_logger::prelude::*;
//! use tagged_logger::{info, debug};
//!
//! let dispatcher = Dispatcher::builder().platform_channel(NullChannel).build();
//! let tag = LogTag::with_subsystem("com.example.app", "server");
//!
//! info!(dispatcher, tag, "Server started");
//!
//! let port = 8080;
//! info!(dispatcher, tag, "Server listening on port {}", port);
//!
//! // Below the Info threshold: the arguments are never formatted
//! debug!(dispatcher, tag, "Request body: {:?}", vec![1, 2, 3]);
//! ```

/// Log a message at an explicit severity.
///
/// # Examples
///
/// ```
/// # use tagged_logger::prelude::*;
/// # let dispatcher = Dispatcher::builder().platform_channel(NullChannel).build();
/// # let tag = LogTag::new("doc");
/// use tagged_logger::log;
/// log!(dispatcher, Severity::Info, tag, "Simple message");
/// log!(dispatcher, Severity::Error, tag, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($dispatcher:expr, $severity:expr, $tag:expr, $($arg:tt)+) => {
        $dispatcher.log($severity, &$tag, || format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($dispatcher:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::Severity::Debug, $tag, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($dispatcher:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::Severity::Info, $tag, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use tagged_logger::prelude::*;
/// # let dispatcher = Dispatcher::builder().platform_channel(NullChannel).build();
/// # let tag = LogTag::new("doc");
/// use tagged_logger::warning;
/// warning!(dispatcher, tag, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($dispatcher:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::Severity::Warning, $tag, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($dispatcher:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::Severity::Error, $tag, $($arg)+)
    };
}
