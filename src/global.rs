//! Process-wide dispatcher for ambient call sites.
//!
//! Passing an `Arc<Dispatcher>` to the code that logs is the primary way to
//! use this crate. The global handle exists for call sites where threading
//! a dispatcher through is impractical.
//!
//! - [`init`] installs the dispatcher once; a second call fails with
//!   [`LoggerError::AlreadyInitialized`].
//! - [`reconfigure`] replaces the installed dispatcher explicitly.
//! - [`dispatcher`] returns the installed dispatcher, installing one built
//!   from [`DispatcherConfig::from_env`] on first use if nothing was set.
//!
//! A replaced dispatcher keeps running until the last `Arc` to it is
//! dropped, at which point it drains its queue and stops.
//!
//! ```
//! use tagged_logger::{global, LogTag};
//!
//! let tag = LogTag::with_subsystem("com.example.app", "boot");
//! global::info(&tag, || "configuration loaded");
//! ```

use crate::core::{Dispatcher, DispatcherConfig, LoggerError, Result, Severity, Tag};
use parking_lot::{const_rwlock, RwLock};
use std::sync::Arc;

static GLOBAL: RwLock<Option<Arc<Dispatcher>>> = const_rwlock(None);

/// Install the global dispatcher.
///
/// Fails if a dispatcher was already installed, either by an earlier
/// `init`/`reconfigure` or lazily by [`dispatcher`]. The rejected dispatcher
/// is shut down after the global lock is released.
pub fn init(dispatcher: Dispatcher) -> Result<Arc<Dispatcher>> {
    let mut global = GLOBAL.write();
    if global.is_some() {
        drop(global);
        drop(dispatcher);
        return Err(LoggerError::AlreadyInitialized);
    }
    let dispatcher = Arc::new(dispatcher);
    *global = Some(Arc::clone(&dispatcher));
    Ok(dispatcher)
}

/// Replace the global dispatcher, returning the previous one if any
pub fn reconfigure(dispatcher: Dispatcher) -> Option<Arc<Dispatcher>> {
    GLOBAL.write().replace(Arc::new(dispatcher))
}

pub fn is_initialized() -> bool {
    GLOBAL.read().is_some()
}

/// The global dispatcher
pub fn dispatcher() -> Arc<Dispatcher> {
    if let Some(dispatcher) = GLOBAL.read().as_ref() {
        return Arc::clone(dispatcher);
    }

    let mut global = GLOBAL.write();
    let dispatcher = global.get_or_insert_with(|| Arc::new(default_dispatcher()));
    Arc::clone(dispatcher)
}

fn default_dispatcher() -> Dispatcher {
    let config = DispatcherConfig::from_env().unwrap_or_else(|e| {
        eprintln!("[LOGGER WARNING] Ignoring logger environment: {}", e);
        DispatcherConfig::default()
    });
    Dispatcher::builder().config(&config).build()
}

#[track_caller]
pub fn log<T, F, M>(severity: Severity, tag: &T, message: F)
where
    T: Tag + ?Sized,
    F: FnOnce() -> M,
    M: Into<String>,
{
    dispatcher().log(severity, tag, message);
}

#[track_caller]
pub fn debug<T, F, M>(tag: &T, message: F)
where
    T: Tag + ?Sized,
    F: FnOnce() -> M,
    M: Into<String>,
{
    dispatcher().log(Severity::Debug, tag, message);
}

#[track_caller]
pub fn info<T, F, M>(tag: &T, message: F)
where
    T: Tag + ?Sized,
    F: FnOnce() -> M,
    M: Into<String>,
{
    dispatcher().log(Severity::Info, tag, message);
}

#[track_caller]
pub fn warning<T, F, M>(tag: &T, message: F)
where
    T: Tag + ?Sized,
    F: FnOnce() -> M,
    M: Into<String>,
{
    dispatcher().log(Severity::Warning, tag, message);
}

#[track_caller]
pub fn error<T, F, M>(tag: &T, message: F)
where
    T: Tag + ?Sized,
    F: FnOnce() -> M,
    M: Into<String>,
{
    dispatcher().log(Severity::Error, tag, message);
}
