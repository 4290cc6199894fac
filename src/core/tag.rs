//! Tags categorize log records by subsystem and category name.
//!
//! A tag has no identity beyond its `(subsystem, name)` pair: two tag values
//! with the same pair share one platform handle in a dispatcher.
//!
//! Concrete tags that do not carry their own subsystem or prefix call
//! [`default_subsystem`] and [`default_prefix`] when they are constructed.
//!
//! ```
//! use tagged_logger::{LogTag, Tag};
//!
//! let tag = LogTag::with_subsystem("com.example.app", "network");
//! assert_eq!(tag.prefix(), "[NETWORK] ");
//! assert_eq!(tag.cache_key(), "com.example.app.network");
//! ```

use std::sync::{Arc, OnceLock};

/// Environment variable consulted when no subsystem was installed
pub const SUBSYSTEM_ENV_VAR: &str = "TAGGED_LOGGER_SUBSYSTEM";

/// Subsystem used when neither an installed value nor the environment supplies one
pub const PLACEHOLDER_SUBSYSTEM: &str = "unknown.subsystem";

static DEFAULT_SUBSYSTEM: OnceLock<String> = OnceLock::new();

/// Categorization attached to every log record
pub trait Tag: Send + Sync {
    /// Grouping identifier, conventionally reverse-DNS
    fn subsystem(&self) -> &str;

    /// Category name within the subsystem
    fn name(&self) -> &str;

    /// Pre-rendered decoration placed in front of formatted lines
    fn prefix(&self) -> &str;

    /// Key identifying the platform handle for this tag
    fn cache_key(&self) -> String {
        cache_key(self.subsystem(), self.name())
    }
}

impl<T: Tag + ?Sized> Tag for &T {
    fn subsystem(&self) -> &str {
        (**self).subsystem()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn prefix(&self) -> &str {
        (**self).prefix()
    }
}

impl<T: Tag + ?Sized> Tag for Arc<T> {
    fn subsystem(&self) -> &str {
        (**self).subsystem()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn prefix(&self) -> &str {
        (**self).prefix()
    }
}

/// Install the process-wide subsystem identifier.
///
/// Only the first call has an effect; returns `false` if a value was
/// already installed.
pub fn set_default_subsystem(subsystem: impl Into<String>) -> bool {
    DEFAULT_SUBSYSTEM.set(subsystem.into()).is_ok()
}

/// Process-wide subsystem identifier.
///
/// Resolves, in order: the value installed with [`set_default_subsystem`],
/// the `TAGGED_LOGGER_SUBSYSTEM` environment variable, and finally
/// [`PLACEHOLDER_SUBSYSTEM`].
pub fn default_subsystem() -> String {
    if let Some(subsystem) = DEFAULT_SUBSYSTEM.get() {
        return subsystem.clone();
    }

    match std::env::var(SUBSYSTEM_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => PLACEHOLDER_SUBSYSTEM.to_string(),
    }
}

/// Default prefix for a category name: `"[" + NAME + "] "`
pub fn default_prefix(name: &str) -> String {
    format!("[{}] ", name.to_uppercase())
}

pub(crate) fn cache_key(subsystem: &str, name: &str) -> String {
    let mut key = String::with_capacity(subsystem.len() + name.len() + 1);
    key.push_str(subsystem);
    key.push('.');
    key.push_str(name);
    key
}

/// Owned tag value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogTag {
    subsystem: String,
    name: String,
    prefix: String,
}

impl LogTag {
    /// Tag in the default subsystem with the default prefix
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_subsystem(default_subsystem(), name)
    }

    /// Tag with an explicit subsystem and the default prefix
    pub fn with_subsystem(subsystem: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        let prefix = default_prefix(&name);
        Self {
            subsystem: subsystem.into(),
            name,
            prefix,
        }
    }

    /// Override the rendered prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Snapshot any tag implementation into an owned value
    pub fn from_tag<T: Tag + ?Sized>(tag: &T) -> Self {
        Self {
            subsystem: tag.subsystem().to_string(),
            name: tag.name().to_string(),
            prefix: tag.prefix().to_string(),
        }
    }
}

impl Tag for LogTag {
    fn subsystem(&self) -> &str {
        &self.subsystem
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }
}
