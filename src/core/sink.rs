//! Sink trait for log output destinations

use super::{error::Result, record::LogRecord};

/// An output destination for accepted records.
///
/// Sinks are shared (`Arc<dyn Sink>`) and called through `&self`, so any
/// mutable state lives behind the sink's own lock. Errors returned here stay
/// inside the dispatcher worker; they never reach the logging call site.
pub trait Sink: Send + Sync {
    fn write(&self, record: &LogRecord) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
