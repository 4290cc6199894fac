//! Dispatcher: severity filtering, sink fan-out and platform emission

use super::{
    config::DispatcherConfig,
    error::{LoggerError, Result},
    metrics::DispatcherMetrics,
    platform::{PlatformChannel, PlatformHandle, StderrChannel},
    record::LogRecord,
    severity::Severity,
    sink::Sink,
    tag::{set_default_subsystem, LogTag, Tag},
};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default shutdown timeout for dispatcher cleanup (5 seconds)
///
/// Used when the dispatcher is dropped without an explicit shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

enum Command {
    Record(LogRecord),
    Flush(Sender<Result<()>>),
}

/// State shared between the dispatcher and its worker thread
struct Pipeline {
    sinks: Vec<Arc<dyn Sink>>,
    channel: Arc<dyn PlatformChannel>,
    /// `subsystem.name` -> handle; entries are never removed
    handles: Mutex<HashMap<String, Arc<dyn PlatformHandle>>>,
    metrics: Arc<DispatcherMetrics>,
}

impl Pipeline {
    fn run(&self, receiver: Receiver<Command>) {
        for command in receiver.iter() {
            match command {
                Command::Record(record) => self.dispatch(&record),
                Command::Flush(ack) => {
                    let _ = ack.send(self.flush_sinks());
                }
            }
        }
    }

    /// Write one record to every sink, in registration order, then emit it
    /// through the platform handle for its tag.
    ///
    /// Each sink call is isolated with `catch_unwind`: an error or panic in
    /// one sink is reported and counted, and the remaining sinks still run.
    fn dispatch(&self, record: &LogRecord) {
        let mut has_error = false;

        for (idx, sink) in self.sinks.iter().enumerate() {
            let result = panic::catch_unwind(AssertUnwindSafe(|| sink.write(record)));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Sink #{} ({}) failed: {}", idx, sink.name(), e);
                    self.metrics.record_sink_failure();
                    has_error = true;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Sink #{} ({}) panicked: {}. \
                         Other sinks continue to function.",
                        idx,
                        sink.name(),
                        panic_message(panic_info.as_ref())
                    );
                    self.metrics.record_sink_failure();
                    has_error = true;
                }
            }
        }

        if !has_error {
            self.metrics.record_delivered();
        }

        let Some(handle) = self.resolve_handle(&record.tag) else {
            return;
        };
        let line = record.platform_line();
        let kind = record.severity.platform_type();
        if let Err(panic_info) = panic::catch_unwind(AssertUnwindSafe(|| handle.emit(kind, &line))) {
            eprintln!(
                "[LOGGER CRITICAL] Platform handle for '{}' panicked: {}",
                record.tag.cache_key(),
                panic_message(panic_info.as_ref())
            );
        }
    }

    /// Look up or create the platform handle for a tag.
    ///
    /// The lock covers only the lookup-or-insert; emission happens after it
    /// is released. A channel that panics while creating a handle leaves the
    /// cache untouched and the record is not emitted.
    fn resolve_handle(&self, tag: &LogTag) -> Option<Arc<dyn PlatformHandle>> {
        let key = tag.cache_key();
        let mut handles = self.handles.lock();
        if let Some(handle) = handles.get(&key) {
            return Some(Arc::clone(handle));
        }

        let created = panic::catch_unwind(AssertUnwindSafe(|| {
            self.channel.handle(tag.subsystem(), tag.name())
        }));
        match created {
            Ok(handle) => {
                self.metrics.record_handle_created();
                handles.insert(key, Arc::clone(&handle));
                Some(handle)
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Platform channel panicked creating handle for '{}': {}",
                    key,
                    panic_message(panic_info.as_ref())
                );
                None
            }
        }
    }

    /// Flush every sink, returning the first error after trying all of them
    fn flush_sinks(&self) -> Result<()> {
        let mut first_error = None;

        for (idx, sink) in self.sinks.iter().enumerate() {
            match panic::catch_unwind(AssertUnwindSafe(|| sink.flush())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Sink #{} ({}) flush failed: {}", idx, sink.name(), e);
                    first_error.get_or_insert(e);
                }
                Err(panic_info) => {
                    let msg = panic_message(panic_info.as_ref());
                    eprintln!(
                        "[LOGGER CRITICAL] Sink #{} ({}) panicked during flush: {}",
                        idx,
                        sink.name(),
                        msg
                    );
                    first_error.get_or_insert(LoggerError::writer(format!(
                        "sink '{}' panicked during flush: {}",
                        sink.name(),
                        msg
                    )));
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Filters log calls by severity and fans accepted records out to sinks
/// and the platform channel.
///
/// Entry points never block on output: accepted records are queued for a
/// single background worker which drains them in submission order.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tagged_logger::prelude::*;
///
/// let capture = Arc::new(MemorySink::new());
/// let dispatcher = Dispatcher::builder()
///     .min_severity(Severity::Info)
///     .shared_sink(capture.clone())
///     .platform_channel(NullChannel)
///     .build();
///
/// let tag = LogTag::with_subsystem("com.example.app", "startup");
/// dispatcher.debug(&tag, || "not evaluated");
/// dispatcher.info(&tag, || format!("listening on port {}", 8080));
/// dispatcher.flush().unwrap();
///
/// assert_eq!(capture.messages(), vec!["listening on port 8080".to_string()]);
/// ```
pub struct Dispatcher {
    min_severity: Severity,
    pipeline: Arc<Pipeline>,
    sender: RwLock<Option<Sender<Command>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Dispatcher {
    /// Create a builder for Dispatcher
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    fn start(
        min_severity: Severity,
        sinks: Vec<Arc<dyn Sink>>,
        channel: Arc<dyn PlatformChannel>,
    ) -> Self {
        let pipeline = Arc::new(Pipeline {
            sinks,
            channel,
            handles: Mutex::new(HashMap::new()),
            metrics: Arc::new(DispatcherMetrics::new()),
        });

        let (sender, receiver) = unbounded();
        let worker_pipeline = Arc::clone(&pipeline);
        let spawned = thread::Builder::new()
            .name("tagged-logger-dispatch".to_string())
            .spawn(move || worker_pipeline.run(receiver));

        let (sender, worker) = match spawned {
            Ok(handle) => (Some(sender), Some(handle)),
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] Failed to start dispatcher worker: {}. \
                     Accepted records will be dropped.",
                    e
                );
                (None, None)
            }
        };

        Self {
            min_severity,
            pipeline,
            sender: RwLock::new(sender),
            worker: Mutex::new(worker),
        }
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    /// Whether a call at `severity` would be accepted
    #[inline]
    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity >= self.min_severity
    }

    /// Registered sinks, in fan-out order
    pub fn sinks(&self) -> &[Arc<dyn Sink>] {
        &self.pipeline.sinks
    }

    /// Number of platform handles created so far
    pub fn cached_handles(&self) -> usize {
        self.pipeline.handles.lock().len()
    }

    /// Get the dispatcher metrics
    ///
    /// # Example
    ///
    /// ```
    /// use tagged_logger::prelude::*;
    ///
    /// let dispatcher = Dispatcher::builder()
    ///     .min_severity(Severity::Warning)
    ///     .platform_channel(NullChannel)
    ///     .build();
    /// dispatcher.info(&LogTag::new("app"), || "dropped by the filter");
    ///
    /// assert_eq!(dispatcher.metrics().filtered(), 1);
    /// ```
    pub fn metrics(&self) -> &DispatcherMetrics {
        &self.pipeline.metrics
    }

    /// Log at `severity`, attributing the record to the caller's location.
    ///
    /// `message` runs at most once, and only if the call passes the
    /// severity filter.
    #[track_caller]
    pub fn log<T, F, M>(&self, severity: Severity, tag: &T, message: F)
    where
        T: Tag + ?Sized,
        F: FnOnce() -> M,
        M: Into<String>,
    {
        let location = panic::Location::caller();
        self.log_at(severity, tag, message, location.file(), location.line());
    }

    /// Log with explicit call-site metadata
    pub fn log_at<T, F, M>(&self, severity: Severity, tag: &T, message: F, file: &str, line: u32)
    where
        T: Tag + ?Sized,
        F: FnOnce() -> M,
        M: Into<String>,
    {
        if !self.is_enabled(severity) {
            self.pipeline.metrics.record_filtered();
            return;
        }
        self.pipeline.metrics.record_accepted();

        let record = LogRecord::new(severity, LogTag::from_tag(tag), message(), file, line);
        self.submit(record);
    }

    #[inline]
    #[track_caller]
    pub fn debug<T, F, M>(&self, tag: &T, message: F)
    where
        T: Tag + ?Sized,
        F: FnOnce() -> M,
        M: Into<String>,
    {
        self.log(Severity::Debug, tag, message);
    }

    #[inline]
    #[track_caller]
    pub fn info<T, F, M>(&self, tag: &T, message: F)
    where
        T: Tag + ?Sized,
        F: FnOnce() -> M,
        M: Into<String>,
    {
        self.log(Severity::Info, tag, message);
    }

    #[inline]
    #[track_caller]
    pub fn warning<T, F, M>(&self, tag: &T, message: F)
    where
        T: Tag + ?Sized,
        F: FnOnce() -> M,
        M: Into<String>,
    {
        self.log(Severity::Warning, tag, message);
    }

    #[inline]
    #[track_caller]
    pub fn error<T, F, M>(&self, tag: &T, message: F)
    where
        T: Tag + ?Sized,
        F: FnOnce() -> M,
        M: Into<String>,
    {
        self.log(Severity::Error, tag, message);
    }

    fn submit(&self, record: LogRecord) {
        let sender = self.sender.read();
        let queued = match sender.as_ref() {
            Some(sender) => sender.send(Command::Record(record)).is_ok(),
            None => false,
        };
        if !queued {
            self.pipeline.metrics.record_dropped();
        }
    }

    /// Wait until every record queued before this call has been written,
    /// then flush all sinks.
    ///
    /// Must not be called from inside a sink: the worker would wait on itself.
    ///
    /// # Errors
    ///
    /// Returns the first sink flush error, or an error if the worker exited
    /// while the dispatcher was still accepting records.
    pub fn flush(&self) -> Result<()> {
        let sender = self.sender.read().clone();
        let Some(sender) = sender else {
            return self.pipeline.flush_sinks();
        };

        let (ack_sender, ack_receiver) = bounded(1);
        if sender.send(Command::Flush(ack_sender)).is_err() {
            return Err(LoggerError::other(
                "dispatcher worker is not running; queued records were lost",
            ));
        }
        drop(sender);

        ack_receiver
            .recv()
            .map_err(|_| LoggerError::other("dispatcher worker stopped before flushing"))?
    }

    /// Stop accepting records, drain the queue and flush sinks.
    ///
    /// Records logged after shutdown are dropped and counted in
    /// [`DispatcherMetrics::dropped`].
    ///
    /// # Returns
    ///
    /// `true` if the worker drained within `timeout` and the final flush
    /// succeeded, `false` otherwise
    pub fn shutdown(&self, timeout: Duration) -> bool {
        // Closing the channel lets the worker finish the backlog and exit
        drop(self.sender.write().take());

        if let Some(handle) = self.worker.lock().take() {
            let start = std::time::Instant::now();

            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!(
                            "[LOGGER ERROR] Dispatcher worker panicked during shutdown: {:?}",
                            e
                        );
                        return false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] Dispatcher worker did not finish within {:?}. \
                         Some records may be lost.",
                        timeout
                    );
                    return false;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }

        if let Err(e) = self.pipeline.flush_sinks() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
            return false;
        }

        true
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        let dropped = self.pipeline.metrics.dropped();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Dispatcher shutting down with {} dropped records",
                dropped
            );
        }
    }
}

/// Builder for constructing a [`Dispatcher`] with a fluent API
///
/// The builder is a plain value: cloning it and adding more sinks leaves the
/// original untouched, and sinks registered as shared `Arc`s may appear in
/// several dispatchers.
///
/// # Example
/// ```
/// use tagged_logger::prelude::*;
///
/// let dispatcher = Dispatcher::builder()
///     .min_severity(Severity::Debug)
///     .sink(MemorySink::with_capacity(256))
///     .platform_channel(StderrChannel::new())
///     .build();
/// ```
#[derive(Clone)]
pub struct DispatcherBuilder {
    min_severity: Severity,
    sinks: Vec<Arc<dyn Sink>>,
    channel: Arc<dyn PlatformChannel>,
}

impl DispatcherBuilder {
    /// Create a new builder: `Info` threshold, no sinks, stderr platform channel
    pub fn new() -> Self {
        Self {
            min_severity: Severity::Info,
            sinks: Vec::new(),
            channel: Arc::new(StderrChannel::new()),
        }
    }

    /// Set minimum severity
    #[must_use = "builder methods return a new value"]
    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Add a sink owned by the dispatcher
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Add a sink that is also referenced elsewhere.
    ///
    /// Registering the same sink twice is allowed; it then receives every
    /// record twice.
    #[must_use = "builder methods return a new value"]
    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Set the platform channel
    #[must_use = "builder methods return a new value"]
    pub fn platform_channel<C: PlatformChannel + 'static>(mut self, channel: C) -> Self {
        self.channel = Arc::new(channel);
        self
    }

    /// Set a platform channel that is also referenced elsewhere
    #[must_use = "builder methods return a new value"]
    pub fn shared_platform_channel(mut self, channel: Arc<dyn PlatformChannel>) -> Self {
        self.channel = channel;
        self
    }

    /// Apply a loaded configuration.
    ///
    /// Sets the threshold and platform channel, and installs the configured
    /// subsystem as the process default if none was installed yet.
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: &DispatcherConfig) -> Self {
        self.min_severity = config.min_severity;
        self.channel = config.platform.channel(config.platform_debug);
        if let Some(ref subsystem) = config.subsystem {
            set_default_subsystem(subsystem.clone());
        }
        self
    }

    /// Build the Dispatcher and start its worker
    pub fn build(self) -> Dispatcher {
        Dispatcher::start(self.min_severity, self.sinks, self.channel)
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
