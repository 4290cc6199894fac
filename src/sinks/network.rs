//! Network sink for remote logging
//!
//! Sends one text line per record to a remote server over TCP, for
//! centralized collection.

use super::text_line;
use crate::core::{LogRecord, LoggerError, Result, Sink, TimestampFormat};
use parking_lot::Mutex;
use std::io::Write;
use std::net::TcpStream;
use std::time::Duration;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Network sink that sends records to a remote TCP server
///
/// # Example
///
/// ```no_run
/// use tagged_logger::prelude::*;
/// use tagged_logger::sinks::NetworkSink;
///
/// let dispatcher = Dispatcher::builder()
///     .sink(NetworkSink::new("127.0.0.1:8080").expect("log server reachable"))
///     .build();
/// dispatcher.info(&LogTag::new("app"), || "sent to 127.0.0.1:8080");
/// ```
pub struct NetworkSink {
    address: String,
    stream: Mutex<Option<TcpStream>>,
    reconnect_on_error: bool,
    timestamp_format: TimestampFormat,
}

impl NetworkSink {
    /// Connect to `address` (e.g. "localhost:8080")
    pub fn new(address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        let stream = Self::connect(&address)?;

        Ok(Self {
            address,
            stream: Mutex::new(Some(stream)),
            reconnect_on_error: true,
            timestamp_format: TimestampFormat::default(),
        })
    }

    /// Enable or disable reconnecting once after a failed write
    ///
    /// Default: enabled
    #[must_use]
    pub fn with_reconnect(mut self, enable: bool) -> Self {
        self.reconnect_on_error = enable;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn connect(address: &str) -> Result<TcpStream> {
        let stream = TcpStream::connect(address)
            .map_err(|e| LoggerError::network(address, format!("connect failed: {}", e)))?;
        stream.set_write_timeout(Some(IO_TIMEOUT))?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

impl Sink for NetworkSink {
    fn write(&self, record: &LogRecord) -> Result<()> {
        let mut message = text_line(&self.timestamp_format.now(), record);
        message.push('\n');

        let mut stream = self.stream.lock();
        let error = match stream.as_mut() {
            Some(s) => match s.write_all(message.as_bytes()) {
                Ok(()) => return Ok(()),
                Err(e) => LoggerError::network(&self.address, format!("write failed: {}", e)),
            },
            None => LoggerError::network(&self.address, "not connected"),
        };

        *stream = None;
        if !self.reconnect_on_error {
            return Err(error);
        }

        let mut fresh = Self::connect(&self.address).map_err(|reconnect_err| {
            LoggerError::network(
                &self.address,
                format!("{} (reconnect: {})", error, reconnect_err),
            )
        })?;
        fresh.write_all(message.as_bytes())?;
        *stream = Some(fresh);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        if let Some(ref mut stream) = *self.stream.lock() {
            stream.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "network"
    }
}
