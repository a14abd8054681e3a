//! Log backends
//!
//! The request logger never writes anywhere itself; every line is handed to a
//! [`LogSink`]. [`TracingSink`] forwards to `tracing`, [`MemorySink`] keeps the
//! entries for inspection.

use super::context::LogContext;
use std::sync::{Mutex, PoisonError};
use tracing::Level;

/// One emitted line.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub context: LogContext,
}

/// Destination for log entries. Implementations must not panic.
pub trait LogSink: Send + Sync + 'static {
    fn log(&self, entry: &LogEntry);
}

/// Emits entries as `tracing` events under the `request_logging` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

macro_rules! emit {
    ($level:expr, $entry:expr, $args:expr, $extra:expr) => {
        tracing::event!(
            target: "request_logging",
            $level,
            args = %$args,
            extra = %$extra,
            exc_info = $entry.context.exc_info,
            "{}",
            $entry.message
        )
    };
}

impl LogSink for TracingSink {
    fn log(&self, entry: &LogEntry) {
        let args = serde_json::to_string(&entry.context.args).unwrap_or_default();
        let extra = serde_json::to_string(&entry.context.extra).unwrap_or_default();

        if entry.level == Level::ERROR {
            emit!(Level::ERROR, entry, args, extra);
        } else if entry.level == Level::WARN {
            emit!(Level::WARN, entry, args, extra);
        } else if entry.level == Level::INFO {
            emit!(Level::INFO, entry, args, extra);
        } else if entry.level == Level::DEBUG {
            emit!(Level::DEBUG, entry, args, extra);
        } else {
            emit!(Level::TRACE, entry, args, extra);
        }
    }
}

/// Collects entries in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.message.clone()).collect()
    }

    /// All messages joined with a space.
    pub fn text(&self) -> String {
        self.messages().join(" ")
    }

    pub fn levels(&self) -> Vec<Level> {
        self.lock().iter().map(|e| e.level).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn log(&self, entry: &LogEntry) {
        self.lock().push(entry.clone());
    }
}
