//! Registry log events and their subscription bus
//!
//! A registry pushes events while it resolves sources and lists versions.
//! Listeners attach through [`LogBus::subscribe`] and stay attached for as
//! long as the returned [`Subscription`] is alive.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Severity of a registry event, in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Action,
    Warn,
    Conflict,
    Error,
}

impl LogLevel {
    /// Numeric severity
    pub fn value(&self) -> u8 {
        match self {
            LogLevel::Debug => 0,
            LogLevel::Info => 1,
            LogLevel::Action => 2,
            LogLevel::Warn => 3,
            LogLevel::Conflict => 4,
            LogLevel::Error => 5,
        }
    }

    /// Lower-case level name
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Action => "action",
            LogLevel::Warn => "warn",
            LogLevel::Conflict => "conflict",
            LogLevel::Error => "error",
        }
    }

    /// Returns true for levels printed through the error method of a channel
    pub fn is_error(&self) -> bool {
        *self >= LogLevel::Warn
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name is not recognised
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log level '{0}'")]
pub struct UnknownLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "action" => Ok(LogLevel::Action),
            "warn" => Ok(LogLevel::Warn),
            "conflict" => Ok(LogLevel::Conflict),
            "error" => Ok(LogLevel::Error),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}

/// A log record pushed by a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub level: LogLevel,
    /// Short tag, e.g. `resolve` or `ls-remote`
    pub id: String,
    /// Package or source the event is about
    pub name: String,
    pub message: String,
}

impl LogEvent {
    pub fn new(
        level: LogLevel,
        id: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            id: id.into(),
            name: name.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: bower {} [{}] - {}",
            self.name, self.level, self.id, self.message
        )
    }
}

type Listener = Arc<dyn Fn(&LogEvent) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
}

/// Broadcast channel for registry log events
#[derive(Clone, Default)]
pub struct LogBus {
    inner: Arc<BusInner>,
}

impl LogBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener until the returned guard is dropped
    #[must_use = "the listener is detached as soon as the subscription is dropped"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&LogEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));

        Subscription {
            bus: Arc::clone(&self.inner),
            id,
        }
    }

    /// Deliver an event to every attached listener
    pub fn emit(&self, event: LogEvent) {
        // Listeners run outside the lock so they may subscribe or emit themselves
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(&event);
        }
    }

    /// Shorthand for emitting a freshly built event
    pub fn log(
        &self,
        level: LogLevel,
        id: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.emit(LogEvent::new(level, id, name, message));
    }

    /// Number of attached listeners
    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl fmt::Debug for LogBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Guard keeping a listener attached to a [`LogBus`]
pub struct Subscription {
    bus: Arc<BusInner>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(id, _)| *id != self.id);
    }
}
