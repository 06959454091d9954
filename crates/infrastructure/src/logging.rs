//! Tracing setup.
//!
//! Logs go to stderr through a fmt layer filtered by `WIREPAD_LOG` (or
//! `RUST_LOG`). An optional [`InspectorLayer`] keeps the most recent events
//! in memory so they can be shown after a command finishes.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "WIREPAD_LOG";

/// Default number of events kept by the inspector
pub const DEFAULT_INSPECTOR_CAPACITY: usize = 500;

/// Logging setup errors
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber was already installed
    #[error("Failed to initialise logging: {0}")]
    Init(#[from] TryInitError),
}

/// Installs the global subscriber.
///
/// The filter comes from `WIREPAD_LOG`, then `RUST_LOG`. Without either, the
/// level follows `verbosity`: 0 is info, 1 is debug, more is trace.
///
/// # Errors
///
/// Returns [`LoggingError::Init`] if a global subscriber is already set.
pub fn init_logging(verbosity: u8, inspector: Option<InspectorLayer>) -> Result<(), LoggingError> {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(inspector)
        .try_init()?;
    Ok(())
}

/// One captured event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorEntry {
    /// When the event was recorded
    pub timestamp: DateTime<Utc>,
    /// Event level
    pub level: Level,
    /// Module path that emitted the event
    pub target: String,
    /// The `message` field
    pub message: String,
    /// Other fields, rendered as `name=value`
    pub fields: Vec<String>,
}

impl fmt::Display for InspectorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>5} {}: {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.level,
            self.target,
            self.message
        )?;
        for field in &self.fields {
            write!(f, " {field}")?;
        }
        Ok(())
    }
}

/// Layer that keeps the last `capacity` events in a ring buffer.
///
/// Clones share the same buffer, so one handle can be installed in the
/// subscriber while another reads it.
#[derive(Debug, Clone)]
pub struct InspectorLayer {
    buffer: Arc<Mutex<VecDeque<InspectorEntry>>>,
    capacity: usize,
}

impl Default for InspectorLayer {
    fn default() -> Self {
        Self::new(DEFAULT_INSPECTOR_CAPACITY)
    }
}

impl InspectorLayer {
    /// Creates an empty inspector holding at most `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Copies the buffered events, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<InspectorEntry> {
        self.buffer
            .lock()
            .map(|buffer| buffer.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drops every buffered event.
    pub fn clear(&self) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.clear();
        }
    }

    fn push(&self, entry: InspectorEntry) {
        if self.capacity == 0 {
            return;
        }
        if let Ok(mut buffer) = self.buffer.lock() {
            while buffer.len() >= self.capacity {
                buffer.pop_front();
            }
            buffer.push_back(entry);
        }
    }
}

impl<S: Subscriber> Layer<S> for InspectorLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);

        self.push(InspectorEntry {
            timestamp: Utc::now(),
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: Vec<String>,
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={value}", field.name()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={value:?}", field.name()));
        }
    }
}
