//! Clock port

use chrono::{DateTime, Utc};

/// Source of the `started_at` stamp on execution results.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
