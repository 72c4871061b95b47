use chrono::{DateTime, Utc};

/// Port for the current wall-clock time used by the recency policy.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}
