//! Visit event model for asynchronous visit recording.

use chrono::{DateTime, Utc};

/// One resolved redirect waiting to be counted.
///
/// Carries the time of the redirect rather than the time of persistence, so
/// `last_clicked_at` reflects when the visitor actually arrived even if the
/// worker is behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitEvent {
    pub code: String,
    pub visited_at: DateTime<Utc>,
}

impl VisitEvent {
    /// Creates an event stamped with the current time.
    pub fn new(code: impl Into<String>) -> Self {
        Self::at(code, Utc::now())
    }

    pub fn at(code: impl Into<String>, visited_at: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            visited_at,
        }
    }
}
