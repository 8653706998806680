//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A short code mapped to its target URL, with visit counters.
///
/// `clicks` and `last_clicked_at` are updated by visit recording only and are
/// best-effort: a redirect may succeed while its visit is never counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub clicks: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        short_code: String,
        original_url: String,
        clicks: i64,
        last_clicked_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_code,
            original_url,
            clicks,
            last_clicked_at,
            created_at,
        }
    }

    /// Returns true if at least one visit has been recorded.
    pub fn was_visited(&self) -> bool {
        self.clicks > 0
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub short_code: String,
    pub original_url: String,
}

impl NewLink {
    pub fn new(short_code: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            original_url: original_url.into(),
        }
    }
}
