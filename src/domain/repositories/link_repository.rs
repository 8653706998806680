//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for the link store.
///
/// Implementations must enforce short code uniqueness themselves (a unique
/// constraint or equivalent) and must apply [`Self::record_visit`] as one atomic
/// update. No method retries internally; callers own the retry policy.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - volatile, process-local
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with `clicks = 0` and no last visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeConflict`] if the short code already exists.
    /// Returns [`AppError::Storage`] on database errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Lists every link, newest first (`created_at` DESC, then `id` DESC).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn list_all(&self) -> Result<Vec<Link>, AppError>;

    /// Removes a link.
    ///
    /// Returns `Ok(false)` if no link has this code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError>;

    /// Atomically increments `clicks` and moves `last_clicked_at` forward to
    /// `visited_at` (it never moves backwards).
    ///
    /// Returns `Ok(false)` if no link has this code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn record_visit(&self, code: &str, visited_at: DateTime<Utc>) -> Result<bool, AppError>;
}
