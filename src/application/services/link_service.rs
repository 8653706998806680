//! Link creation, lookup, deletion and resolution service.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::domain::visit_event::VisitEvent;
use crate::domain::visit_recorder::VisitRecorder;
use crate::error::AppError;
use crate::utils::code_generator::{fallback_code, generate_code, validate_custom_code};
use crate::utils::url_validator::validate_url;

/// Random code retries after the first collision (6 attempts in total).
pub const MAX_CODE_RETRIES: usize = 5;

/// Service for creating, resolving and managing short links.
///
/// Validation always happens before any storage access. Code uniqueness is
/// decided by the store: a conflict on insert is the only conflict signal.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    visits: VisitRecorder,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(repository: Arc<dyn LinkRepository>) -> Self {
        let visits = VisitRecorder::new(repository.clone());
        Self { repository, visits }
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `original_url` - Absolute http(s) URL, stored verbatim
    /// - `custom_code` - Optional caller-chosen code (validated if provided)
    ///
    /// # Code Allocation
    ///
    /// - With `custom_code`: inserted as-is; the store rejects duplicates
    /// - Otherwise: a random 6-character code, regenerated on conflict up to
    ///   [`MAX_CODE_RETRIES`] times, then a time-derived fallback code
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if the URL is invalid.
    /// Returns [`AppError::InvalidCodeFormat`] if the custom code is malformed.
    /// Returns [`AppError::CodeConflict`] if the custom code already exists.
    /// Returns [`AppError::Storage`] on database errors or if no code could be allocated.
    pub async fn create_link(
        &self,
        original_url: &str,
        custom_code: Option<&str>,
    ) -> Result<Link, AppError> {
        validate_url(original_url)?;

        let link = match custom_code {
            Some(code) => {
                validate_custom_code(code)?;
                self.repository
                    .insert(NewLink::new(code, original_url))
                    .await?
            }
            None => self.insert_with_random_code(original_url).await?,
        };

        info!(code = %link.short_code, id = link.id, "Link created");
        Ok(link)
    }

    /// Lists all links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        self.repository.list_all().await
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))
    }

    /// Deletes a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn delete_link(&self, code: &str) -> Result<(), AppError> {
        if !self.repository.delete_by_code(code).await? {
            return Err(not_found(code));
        }

        info!(code, "Link deleted");
        Ok(())
    }

    /// Resolves a code to its target URL and records a visit.
    ///
    /// The counter update has completed (or failed) when this returns. A
    /// failed update is logged and never turns a successful resolution into
    /// an error; cancelling the caller does not cancel the update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Storage`] if the lookup itself fails.
    pub async fn resolve_and_visit(&self, code: &str) -> Result<String, AppError> {
        let link = self.get_link(code).await?;
        self.visits.record(VisitEvent::new(link.short_code)).await;
        Ok(link.original_url)
    }

    /// Waits for visit writes still running for cancelled requests.
    pub async fn wait_for_visits(&self) {
        self.visits.wait_idle().await;
    }

    /// Inserts with random codes, retrying on conflict, then falls back to a
    /// time-derived code.
    ///
    /// The fallback is not collision-safe; if it also conflicts the request fails.
    async fn insert_with_random_code(&self, original_url: &str) -> Result<Link, AppError> {
        for attempt in 0..=MAX_CODE_RETRIES {
            let code = generate_code();

            match self
                .repository
                .insert(NewLink::new(code.as_str(), original_url))
                .await
            {
                Ok(link) => return Ok(link),
                Err(AppError::CodeConflict { .. }) => {
                    warn!(code = %code, attempt, "Random code collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        let code = fallback_code(unix_millis());
        warn!(
            code = %code,
            "Random code retries exhausted, using time-derived fallback code"
        );

        match self
            .repository
            .insert(NewLink::new(code.as_str(), original_url))
            .await
        {
            Err(AppError::CodeConflict { .. }) => Err(AppError::storage(
                "Failed to allocate a unique short code",
                json!({ "reason": "Too many collisions", "fallback_code": code }),
            )),
            result => result,
        }
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
