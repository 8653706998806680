//! In-memory implementation of link repository.
//!
//! Selected with `STORAGE_BACKEND=memory`. Data lives only as long as the
//! process; useful for local runs and integration tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    next_id: i64,
    links: HashMap<String, Link>,
}

/// Process-local link store guarded by a single async `RwLock`.
///
/// Every mutation happens under the write lock, which gives the same
/// guarantees the PostgreSQL backend gets from its unique constraint and
/// single-statement updates.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    inner: RwLock<Inner>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut inner = self.inner.write().await;

        if inner.links.contains_key(&new_link.short_code) {
            return Err(AppError::conflict(
                "Code already exists",
                json!({ "code": new_link.short_code }),
            ));
        }

        inner.next_id += 1;
        let link = Link::new(
            inner.next_id,
            new_link.short_code,
            new_link.original_url,
            0,
            None,
            Utc::now(),
        );
        inner.links.insert(link.short_code.clone(), link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.inner.read().await.links.get(code).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self.inner.read().await.links.values().cloned().collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(links)
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.inner.write().await.links.remove(code).is_some())
    }

    async fn record_visit(&self, code: &str, visited_at: DateTime<Utc>) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;

        let Some(link) = inner.links.get_mut(code) else {
            return Ok(false);
        };

        link.clicks += 1;
        link.last_clicked_at = Some(match link.last_clicked_at {
            Some(last) if last > visited_at => last,
            _ => visited_at,
        });

        Ok(true)
    }
}
