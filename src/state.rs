//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::LinkService;

/// State cloned into every request.
///
/// Holds only shared, read-only handles; the storage pool and the visit
/// queue sender live inside [`LinkService`].
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>) -> Self {
        Self { link_service }
    }
}
