#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;

use linkhop::prelude::*;
use linkhop::routes::router;

/// State over an in-memory store, with the store handed back for assertions.
pub fn create_test_state() -> (AppState, Arc<InMemoryLinkRepository>) {
    let repository = Arc::new(InMemoryLinkRepository::new());
    let link_service = Arc::new(LinkService::new(repository.clone()));

    (AppState::new(link_service), repository)
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

pub async fn create_test_link(repository: &InMemoryLinkRepository, code: &str, url: &str) -> Link {
    repository.insert(NewLink::new(code, url)).await.unwrap()
}
