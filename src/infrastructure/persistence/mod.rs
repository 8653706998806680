//! Link store implementations.
//!
//! - [`PgLinkRepository`] - PostgreSQL via SQLx, the durable default
//! - [`InMemoryLinkRepository`] - process-local map for development and tests

pub mod memory_link_repository;
pub mod pg_link_repository;

pub use memory_link_repository::InMemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
