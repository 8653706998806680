//! Application layer services implementing business logic.
//!
//! Services orchestrate validation, code allocation and repository calls, and
//! provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, lookup, deletion and resolution

pub mod services;
