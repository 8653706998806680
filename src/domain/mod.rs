//! Domain layer containing business entities and visit processing.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`visit_event`] - Visit event model
//! - [`visit_recorder`] - Visit recording with retry
//!
//! # Visit Processing Flow
//!
//! 1. The redirect path resolves a code through [`crate::application::services::LinkService`]
//! 2. A [`visit_event::VisitEvent`] is stamped with the redirect time
//! 3. [`visit_recorder::VisitRecorder`] writes it on a spawned task and awaits it
//! 4. The counter update is persisted via [`repositories::LinkRepository::record_visit`]

pub mod entities;
pub mod repositories;
pub mod visit_event;
pub mod visit_recorder;
