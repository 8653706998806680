//! Core domain entities.
//!
//! - [`Link`] - A stored short link with its visit counters
//! - [`NewLink`] - Input for inserting a link

pub mod link;

pub use link::{Link, NewLink};
