//! Ordering of clustered destinations into visiting paths.
//!
//! - [`RouteBuilder`] — Deadline-aware recursive walk over a merge tree

mod builder;

pub use builder::RouteBuilder;
