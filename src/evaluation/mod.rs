//! Trip projection: arrival times, load and distance along a path.
//!
//! - [`RouteEvaluator`] — Projects a path into a [`Route`](crate::models::Route)
//! - [`ProjectedIssue`] — Deadline, ready-time and capacity problems found ahead of time

mod evaluator;

pub use evaluator::{ProjectedIssue, RouteEvaluator};
