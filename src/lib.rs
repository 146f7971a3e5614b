//! # u-dispatch
//!
//! Parcel dispatch planning for a small fleet over one working day:
//! agglomerative clustering of destinations into capacity- and
//! affinity-respecting groups, deadline-aware ordering of each group into a
//! path, and a deterministic discrete-event simulator that replans as
//! parcels become available or addresses are corrected.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (SimTime, Parcel, Vehicle, Route, DayReport)
//! - [`distance`] — Distance matrix and nearest-neighbor queries
//! - [`registry`] — Parcel table, destination aggregates and linkage sets
//! - [`cluster`] — Merge-tree forest and the agglomerative clusterer
//! - [`routing`] — Path construction over a merge tree
//! - [`evaluation`] — Trip projection (arrival times, load, distance)
//! - [`availability`] — Per-destination ready-time gating
//! - [`simulation`] — Day simulator and point-in-time status queries
//! - [`error`] — Fatal error taxonomy
//!
//! Logging goes through the [`log`] facade; install any logger to see
//! dispatch decisions, re-clustering passes and late deliveries.

pub mod availability;
pub mod cluster;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod registry;
pub mod routing;
pub mod simulation;

pub use error::{DispatchError, Result};
