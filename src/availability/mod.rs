//! Per-destination availability over the simulated day.
//!
//! - [`AvailabilityTracker`] — `Unavailable → Available → Routed` state machine
//! - [`Availability`] — The state of one destination

mod tracker;

pub use tracker::{Availability, AvailabilityTracker};
