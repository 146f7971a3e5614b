//! Discrete-event simulation of a delivery day.
//!
//! - [`SimulationConfig`] — Fleet size, capacity, speed, day start and depot
//! - [`Scenario`] — Locations, distances, manifest and address corrections
//! - [`Simulator`] — Runs the day, answers point-in-time status queries
//! - [`SimulationContext`] — All mutable state of one run
//! - [`StatusSnapshot`] — Per-parcel status at a given time

mod config;
mod context;
mod engine;
mod status;

pub use config::{AddressCorrection, Scenario, SimulationConfig};
pub use context::SimulationContext;
pub use engine::Simulator;
pub use status::{ParcelSnapshot, StatusSnapshot};
