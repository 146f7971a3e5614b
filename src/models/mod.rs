//! Domain model types for planning and simulating a delivery day.
//!
//! Provides the core abstractions: simulated clock time, locations and the
//! address table, parcels with their constraints and status, manifest rows,
//! vehicles with their running state, routes as ordered stop sequences, and
//! the end-of-day report.

mod location;
mod manifest;
mod parcel;
mod report;
mod route;
mod time;
mod vehicle;

pub use location::{Location, LocationTable};
pub use manifest::{ManifestEntry, ParcelNote};
pub use parcel::{Parcel, ParcelStatus};
pub use report::{DayReport, Delivery, Violation, ViolationType};
pub use route::{Route, Visit};
pub use time::SimTime;
pub use vehicle::{Vehicle, VehiclePhase};
