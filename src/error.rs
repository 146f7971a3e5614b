//! Error types for planning and simulating a delivery day.

use thiserror::Error;

/// Fatal errors raised while building or running a delivery day.
///
/// Recoverable conditions (late deliveries, undelivered parcels) are not
/// errors; they are recorded as [`Violation`](crate::models::Violation)s in
/// the [`DayReport`](crate::models::DayReport).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    /// A parcel's address and postal code do not resolve to a known location.
    #[error("parcel {parcel_id}: address {address:?} ({postal_code}) does not resolve to a location")]
    UnknownAddress {
        /// Parcel whose address failed to resolve.
        parcel_id: usize,
        /// Street address as supplied by the manifest.
        address: String,
        /// Postal code as supplied by the manifest.
        postal_code: String,
    },
    /// A destination id is outside the distance matrix.
    #[error("destination {destination} is outside the distance matrix of size {size}")]
    DestinationOutOfRange {
        /// Offending destination id.
        destination: usize,
        /// Number of locations in the matrix.
        size: usize,
    },
    /// The distance dataset is malformed.
    #[error("invalid distance matrix: {reason}")]
    InvalidMatrix {
        /// What was wrong with the data.
        reason: String,
    },
    /// Deadline text is neither a clock time nor the end-of-day marker.
    #[error("invalid deadline {text:?}")]
    InvalidDeadline {
        /// Text that failed to parse.
        text: String,
    },
    /// A manifest note could not be interpreted.
    #[error("invalid parcel note {text:?}")]
    InvalidNote {
        /// Text that failed to parse.
        text: String,
    },
    /// Two manifest entries share one parcel id.
    #[error("parcel {parcel_id} appears more than once in the manifest")]
    DuplicateParcel {
        /// Repeated parcel id.
        parcel_id: usize,
    },
    /// A parcel id is not part of the manifest.
    #[error("parcel {parcel_id} is not in the manifest")]
    UnknownParcel {
        /// Missing parcel id.
        parcel_id: usize,
    },
    /// A parcel requires a vehicle that is not in the fleet.
    #[error("parcel {parcel_id} requires vehicle {vehicle}, which is not in the fleet")]
    UnknownVehicle {
        /// Parcel carrying the requirement.
        parcel_id: usize,
        /// Required vehicle id.
        vehicle: usize,
    },
    /// The simulation configuration is unusable.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the configuration.
        reason: String,
    },
    /// A single destination holds more parcels than one vehicle can carry.
    #[error("destination {destination} holds {parcels} parcels, more than the vehicle capacity {capacity}")]
    DestinationOverCapacity {
        /// Overloaded destination.
        destination: usize,
        /// Parcels waiting for it.
        parcels: usize,
        /// Vehicle capacity.
        capacity: usize,
    },
    /// A linkage set holds more parcels than one vehicle can carry.
    #[error("linked destinations {destinations:?} hold {parcels} parcels, more than the vehicle capacity {capacity}")]
    LinkageOverCapacity {
        /// Destinations forced into one group.
        destinations: Vec<usize>,
        /// Parcels waiting for them.
        parcels: usize,
        /// Vehicle capacity.
        capacity: usize,
    },
    /// Conflicting required-vehicle values were forced into one destination or group.
    #[error("destination {destination} must travel on both vehicle {first} and vehicle {second}")]
    ConflictingVehicle {
        /// Destination where the conflict surfaced.
        destination: usize,
        /// First required vehicle.
        first: usize,
        /// Second, incompatible required vehicle.
        second: usize,
    },
    /// A dispatched trip would carry more parcels than the vehicle holds.
    #[error("vehicle {vehicle} would carry {parcels} parcels, more than its capacity {capacity}")]
    TripOverCapacity {
        /// Vehicle being loaded.
        vehicle: usize,
        /// Parcels in the trip.
        parcels: usize,
        /// Vehicle capacity.
        capacity: usize,
    },
    /// A parcel reserved for one vehicle was delivered by another.
    #[error("parcel {parcel_id} requires vehicle {required} but was delivered by vehicle {actual}")]
    VehicleMismatch {
        /// Misrouted parcel.
        parcel_id: usize,
        /// Vehicle the parcel was reserved for.
        required: usize,
        /// Vehicle that carried it.
        actual: usize,
    },
    /// A route reaches a destination before its parcels are ready.
    #[error("destination {destination} reached at {arrival} before its ready time {ready}")]
    ReadyTimeBreached {
        /// Destination reached too early.
        destination: usize,
        /// Projected arrival, formatted `HH:MM`.
        arrival: String,
        /// Ready time, formatted `HH:MM`.
        ready: String,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DispatchError>;
