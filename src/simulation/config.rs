//! Simulation configuration and scenario inputs.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{DispatchError, Result};
use crate::models::{LocationTable, ManifestEntry, SimTime};

/// Fleet and planning parameters for one simulated day.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::SimTime;
/// use u_dispatch::simulation::SimulationConfig;
///
/// let config = SimulationConfig::default()
///     .with_fleet_size(3)
///     .with_day_start(SimTime::from_hm(7, 30));
/// assert_eq!(config.fleet_size, 3);
/// assert_eq!(config.vehicle_capacity, 16);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of vehicles, numbered `1..=fleet_size`.
    pub fleet_size: usize,
    /// Parcels a vehicle carries per trip.
    pub vehicle_capacity: usize,
    /// Travel speed in distance units per hour.
    pub vehicle_speed: f64,
    /// Time every vehicle starts its day at the depot.
    pub day_start: SimTime,
    /// Location ID of the depot.
    pub depot: usize,
    /// A group with more than `split_factor` times the average group size
    /// is routed deadlines-first.
    pub split_factor: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fleet_size: 2,
            vehicle_capacity: 16,
            vehicle_speed: 18.0,
            day_start: SimTime::from_hm(8, 0),
            depot: 0,
            split_factor: 2.0,
        }
    }
}

impl SimulationConfig {
    /// Sets the number of vehicles.
    pub fn with_fleet_size(mut self, n: usize) -> Self {
        self.fleet_size = n;
        self
    }

    /// Sets the per-trip capacity.
    pub fn with_vehicle_capacity(mut self, capacity: usize) -> Self {
        self.vehicle_capacity = capacity;
        self
    }

    /// Sets the travel speed.
    pub fn with_vehicle_speed(mut self, speed: f64) -> Self {
        self.vehicle_speed = speed;
        self
    }

    /// Sets the start of the day.
    pub fn with_day_start(mut self, start: SimTime) -> Self {
        self.day_start = start;
        self
    }

    /// Sets the depot location.
    pub fn with_depot(mut self, depot: usize) -> Self {
        self.depot = depot;
        self
    }

    /// Sets the large-route threshold.
    pub fn with_split_factor(mut self, factor: f64) -> Self {
        self.split_factor = factor;
        self
    }

    /// Checks that the parameters describe a usable fleet.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(DispatchError::InvalidConfig {
                reason: reason.to_string(),
            })
        };
        if self.fleet_size == 0 {
            return invalid("fleet_size must be at least 1");
        }
        if self.vehicle_capacity == 0 {
            return invalid("vehicle_capacity must be at least 1");
        }
        if !self.vehicle_speed.is_finite() || self.vehicle_speed <= 0.0 {
            return invalid("vehicle_speed must be positive and finite");
        }
        if !self.split_factor.is_finite() || self.split_factor <= 0.0 {
            return invalid("split_factor must be positive and finite");
        }
        if self.day_start.is_end_of_day() {
            return invalid("day_start must be before the end of day");
        }
        Ok(())
    }
}

/// A mid-day correction of a parcel's delivery address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressCorrection {
    /// Parcel whose address changes.
    pub parcel_id: usize,
    /// When the correction reaches dispatch.
    pub effective_at: SimTime,
    /// Corrected street address.
    pub address: String,
    /// Corrected postal code.
    pub postal_code: String,
}

impl AddressCorrection {
    /// Creates a correction.
    pub fn new(
        parcel_id: usize,
        effective_at: SimTime,
        address: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            parcel_id,
            effective_at,
            address: address.into(),
            postal_code: postal_code.into(),
        }
    }
}

/// Everything a day is simulated from: the location dataset, the distance
/// matrix, the manifest and any address corrections.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Known delivery locations.
    pub locations: LocationTable,
    /// Distances between locations, indexed by location ID.
    pub distances: DistanceMatrix,
    /// Parcels to deliver.
    pub manifest: Vec<ManifestEntry>,
    /// Address corrections arriving during the day.
    pub corrections: Vec<AddressCorrection>,
}

impl Scenario {
    /// Creates a scenario without corrections.
    pub fn new(locations: LocationTable, distances: DistanceMatrix, manifest: Vec<ManifestEntry>) -> Self {
        Self {
            locations,
            distances,
            manifest,
            corrections: Vec::new(),
        }
    }

    /// Adds an address correction.
    pub fn with_correction(mut self, correction: AddressCorrection) -> Self {
        self.corrections.push(correction);
        self
    }
}
