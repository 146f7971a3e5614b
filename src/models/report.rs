//! End-of-day report and violation types.

use serde::{Deserialize, Serialize};

use super::{Route, SimTime};

/// A recoverable problem found while running the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationType {
    /// Delivered after its deadline.
    DeadlineMissed {
        /// Late parcel.
        parcel_id: usize,
        /// Deadline that was missed.
        deadline: SimTime,
        /// Actual delivery time.
        delivered_at: SimTime,
    },
    /// Still undelivered when every vehicle parked.
    Undelivered {
        /// Parcel left over.
        parcel_id: usize,
    },
    /// Delivered before a correction to its address arrived.
    DeliveredBeforeCorrection {
        /// Affected parcel.
        parcel_id: usize,
        /// Where it was delivered.
        delivered_to: usize,
        /// Where it should have gone.
        corrected_to: usize,
    },
}

/// A constraint violation recorded in a [`DayReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// One completed delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    /// Delivered parcel.
    pub parcel_id: usize,
    /// Destination it was left at.
    pub destination: usize,
    /// Vehicle that carried it.
    pub vehicle_id: usize,
    /// Delivery time.
    pub delivered_at: SimTime,
    /// Deadline, if any.
    pub deadline: Option<SimTime>,
}

impl Delivery {
    /// Returns `true` if the parcel arrived by its deadline (or had none).
    pub fn on_time(&self) -> bool {
        self.deadline.map_or(true, |d| self.delivered_at <= d)
    }
}

/// Outcome of a simulated delivery day.
///
/// Every parcel of the manifest appears either in `deliveries` or in
/// `undelivered`; nothing is silently dropped.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::DayReport;
///
/// let report = DayReport::new();
/// assert_eq!(report.num_delivered(), 0);
/// assert!(report.is_complete());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayReport {
    deliveries: Vec<Delivery>,
    undelivered: Vec<usize>,
    violations: Vec<Violation>,
    trips: Vec<Route>,
    odometers: Vec<(usize, f64)>,
}

impl DayReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a delivery.
    pub fn add_delivery(&mut self, delivery: Delivery) {
        self.deliveries.push(delivery);
    }

    /// Marks a parcel as undelivered.
    pub fn add_undelivered(&mut self, parcel_id: usize) {
        self.undelivered.push(parcel_id);
    }

    /// Records a violation.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Records a dispatched trip.
    pub fn add_trip(&mut self, route: Route) {
        self.trips.push(route);
    }

    /// Records a vehicle's odometer at day end.
    pub fn set_odometer(&mut self, vehicle_id: usize, distance: f64) {
        match self.odometers.iter_mut().find(|(id, _)| *id == vehicle_id) {
            Some(entry) => entry.1 = distance,
            None => self.odometers.push((vehicle_id, distance)),
        }
    }

    /// Completed deliveries, in delivery order.
    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    /// IDs of parcels that were never delivered.
    pub fn undelivered(&self) -> &[usize] {
        &self.undelivered
    }

    /// Recorded violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Dispatched trips, in dispatch order.
    pub fn trips(&self) -> &[Route] {
        &self.trips
    }

    /// `(vehicle_id, distance)` pairs.
    pub fn odometers(&self) -> &[(usize, f64)] {
        &self.odometers
    }

    /// Delivery record for one parcel.
    pub fn delivery(&self, parcel_id: usize) -> Option<&Delivery> {
        self.deliveries.iter().find(|d| d.parcel_id == parcel_id)
    }

    /// Number of parcels delivered.
    pub fn num_delivered(&self) -> usize {
        self.deliveries.len()
    }

    /// Total distance across all vehicles.
    pub fn total_distance(&self) -> f64 {
        self.odometers.iter().map(|(_, d)| d).sum()
    }

    /// Returns `true` if every parcel was delivered.
    pub fn is_complete(&self) -> bool {
        self.undelivered.is_empty()
    }

    /// Returns `true` if every delivered parcel met its deadline.
    pub fn on_time(&self) -> bool {
        self.deliveries.iter().all(Delivery::on_time)
    }

    /// Deadline misses only.
    pub fn deadline_misses(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| matches!(v.kind, ViolationType::DeadlineMissed { .. }))
    }

    /// Serializes the report as pretty-printed JSON.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
