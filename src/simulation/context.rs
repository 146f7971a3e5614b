//! Mutable state of one simulated day.

use std::collections::VecDeque;

use crate::availability::AvailabilityTracker;
use crate::cluster::ClusterForest;
use crate::models::{DayReport, SimTime, Vehicle, VehiclePhase};
use crate::registry::Registry;

/// An address correction resolved to a location, waiting for its time.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingCorrection {
    pub(crate) parcel_id: usize,
    pub(crate) effective_at: SimTime,
    pub(crate) destination: usize,
}

/// Everything that changes while a day runs: parcels and destinations, the
/// cluster forest, availability, vehicles and the report being written.
///
/// The context is owned by a single run. A group leaves the forest the
/// moment it is handed to a vehicle.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub(crate) registry: Registry,
    pub(crate) forest: ClusterForest,
    pub(crate) tracker: AvailabilityTracker,
    pub(crate) vehicles: Vec<Vehicle>,
    pub(crate) report: DayReport,
    pub(crate) corrections: VecDeque<PendingCorrection>,
    pub(crate) recluster: bool,
}

impl SimulationContext {
    /// Parcel table and destination index.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Groups built so far and the current top-level partition.
    pub fn forest(&self) -> &ClusterForest {
        &self.forest
    }

    /// Destination availability.
    pub fn tracker(&self) -> &AvailabilityTracker {
        &self.tracker
    }

    /// Fleet, ordered by vehicle ID.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Report written so far.
    pub fn report(&self) -> &DayReport {
        &self.report
    }

    /// Consumes the context, returning its report.
    pub fn into_report(self) -> DayReport {
        self.report
    }

    /// Global clock: the earliest time among vehicles still working, or
    /// [`SimTime::END_OF_DAY`] once all have parked.
    pub fn clock(&self) -> SimTime {
        self.next_vehicle()
            .map_or(SimTime::END_OF_DAY, |i| self.vehicles[i].time())
    }

    /// Index of the vehicle that moves next: earliest clock, lowest ID on ties.
    pub(crate) fn next_vehicle(&self) -> Option<usize> {
        self.vehicles
            .iter()
            .enumerate()
            .filter(|(_, v)| v.phase() != VehiclePhase::Parked)
            .min_by(|(_, a), (_, b)| a.time().cmp(&b.time()).then(a.id().cmp(&b.id())))
            .map(|(i, _)| i)
    }

    /// Index of the vehicle with the given ID.
    pub(crate) fn vehicle_index(&self, id: usize) -> Option<usize> {
        self.vehicles.iter().position(|v| v.id() == id)
    }
}
