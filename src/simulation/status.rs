//! Point-in-time view of every parcel.

use serde::{Deserialize, Serialize};

use crate::models::{LocationTable, ParcelStatus, SimTime};

use super::SimulationContext;

/// One parcel as seen at a snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelSnapshot {
    /// Parcel ID.
    pub parcel_id: usize,
    /// Destination location ID.
    pub destination: usize,
    /// Street address of the destination.
    pub address: String,
    /// Deadline, if any.
    pub deadline: Option<SimTime>,
    /// Lifecycle status.
    pub status: ParcelStatus,
    /// Delivery time, once delivered.
    pub delivered_at: Option<SimTime>,
}

/// Status of the whole manifest at one moment of the day.
///
/// Odometers include the leg a vehicle is currently driving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    time: SimTime,
    parcels: Vec<ParcelSnapshot>,
    odometers: Vec<(usize, f64)>,
}

impl StatusSnapshot {
    pub(crate) fn capture(ctx: &SimulationContext, locations: &LocationTable, time: SimTime) -> Self {
        let parcels = ctx
            .registry()
            .parcels()
            .map(|p| ParcelSnapshot {
                parcel_id: p.id(),
                destination: p.destination(),
                address: locations
                    .get(p.destination())
                    .map(|l| l.address().to_string())
                    .unwrap_or_default(),
                deadline: p.deadline(),
                status: p.status(),
                delivered_at: p.delivered_at(),
            })
            .collect();
        let odometers = ctx
            .vehicles()
            .iter()
            .map(|v| (v.id(), v.odometer()))
            .collect();
        Self {
            time,
            parcels,
            odometers,
        }
    }

    /// Time the snapshot was taken at.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Every parcel, in ID order.
    pub fn parcels(&self) -> &[ParcelSnapshot] {
        &self.parcels
    }

    /// Snapshot of one parcel.
    pub fn parcel(&self, parcel_id: usize) -> Option<&ParcelSnapshot> {
        self.parcels.iter().find(|p| p.parcel_id == parcel_id)
    }

    /// `(vehicle, distance driven)` pairs.
    pub fn odometers(&self) -> &[(usize, f64)] {
        &self.odometers
    }

    /// Total distance driven by the fleet.
    pub fn total_distance(&self) -> f64 {
        self.odometers.iter().map(|&(_, d)| d).sum()
    }

    /// Number of parcels delivered by the snapshot time.
    pub fn num_delivered(&self) -> usize {
        self.parcels
            .iter()
            .filter(|p| p.status.is_delivered())
            .count()
    }

    /// Serializes the snapshot to a JSON string.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
