//! Route and visit types.

use serde::{Deserialize, Serialize};

use super::SimTime;

/// A single stop within a route.
///
/// Tracks the destination along with projected timing and load state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Destination being visited.
    pub destination_id: usize,
    /// Arrival time at this destination.
    pub arrival_time: SimTime,
    /// Departure time (unloading is instantaneous, so equal to arrival).
    pub departure_time: SimTime,
    /// Parcels dropped at this stop.
    pub parcels: usize,
    /// Parcels still on board after this stop.
    pub load_after: usize,
}

/// One depot-to-depot trip of a vehicle.
///
/// The depot is not stored in `visits`; the route starts and ends there.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{Route, SimTime, Visit};
///
/// let mut route = Route::new(1, SimTime::from_hm(8, 0));
/// route.push_visit(Visit {
///     destination_id: 5,
///     arrival_time: SimTime::from_hm(8, 12),
///     departure_time: SimTime::from_hm(8, 12),
///     parcels: 2,
///     load_after: 0,
/// });
/// assert_eq!(route.len(), 1);
/// assert_eq!(route.vehicle_id(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    vehicle_id: usize,
    departure: SimTime,
    visits: Vec<Visit>,
    total_distance: f64,
    return_time: SimTime,
    total_load: usize,
}

impl Route {
    /// Creates an empty route for the given vehicle, leaving at `departure`.
    pub fn new(vehicle_id: usize, departure: SimTime) -> Self {
        Self {
            vehicle_id,
            departure,
            visits: Vec::new(),
            total_distance: 0.0,
            return_time: departure,
            total_load: 0,
        }
    }

    /// Appends a visit to the end of this route.
    pub fn push_visit(&mut self, visit: Visit) {
        self.total_load += visit.parcels;
        self.visits.push(visit);
    }

    /// Returns the vehicle assigned to this route.
    pub fn vehicle_id(&self) -> usize {
        self.vehicle_id
    }

    /// Departure time from the depot.
    pub fn departure(&self) -> SimTime {
        self.departure
    }

    /// Returns the ordered sequence of visits.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Returns the number of stops (excluding depot).
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Returns `true` if this route has no stops.
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Returns the destination IDs in visit order.
    pub fn destination_ids(&self) -> Vec<usize> {
        self.visits.iter().map(|v| v.destination_id).collect()
    }

    /// Total distance including the return to depot (set by evaluator).
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Projected time back at the depot (set by evaluator).
    pub fn return_time(&self) -> SimTime {
        self.return_time
    }

    /// Parcels carried on this route.
    pub fn total_load(&self) -> usize {
        self.total_load
    }

    /// Sets the total distance (used by evaluator).
    pub fn set_total_distance(&mut self, d: f64) {
        self.total_distance = d;
    }

    /// Sets the projected return time (used by evaluator).
    pub fn set_return_time(&mut self, t: SimTime) {
        self.return_time = t;
    }
}
