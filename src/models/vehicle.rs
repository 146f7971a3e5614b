//! Vehicle type with capacity, speed and day-long running state.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::SimTime;

/// Where a vehicle is in its trip cycle.
///
/// `Idle → Loaded → EnRoute → AtDestination → (EnRoute | ReturningToDepot) → Idle`,
/// ending in `Parked` once nothing is left to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehiclePhase {
    /// At the depot with an empty queue.
    Idle,
    /// At the depot with a route loaded, about to depart.
    Loaded,
    /// Driving toward the next queued stop; the clock holds the arrival time.
    EnRoute,
    /// Unloading at a stop.
    AtDestination,
    /// Driving back to the depot; the clock holds the arrival time.
    ReturningToDepot,
    /// Done for the day.
    Parked,
}

/// A delivery vehicle and its running state for one simulated day.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{SimTime, Vehicle, VehiclePhase};
///
/// let v = Vehicle::new(1, 16)
///     .with_speed(18.0)
///     .with_start_time(SimTime::from_hm(8, 0));
/// assert_eq!(v.id(), 1);
/// assert_eq!(v.capacity(), 16);
/// assert_eq!(v.location(), 0);
/// assert_eq!(v.phase(), VehiclePhase::Idle);
/// ```
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: usize,
    capacity: usize,
    speed: f64,
    depot_id: usize,
    location: usize,
    time: SimTime,
    odometer: f64,
    queue: VecDeque<usize>,
    returning: Vec<usize>,
    phase: VehiclePhase,
}

impl Vehicle {
    /// Creates an idle vehicle at depot 0 with the given ID and capacity.
    ///
    /// Default: speed 18.0 per hour, clock at midnight.
    pub fn new(id: usize, capacity: usize) -> Self {
        Self {
            id,
            capacity,
            speed: 18.0,
            depot_id: 0,
            location: 0,
            time: SimTime::MIDNIGHT,
            odometer: 0.0,
            queue: VecDeque::new(),
            returning: Vec::new(),
            phase: VehiclePhase::Idle,
        }
    }

    /// Sets the travel speed in distance units per hour.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the depot and places the vehicle there.
    pub fn with_depot(mut self, depot_id: usize) -> Self {
        self.depot_id = depot_id;
        self.location = depot_id;
        self
    }

    /// Sets the clock the vehicle starts its day at.
    pub fn with_start_time(mut self, time: SimTime) -> Self {
        self.time = time;
        self
    }

    /// Vehicle ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum number of parcels per trip.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Speed in distance units per hour.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Depot location ID (start and end of every trip).
    pub fn depot_id(&self) -> usize {
        self.depot_id
    }

    /// Current location (or the location being driven to).
    pub fn location(&self) -> usize {
        self.location
    }

    /// Vehicle clock.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Distance driven so far today.
    pub fn odometer(&self) -> f64 {
        self.odometer
    }

    /// Parcels still to deliver, in route order.
    pub fn queue(&self) -> &VecDeque<usize> {
        &self.queue
    }

    /// Parcels on board that are riding back to the depot undelivered.
    pub fn returning(&self) -> &[usize] {
        &self.returning
    }

    /// Current phase.
    pub fn phase(&self) -> VehiclePhase {
        self.phase
    }

    /// Returns `true` if the vehicle is at the depot.
    pub fn is_at_depot(&self) -> bool {
        self.location == self.depot_id
            && matches!(self.phase, VehiclePhase::Idle | VehiclePhase::Loaded)
    }

    /// Drives to `destination`, adding `distance` to the odometer and the
    /// travel time to the clock.
    pub(crate) fn drive(&mut self, destination: usize, distance: f64) {
        self.odometer += distance;
        self.time = self.time.after_drive(distance, self.speed);
        self.location = destination;
    }

    pub(crate) fn load(&mut self, parcels: impl IntoIterator<Item = usize>) {
        self.queue.extend(parcels);
    }

    pub(crate) fn queue_mut(&mut self) -> &mut VecDeque<usize> {
        &mut self.queue
    }

    /// Removes a parcel from the queue, returning `true` if it was queued.
    pub(crate) fn unqueue(&mut self, parcel_id: usize) -> bool {
        let before = self.queue.len();
        self.queue.retain(|&p| p != parcel_id);
        self.queue.len() != before
    }

    pub(crate) fn push_returning(&mut self, parcel_id: usize) {
        self.returning.push(parcel_id);
    }

    pub(crate) fn take_returning(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.returning)
    }

    pub(crate) fn set_phase(&mut self, phase: VehiclePhase) {
        self.phase = phase;
    }

    pub(crate) fn set_time(&mut self, time: SimTime) {
        self.time = time;
    }
}
