//! Parcel and delivery status types.

use serde::{Deserialize, Serialize};

use super::SimTime;

/// Where a parcel is in its delivery lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Waiting at the depot, not assigned to any vehicle.
    AtDepot,
    /// Loaded onto a vehicle that has not left the depot yet.
    Assigned {
        /// Vehicle holding the parcel.
        vehicle: usize,
    },
    /// On board a vehicle that has left the depot.
    InTransit {
        /// Vehicle carrying the parcel.
        vehicle: usize,
    },
    /// Handed over at its destination.
    Delivered {
        /// Vehicle that delivered it.
        vehicle: usize,
        /// Delivery time.
        at: SimTime,
    },
    /// Brought back to the depot after an address correction, awaiting redelivery.
    ReturnedToDepot,
}

impl ParcelStatus {
    /// Returns `true` if the parcel sits at the depot waiting to be loaded.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::AtDepot | Self::ReturnedToDepot)
    }

    /// Returns `true` once the parcel has been delivered.
    pub fn is_delivered(self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// The vehicle currently holding the parcel, if any.
    pub fn vehicle(self) -> Option<usize> {
        match self {
            Self::Assigned { vehicle } | Self::InTransit { vehicle } => Some(vehicle),
            _ => None,
        }
    }
}

/// A single item bound for exactly one destination.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{Parcel, ParcelStatus, SimTime};
///
/// let p = Parcel::new(6, 13, 88.0)
///     .with_deadline(SimTime::from_hm(10, 30))
///     .with_ready_time(SimTime::from_hm(9, 5));
/// assert_eq!(p.destination(), 13);
/// assert_eq!(p.status(), ParcelStatus::AtDepot);
/// assert!(!p.is_ready_at(SimTime::from_hm(9, 0)));
/// assert!(p.is_ready_at(SimTime::from_hm(9, 5)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    id: usize,
    destination: usize,
    mass: f64,
    deadline: Option<SimTime>,
    ready_time: Option<SimTime>,
    required_vehicle: Option<usize>,
    linkage: Option<usize>,
    address_pending: bool,
    status: ParcelStatus,
}

impl Parcel {
    /// Creates a parcel waiting at the depot with no constraints.
    pub fn new(id: usize, destination: usize, mass: f64) -> Self {
        Self {
            id,
            destination,
            mass,
            deadline: None,
            ready_time: None,
            required_vehicle: None,
            linkage: None,
            address_pending: false,
            status: ParcelStatus::AtDepot,
        }
    }

    /// Sets the delivery deadline.
    pub fn with_deadline(mut self, deadline: SimTime) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the earliest time the parcel is available at the depot.
    pub fn with_ready_time(mut self, ready: SimTime) -> Self {
        self.ready_time = Some(ready);
        self
    }

    /// Restricts the parcel to one vehicle.
    pub fn with_required_vehicle(mut self, vehicle: usize) -> Self {
        self.required_vehicle = Some(vehicle);
        self
    }

    /// Parcel ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Destination location ID.
    pub fn destination(&self) -> usize {
        self.destination
    }

    /// Mass as listed on the manifest.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Delivery deadline; `None` means end of day.
    pub fn deadline(&self) -> Option<SimTime> {
        self.deadline
    }

    /// Earliest time the parcel can leave the depot, if restricted.
    pub fn ready_time(&self) -> Option<SimTime> {
        self.ready_time
    }

    /// Vehicle the parcel must travel on, if any.
    pub fn required_vehicle(&self) -> Option<usize> {
        self.required_vehicle
    }

    /// Linkage set the parcel belongs to, if any.
    pub fn linkage(&self) -> Option<usize> {
        self.linkage
    }

    /// Returns `true` while the parcel is held for an address correction.
    pub fn is_address_pending(&self) -> bool {
        self.address_pending
    }

    /// Current status.
    pub fn status(&self) -> ParcelStatus {
        self.status
    }

    /// Delivery time, once delivered.
    pub fn delivered_at(&self) -> Option<SimTime> {
        match self.status {
            ParcelStatus::Delivered { at, .. } => Some(at),
            _ => None,
        }
    }

    /// Returns `true` if the parcel may leave the depot at `now`.
    pub fn is_ready_at(&self, now: SimTime) -> bool {
        !self.address_pending && self.ready_time.map_or(true, |r| r <= now)
    }

    pub(crate) fn set_status(&mut self, status: ParcelStatus) {
        self.status = status;
    }

    pub(crate) fn set_destination(&mut self, destination: usize) {
        self.destination = destination;
    }

    pub(crate) fn set_linkage(&mut self, linkage: Option<usize>) {
        self.linkage = linkage;
    }

    pub(crate) fn set_address_pending(&mut self, pending: bool) {
        self.address_pending = pending;
    }
}
