//! Parcel registry and destination index.
//!
//! The [`Registry`] owns every parcel of the day and indexes them by
//! destination. For each destination it keeps aggregates derived from the
//! parcels still waiting at the depot:
//!
//! - earliest and latest ready time (min / max),
//! - earliest deadline (min),
//! - required vehicle (unified; two different values are a fatal conflict).

mod linkage;

pub use linkage::LinkageSet;

use std::collections::{BTreeMap, BTreeSet};

use crate::distance::DistanceMatrix;
use crate::error::{DispatchError, Result};
use crate::models::{LocationTable, ManifestEntry, Parcel, ParcelNote, ParcelStatus, SimTime};

/// Aggregated view of one destination.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationInfo {
    id: usize,
    parcels: BTreeSet<usize>,
    waiting: usize,
    earliest_ready: Option<SimTime>,
    ready_time: Option<SimTime>,
    deadline: Option<SimTime>,
    required_vehicle: Option<usize>,
    routed: bool,
}

impl DestinationInfo {
    fn new(id: usize) -> Self {
        Self {
            id,
            parcels: BTreeSet::new(),
            waiting: 0,
            earliest_ready: None,
            ready_time: None,
            deadline: None,
            required_vehicle: None,
            routed: true,
        }
    }

    /// Destination (location) ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Every parcel indexed under this destination, delivered or not.
    pub fn parcels(&self) -> &BTreeSet<usize> {
        &self.parcels
    }

    /// Number of parcels waiting at the depot for this destination.
    pub fn waiting(&self) -> usize {
        self.waiting
    }

    /// Earliest ready time among waiting parcels.
    pub fn earliest_ready(&self) -> Option<SimTime> {
        self.earliest_ready
    }

    /// Latest ready time among waiting parcels: the destination is
    /// deliverable only once all of them are ready.
    pub fn ready_time(&self) -> Option<SimTime> {
        self.ready_time
    }

    /// Earliest deadline among waiting parcels.
    pub fn deadline(&self) -> Option<SimTime> {
        self.deadline
    }

    /// Vehicle every waiting parcel must travel on, if any.
    pub fn required_vehicle(&self) -> Option<usize> {
        self.required_vehicle
    }

    /// Returns `true` when nothing is left waiting at the depot for this
    /// destination.
    pub fn is_routed(&self) -> bool {
        self.routed
    }
}

/// Owns all parcels and the destination index.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{Parcel, SimTime};
/// use u_dispatch::registry::Registry;
///
/// let registry = Registry::from_parcels(
///     vec![
///         Parcel::new(1, 5, 2.0).with_deadline(SimTime::from_hm(10, 30)),
///         Parcel::new(2, 5, 1.0).with_required_vehicle(2),
///         Parcel::new(3, 7, 4.0),
///     ],
///     &[],
/// )
/// .unwrap();
///
/// let dest = registry.destination(5).unwrap();
/// assert_eq!(dest.waiting(), 2);
/// assert_eq!(dest.deadline(), Some(SimTime::from_hm(10, 30)));
/// assert_eq!(dest.required_vehicle(), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    parcels: BTreeMap<usize, Parcel>,
    destinations: BTreeMap<usize, DestinationInfo>,
    links: Vec<(usize, Vec<usize>)>,
    linkage: Vec<LinkageSet>,
}

impl Registry {
    /// Builds a registry from constructed parcels and linkage notes.
    ///
    /// Each link is `(parcel, parcels it must be delivered with)`.
    pub fn from_parcels(parcels: Vec<Parcel>, links: &[(usize, Vec<usize>)]) -> Result<Self> {
        let mut by_id = BTreeMap::new();
        for parcel in parcels {
            let parcel_id = parcel.id();
            if by_id.insert(parcel_id, parcel).is_some() {
                return Err(DispatchError::DuplicateParcel { parcel_id });
            }
        }

        let mut registry = Self {
            parcels: by_id,
            destinations: BTreeMap::new(),
            links: links.to_vec(),
            linkage: Vec::new(),
        };
        for (&id, parcel) in &registry.parcels {
            registry
                .destinations
                .entry(parcel.destination())
                .or_insert_with(|| DestinationInfo::new(parcel.destination()))
                .parcels
                .insert(id);
        }
        let ids: Vec<usize> = registry.destinations.keys().copied().collect();
        for dest in ids {
            registry.refresh(dest)?;
        }
        registry.relink()?;
        Ok(registry)
    }

    /// Builds a registry from manifest rows, resolving every address
    /// against `locations` and checking it against `distances`.
    pub fn from_manifest(
        locations: &LocationTable,
        distances: &DistanceMatrix,
        entries: &[ManifestEntry],
    ) -> Result<Self> {
        let mut parcels = Vec::with_capacity(entries.len());
        let mut links = Vec::new();

        for entry in entries {
            let destination = locations
                .lookup(&entry.address, &entry.postal_code)
                .ok_or_else(|| DispatchError::UnknownAddress {
                    parcel_id: entry.id,
                    address: entry.address.clone(),
                    postal_code: entry.postal_code.clone(),
                })?;
            distances.check(destination)?;

            let mut parcel = Parcel::new(entry.id, destination, entry.mass);
            if let Some(deadline) = SimTime::parse_deadline(&entry.deadline)? {
                parcel = parcel.with_deadline(deadline);
            }
            for note in entry.parsed_notes()? {
                match note {
                    ParcelNote::RequiredVehicle(v) => parcel = parcel.with_required_vehicle(v),
                    ParcelNote::ReadyAt(t) => parcel = parcel.with_ready_time(t),
                    ParcelNote::LinkedWith(others) => links.push((entry.id, others)),
                    ParcelNote::AddressPending => parcel.set_address_pending(true),
                }
            }
            parcels.push(parcel);
        }

        Self::from_parcels(parcels, &links)
    }

    /// Returns the parcel with the given ID.
    pub fn parcel(&self, id: usize) -> Option<&Parcel> {
        self.parcels.get(&id)
    }

    /// Iterates over all parcels in ID order.
    pub fn parcels(&self) -> impl Iterator<Item = &Parcel> {
        self.parcels.values()
    }

    /// Number of parcels.
    pub fn num_parcels(&self) -> usize {
        self.parcels.len()
    }

    /// Returns the aggregate for a destination.
    pub fn destination(&self, id: usize) -> Option<&DestinationInfo> {
        self.destinations.get(&id)
    }

    /// Iterates over all indexed destinations in ID order.
    pub fn destinations(&self) -> impl Iterator<Item = &DestinationInfo> {
        self.destinations.values()
    }

    /// Parcels waiting at the depot for `destination`, in ID order.
    pub fn waiting_parcels(&self, destination: usize) -> Vec<usize> {
        self.destinations
            .get(&destination)
            .into_iter()
            .flat_map(|d| d.parcels.iter())
            .filter(|&&id| self.parcels.get(&id).is_some_and(Self::is_waiting))
            .copied()
            .collect()
    }

    /// Number of parcels waiting at the depot for `destination`.
    pub fn waiting_count(&self, destination: usize) -> usize {
        self.destinations.get(&destination).map_or(0, |d| d.waiting)
    }

    /// Linkage sets for the current destination assignment.
    pub fn linkage_sets(&self) -> &[LinkageSet] {
        &self.linkage
    }

    /// The linkage set spanning `destination`, if any.
    pub fn linkage_of(&self, destination: usize) -> Option<&LinkageSet> {
        self.linkage
            .iter()
            .find(|s| s.spans_destinations() && s.destinations().contains(&destination))
    }

    /// Updates a parcel's status and refreshes its destination's aggregates.
    pub fn set_status(&mut self, parcel_id: usize, status: ParcelStatus) -> Result<()> {
        let parcel = self
            .parcels
            .get_mut(&parcel_id)
            .ok_or(DispatchError::UnknownParcel { parcel_id })?;
        parcel.set_status(status);
        let dest = parcel.destination();
        self.refresh(dest)
    }

    /// Moves a parcel to `new_destination`, recomputing the aggregates of
    /// both the old and the new destination. Clears any pending-address hold.
    ///
    /// Returns the old destination.
    pub fn update_destination(&mut self, parcel_id: usize, new_destination: usize) -> Result<usize> {
        let parcel = self
            .parcels
            .get_mut(&parcel_id)
            .ok_or(DispatchError::UnknownParcel { parcel_id })?;
        let old = parcel.destination();
        parcel.set_destination(new_destination);
        parcel.set_address_pending(false);

        if let Some(info) = self.destinations.get_mut(&old) {
            info.parcels.remove(&parcel_id);
        }
        self.destinations
            .entry(new_destination)
            .or_insert_with(|| DestinationInfo::new(new_destination))
            .parcels
            .insert(parcel_id);

        self.refresh(old)?;
        self.refresh(new_destination)?;
        self.relink()?;
        Ok(old)
    }

    fn is_waiting(parcel: &Parcel) -> bool {
        parcel.status().is_pending() && !parcel.is_address_pending()
    }

    fn refresh(&mut self, destination: usize) -> Result<()> {
        let Some(info) = self.destinations.get_mut(&destination) else {
            return Ok(());
        };
        let mut waiting = 0;
        let mut earliest_ready: Option<SimTime> = None;
        let mut ready_time: Option<SimTime> = None;
        let mut deadline: Option<SimTime> = None;
        let mut required_vehicle: Option<usize> = None;

        for parcel in info.parcels.iter().filter_map(|id| self.parcels.get(id)) {
            if !Self::is_waiting(parcel) {
                continue;
            }
            waiting += 1;
            if let Some(r) = parcel.ready_time() {
                earliest_ready = Some(earliest_ready.map_or(r, |e| e.min(r)));
                ready_time = Some(ready_time.map_or(r, |l| l.max(r)));
            }
            if let Some(d) = parcel.deadline() {
                deadline = Some(deadline.map_or(d, |e| e.min(d)));
            }
            if let Some(v) = parcel.required_vehicle() {
                match required_vehicle {
                    Some(existing) if existing != v => {
                        return Err(DispatchError::ConflictingVehicle {
                            destination,
                            first: existing,
                            second: v,
                        });
                    }
                    _ => required_vehicle = Some(v),
                }
            }
        }

        info.waiting = waiting;
        info.earliest_ready = earliest_ready;
        info.ready_time = ready_time;
        info.deadline = deadline;
        info.required_vehicle = required_vehicle;
        info.routed = waiting == 0;
        Ok(())
    }

    fn relink(&mut self) -> Result<()> {
        self.linkage = linkage::discover(&self.parcels, &self.links)?;
        for parcel in self.parcels.values_mut() {
            parcel.set_linkage(None);
        }
        for set in &self.linkage {
            for id in set.parcels() {
                if let Some(parcel) = self.parcels.get_mut(id) {
                    parcel.set_linkage(Some(set.id()));
                }
            }
        }
        Ok(())
    }
}
