//! Availability state machine.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::SimTime;
use crate::registry::Registry;

/// Availability of one destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Availability {
    /// Some waiting parcel (or a linked destination's parcel) is not ready yet.
    Unavailable {
        /// When the destination becomes available.
        ready_at: SimTime,
    },
    /// Every waiting parcel is ready; the destination may be clustered.
    Available,
    /// Nothing waits at the depot for this destination.
    Routed,
}

/// Tracks which destinations may be clustered at the current time.
///
/// A destination is gated by the latest ready time among its waiting
/// parcels. Destinations in one linkage set share a gate: the latest ready
/// time across the whole set, so the set never splits over two trips.
///
/// # Examples
///
/// ```
/// use u_dispatch::availability::{Availability, AvailabilityTracker};
/// use u_dispatch::models::{Parcel, SimTime};
/// use u_dispatch::registry::Registry;
///
/// let registry = Registry::from_parcels(
///     vec![
///         Parcel::new(1, 3, 1.0),
///         Parcel::new(2, 4, 1.0).with_ready_time(SimTime::from_hm(9, 5)),
///     ],
///     &[],
/// )
/// .unwrap();
///
/// let mut tracker = AvailabilityTracker::new(&registry, SimTime::from_hm(8, 0));
/// assert_eq!(tracker.state(3), Some(Availability::Available));
/// assert_eq!(tracker.next_wake_time(), SimTime::from_hm(9, 5));
///
/// assert_eq!(tracker.release(SimTime::from_hm(9, 5)), vec![4]);
/// assert!(tracker.next_wake_time().is_end_of_day());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AvailabilityTracker {
    states: BTreeMap<usize, Availability>,
}

impl AvailabilityTracker {
    /// Classifies every destination with waiting parcels at time `now`.
    pub fn new(registry: &Registry, now: SimTime) -> Self {
        let mut tracker = Self::default();
        tracker.sync(registry, now);
        tracker
    }

    /// Time at which `destination` may be loaded, or `None` if nothing
    /// holds it back.
    pub fn gate_time(registry: &Registry, destination: usize) -> Option<SimTime> {
        let own = registry.destination(destination).and_then(|i| i.ready_time());
        match registry.linkage_of(destination) {
            Some(set) => set
                .destinations()
                .iter()
                .filter_map(|&d| registry.destination(d).and_then(|i| i.ready_time()))
                .chain(own)
                .max(),
            None => own,
        }
    }

    /// State of `destination`, or `None` if it never had parcels waiting.
    pub fn state(&self, destination: usize) -> Option<Availability> {
        self.states.get(&destination).copied()
    }

    /// Destinations currently available for clustering.
    pub fn available(&self) -> BTreeSet<usize> {
        self.states
            .iter()
            .filter(|(_, s)| matches!(s, Availability::Available))
            .map(|(&d, _)| d)
            .collect()
    }

    /// Returns `true` if some destination is still waiting to be routed.
    pub fn has_pending(&self) -> bool {
        self.states
            .values()
            .any(|s| !matches!(s, Availability::Routed))
    }

    /// Moves every destination whose gate has passed to `Available`.
    ///
    /// Returns the destinations released, in ID order.
    pub fn release(&mut self, now: SimTime) -> Vec<usize> {
        let mut released = Vec::new();
        for (&d, state) in self.states.iter_mut() {
            if let Availability::Unavailable { ready_at } = *state {
                if ready_at <= now {
                    *state = Availability::Available;
                    released.push(d);
                }
            }
        }
        released
    }

    /// Earliest gate among unavailable destinations, or
    /// [`SimTime::END_OF_DAY`] when nothing is pending.
    pub fn next_wake_time(&self) -> SimTime {
        self.states
            .values()
            .filter_map(|s| match s {
                Availability::Unavailable { ready_at } => Some(*ready_at),
                _ => None,
            })
            .min()
            .unwrap_or(SimTime::END_OF_DAY)
    }

    /// Records that every waiting parcel for `destination` has been loaded.
    pub fn mark_routed(&mut self, destination: usize) {
        self.states.insert(destination, Availability::Routed);
    }

    /// Re-derives every state from the registry after parcels moved
    /// (returns to the depot, address corrections).
    ///
    /// Destinations with nothing waiting become `Routed`; the others are
    /// gated afresh.
    pub fn sync(&mut self, registry: &Registry, now: SimTime) {
        for info in registry.destinations() {
            let d = info.id();
            if info.waiting() == 0 {
                if let Some(state) = self.states.get_mut(&d) {
                    *state = Availability::Routed;
                }
                continue;
            }
            let state = match Self::gate_time(registry, d) {
                Some(ready_at) if ready_at > now => Availability::Unavailable { ready_at },
                _ => Availability::Available,
            };
            self.states.insert(d, state);
        }
    }
}
