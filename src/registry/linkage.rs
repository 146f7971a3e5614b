//! Discovery of parcel linkage sets.
//!
//! Parcels noted "must be delivered with" others form an undirected graph.
//! Every connected component of that graph, lifted to the destinations its
//! parcels are bound for, is one linkage set: those destinations must share
//! a single trip.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};
use crate::models::Parcel;

/// A set of parcels that must be delivered on the same trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkageSet {
    id: usize,
    parcels: BTreeSet<usize>,
    destinations: BTreeSet<usize>,
}

impl LinkageSet {
    /// Set ID (stable for a given manifest and destination assignment).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Member parcels.
    pub fn parcels(&self) -> &BTreeSet<usize> {
        &self.parcels
    }

    /// Destinations the member parcels are bound for.
    pub fn destinations(&self) -> &BTreeSet<usize> {
        &self.destinations
    }

    /// Returns `true` if the set spans more than one destination and so
    /// constrains clustering.
    pub fn spans_destinations(&self) -> bool {
        self.destinations.len() > 1
    }
}

/// Finds the linkage sets implied by `links`.
///
/// Each link is `(parcel, parcels it must travel with)`. Links are treated as
/// undirected. Components are discovered by breadth-first search over
/// destinations with an explicit visited set, so two components that meet at
/// a shared destination collapse into one set.
pub(crate) fn discover(
    parcels: &BTreeMap<usize, Parcel>,
    links: &[(usize, Vec<usize>)],
) -> Result<Vec<LinkageSet>> {
    let destination_of = |parcel_id: usize| {
        parcels
            .get(&parcel_id)
            .map(Parcel::destination)
            .ok_or(DispatchError::UnknownParcel { parcel_id })
    };

    let mut adjacency: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
    let mut linked_by_destination: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
    for (parcel, others) in links {
        let from = destination_of(*parcel)?;
        linked_by_destination.entry(from).or_default().insert(*parcel);
        adjacency.entry(from).or_default();
        for &other in others {
            let to = destination_of(other)?;
            linked_by_destination.entry(to).or_default().insert(other);
            adjacency.entry(from).or_default().insert(to);
            adjacency.entry(to).or_default().insert(from);
        }
    }

    let mut visited: BTreeSet<usize> = BTreeSet::new();
    let mut sets = Vec::new();
    for &start in adjacency.keys() {
        if !visited.insert(start) {
            continue;
        }
        let mut destinations = BTreeSet::new();
        let mut frontier = VecDeque::from([start]);
        while let Some(dest) = frontier.pop_front() {
            destinations.insert(dest);
            for &next in adjacency.get(&dest).into_iter().flatten() {
                if visited.insert(next) {
                    frontier.push_back(next);
                }
            }
        }
        let parcels = destinations
            .iter()
            .filter_map(|d| linked_by_destination.get(d))
            .flatten()
            .copied()
            .collect();
        sets.push(LinkageSet {
            id: sets.len(),
            parcels,
            destinations,
        });
    }
    Ok(sets)
}
