//! Agglomerative clustering of deliverable destinations.
//!
//! # Algorithm
//!
//! 1. **Linkage**: destinations of every linkage set are merged into one
//!    group straight away, ignoring distance.
//! 2. **Nearest pairs**: all pairs of still-ungrouped destinations are
//!    visited by ascending distance. A pair with both ends ungrouped becomes a
//!    new group; a pair with one end ungrouped attaches that end to the
//!    other end's top-level group. Pairs with both ends grouped are skipped,
//!    and the pass ends once nothing is ungrouped.
//! 3. **Agglomeration**: the two top-level groups whose centers are closest
//!    are merged, provided the merge stays within capacity and the required
//!    vehicles agree. A rejected pair is skipped in favour of the next
//!    closest. The pass ends when no pair can merge.
//!
//! Every merge is a binary node; centers are kept exact through incremental
//! distance sums (see [`ClusterForest`]).
//!
//! # Complexity
//!
//! O(n² log n) for the pair pass and O(g³ log g) for agglomeration over g
//! top-level groups.

use std::collections::BTreeSet;

use log::debug;

use crate::distance::DistanceMatrix;
use crate::error::{DispatchError, Result};
use crate::registry::Registry;

use super::forest::{ClusterForest, Summary};
use super::group::Member;

/// Why two members could not merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRejection {
    /// The combined parcels exceed vehicle capacity.
    OverCapacity {
        /// Combined parcel count.
        parcels: usize,
    },
    /// The two sides are reserved for different vehicles.
    VehicleConflict {
        /// Vehicle of the first side.
        first: usize,
        /// Vehicle of the second side.
        second: usize,
    },
}

/// Groups deliverable destinations into capacity- and affinity-respecting
/// top-level groups.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use u_dispatch::cluster::{ClusterForest, Clusterer};
/// use u_dispatch::distance::DistanceMatrix;
/// use u_dispatch::models::Parcel;
/// use u_dispatch::registry::Registry;
///
/// let dm = DistanceMatrix::from_lower_triangle(&[
///     vec![0.0],
///     vec![1.0, 0.0],
///     vec![2.0, 1.0, 0.0],
///     vec![9.0, 8.0, 7.0, 0.0],
/// ])
/// .unwrap();
/// let registry = Registry::from_parcels(
///     (1..=3).map(|d| Parcel::new(d, d, 1.0)).collect(),
///     &[],
/// )
/// .unwrap();
///
/// let mut forest = ClusterForest::new();
/// let deliverable: BTreeSet<usize> = [1, 2, 3].into();
/// Clusterer::new(&dm, &registry, 2)
///     .cluster(&mut forest, &deliverable)
///     .unwrap();
/// // Capacity 2 keeps the far destination on its own.
/// assert_eq!(forest.roots().len(), 2);
/// ```
pub struct Clusterer<'a> {
    distances: &'a DistanceMatrix,
    registry: &'a Registry,
    capacity: usize,
}

impl<'a> Clusterer<'a> {
    /// Creates a clusterer for vehicles carrying at most `capacity` parcels.
    pub fn new(distances: &'a DistanceMatrix, registry: &'a Registry, capacity: usize) -> Self {
        Self {
            distances,
            registry,
            capacity,
        }
    }

    /// Checks whether `a` and `b` may be merged.
    pub fn can_merge(&self, a: &Summary, b: &Summary) -> std::result::Result<(), MergeRejection> {
        if let (Some(first), Some(second)) = (a.required_vehicle, b.required_vehicle) {
            if first != second {
                return Err(MergeRejection::VehicleConflict { first, second });
            }
        }
        let parcels = a.parcel_count + b.parcel_count;
        if parcels > self.capacity {
            return Err(MergeRejection::OverCapacity { parcels });
        }
        Ok(())
    }

    /// Runs a full clustering pass over `deliverable`, replacing the forest's
    /// top-level partition.
    ///
    /// Destinations with nothing waiting are ignored. Fails if a single
    /// destination or a linkage set cannot fit in one vehicle, or if a
    /// linkage set mixes required vehicles.
    pub fn cluster(&self, forest: &mut ClusterForest, deliverable: &BTreeSet<usize>) -> Result<()> {
        let active: BTreeSet<usize> = deliverable
            .iter()
            .copied()
            .filter(|&d| self.registry.waiting_count(d) > 0)
            .collect();

        for &d in &active {
            self.distances.check(d)?;
            let parcels = self.registry.waiting_count(d);
            if parcels > self.capacity {
                return Err(DispatchError::DestinationOverCapacity {
                    destination: d,
                    parcels,
                    capacity: self.capacity,
                });
            }
        }

        forest.clear_roots();
        for &d in &active {
            forest.push_root(Member::Leaf(d));
        }

        let mut ungrouped = active.clone();
        self.merge_linkage(forest, &active, &mut ungrouped)?;
        self.pair_pass(forest, &mut ungrouped);
        self.agglomerate(forest);

        debug!(
            "clustered {} destinations into {} top-level groups",
            active.len(),
            forest.roots().len()
        );
        Ok(())
    }

    /// Merges `destinations` into a single tree regardless of capacity or
    /// vehicle constraints, always joining the two closest centers first.
    ///
    /// The tree is not added to the forest's roots. Returns `None` for an
    /// empty input.
    pub fn build_tree(&self, forest: &mut ClusterForest, destinations: &[usize]) -> Option<Member> {
        let mut pool: Vec<Member> = destinations.iter().map(|&d| Member::Leaf(d)).collect();
        while pool.len() > 1 {
            let centers: Vec<usize> = pool
                .iter()
                .map(|&m| forest.summary(m, self.registry).center)
                .collect();
            let mut best = (0, 1, f64::INFINITY);
            for i in 0..pool.len() {
                for j in (i + 1)..pool.len() {
                    let d = self.distances.get(centers[i], centers[j]);
                    if d < best.2 {
                        best = (i, j, d);
                    }
                }
            }
            let (i, j, _) = best;
            let b = pool.remove(j);
            let a = pool.remove(i);
            let id = forest.combine(a, b, self.registry, self.distances);
            pool.push(Member::Group(id));
        }
        pool.pop()
    }

    fn merge_linkage(
        &self,
        forest: &mut ClusterForest,
        active: &BTreeSet<usize>,
        ungrouped: &mut BTreeSet<usize>,
    ) -> Result<()> {
        for set in self.registry.linkage_sets() {
            let members: Vec<usize> = set
                .destinations()
                .iter()
                .copied()
                .filter(|d| active.contains(d))
                .collect();
            let Some((&first, rest)) = members.split_first() else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }

            let mut acc = Member::Leaf(first);
            for &d in rest {
                let left = forest.summary(acc, self.registry);
                let right = forest.summary(Member::Leaf(d), self.registry);
                match self.can_merge(&left, &right) {
                    Ok(()) => {}
                    Err(MergeRejection::OverCapacity { .. }) => {
                        return Err(DispatchError::LinkageOverCapacity {
                            parcels: members.iter().map(|&m| self.registry.waiting_count(m)).sum(),
                            destinations: members.clone(),
                            capacity: self.capacity,
                        });
                    }
                    Err(MergeRejection::VehicleConflict { first, second }) => {
                        return Err(DispatchError::ConflictingVehicle {
                            destination: d,
                            first,
                            second,
                        });
                    }
                }
                acc = Member::Group(forest.merge_roots(acc, Member::Leaf(d), self.registry, self.distances));
            }
            for d in &members {
                ungrouped.remove(d);
            }
            debug!("forced linkage set {} into one group: {:?}", set.id(), members);
        }
        Ok(())
    }

    fn pair_pass(&self, forest: &mut ClusterForest, ungrouped: &mut BTreeSet<usize>) {
        let nodes: Vec<usize> = ungrouped.iter().copied().collect();
        let mut pairs = Vec::with_capacity(nodes.len() * nodes.len().saturating_sub(1) / 2);
        for (i, &a) in nodes.iter().enumerate() {
            for &b in &nodes[i + 1..] {
                pairs.push((self.distances.get(a, b), a, b));
            }
        }
        pairs.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)).then(x.2.cmp(&y.2)));

        for (_, a, b) in pairs {
            if ungrouped.is_empty() {
                break;
            }
            let (loose, other) = match (ungrouped.contains(&a), ungrouped.contains(&b)) {
                (true, true) => (a, Member::Leaf(b)),
                (true, false) => match forest.root_containing(b) {
                    Some(root) => (a, root),
                    None => continue,
                },
                (false, true) => match forest.root_containing(a) {
                    Some(root) => (b, root),
                    None => continue,
                },
                (false, false) => continue,
            };

            let left = forest.summary(Member::Leaf(loose), self.registry);
            let right = forest.summary(other, self.registry);
            if let Err(reason) = self.can_merge(&left, &right) {
                debug!("pair {a}-{b} skipped: {reason:?}");
                continue;
            }
            forest.merge_roots(Member::Leaf(loose), other, self.registry, self.distances);
            ungrouped.remove(&loose);
            if let Member::Leaf(d) = other {
                ungrouped.remove(&d);
            }
        }
    }

    fn agglomerate(&self, forest: &mut ClusterForest) {
        loop {
            let roots = forest.roots().to_vec();
            let summaries: Vec<Summary> = roots
                .iter()
                .map(|&m| forest.summary(m, self.registry))
                .collect();

            let mut candidates = Vec::new();
            for i in 0..roots.len() {
                for j in (i + 1)..roots.len() {
                    let d = self.distances.get(summaries[i].center, summaries[j].center);
                    candidates.push((d, i, j));
                }
            }
            candidates.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)).then(x.2.cmp(&y.2)));

            let chosen = candidates.into_iter().find(|&(d, i, j)| {
                match self.can_merge(&summaries[i], &summaries[j]) {
                    Ok(()) => true,
                    Err(reason) => {
                        debug!(
                            "merge of centers {} and {} ({d:.1} apart) rejected: {reason:?}",
                            summaries[i].center, summaries[j].center
                        );
                        false
                    }
                }
            });

            match chosen {
                Some((d, i, j)) => {
                    let id = forest.merge_roots(roots[i], roots[j], self.registry, self.distances);
                    debug!(
                        "merged centers {} and {} ({d:.1} apart) into group {}",
                        summaries[i].center,
                        summaries[j].center,
                        id.index()
                    );
                }
                None => break,
            }
        }
    }
}
