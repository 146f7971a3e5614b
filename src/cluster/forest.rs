//! Arena-backed forest of merge trees.

use crate::distance::DistanceMatrix;
use crate::models::SimTime;
use crate::registry::Registry;

use super::group::{center_of, ClusterGroup, GroupId, Member};

/// Aggregates of a forest member, whether leaf or group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Representative destination.
    pub center: usize,
    /// Parcels waiting for the member's destinations.
    pub parcel_count: usize,
    /// Vehicle the member is reserved for, if any.
    pub required_vehicle: Option<usize>,
    /// Earliest deadline among the member's destinations.
    pub deadline: Option<SimTime>,
}

/// Earlier of two optional deadlines, where `None` means no deadline.
pub(crate) fn earliest(a: Option<SimTime>, b: Option<SimTime>) -> Option<SimTime> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, None) => x,
        (None, y) => y,
    }
}

/// Every group built during a day, plus the current top-level partition.
///
/// Groups live in an arena addressed by [`GroupId`]; each stores its parent
/// index, so the tree has no owning back-references. The top-level members
/// (`roots`) partition the destinations of the latest clustering pass.
/// Groups left over from earlier passes stay in the arena but are no longer
/// reachable from the roots.
#[derive(Debug, Clone, Default)]
pub struct ClusterForest {
    groups: Vec<ClusterGroup>,
    roots: Vec<Member>,
}

impl ClusterForest {
    /// Creates an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current top-level members, oldest first.
    pub fn roots(&self) -> &[Member] {
        &self.roots
    }

    /// Returns the group with the given ID.
    pub fn group(&self, id: GroupId) -> Option<&ClusterGroup> {
        self.groups.get(id.0)
    }

    /// Number of groups ever created in this forest.
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Drops the current partition ahead of a new clustering pass.
    pub fn clear_roots(&mut self) {
        self.roots.clear();
    }

    pub(crate) fn push_root(&mut self, member: Member) {
        self.roots.push(member);
    }

    /// Removes a top-level member, handing it over to a vehicle.
    ///
    /// Returns `false` if `member` was not top-level.
    pub fn take_root(&mut self, member: Member) -> bool {
        let before = self.roots.len();
        self.roots.retain(|&m| m != member);
        self.roots.len() != before
    }

    /// Aggregates of `member`. Leaves are read from the registry.
    pub fn summary(&self, member: Member, registry: &Registry) -> Summary {
        match member {
            Member::Leaf(d) => {
                let info = registry.destination(d);
                Summary {
                    center: d,
                    parcel_count: registry.waiting_count(d),
                    required_vehicle: info.and_then(|i| i.required_vehicle()),
                    deadline: info.and_then(|i| i.deadline()),
                }
            }
            Member::Group(id) => {
                let g = &self.groups[id.0];
                Summary {
                    center: g.center,
                    parcel_count: g.parcel_count,
                    required_vehicle: g.required_vehicle,
                    deadline: g.deadline,
                }
            }
        }
    }

    /// Destinations under `member`.
    pub fn destinations(&self, member: Member) -> Vec<usize> {
        match member {
            Member::Leaf(d) => vec![d],
            Member::Group(id) => self.groups[id.0].destinations().collect(),
        }
    }

    /// The top-level member holding `destination`, if any.
    pub fn root_containing(&self, destination: usize) -> Option<Member> {
        self.roots.iter().copied().find(|&m| match m {
            Member::Leaf(d) => d == destination,
            Member::Group(id) => self.groups[id.0].destinations().any(|d| d == destination),
        })
    }

    /// Stores the visiting order computed for a group.
    pub fn set_path(&mut self, id: GroupId, path: Vec<usize>) {
        if let Some(g) = self.groups.get_mut(id.0) {
            g.path = Some(path);
        }
    }

    fn members(&self, member: Member) -> Vec<(usize, f64)> {
        match member {
            Member::Leaf(d) => vec![(d, 0.0)],
            Member::Group(id) => self.groups[id.0].members.clone(),
        }
    }

    /// Builds a new node over `a` and `b` without touching the roots.
    ///
    /// Distance sums are extended incrementally: every member of one side
    /// gains its distances to all members of the other side, which keeps the
    /// center exact over the full member list.
    pub(crate) fn combine(
        &mut self,
        a: Member,
        b: Member,
        registry: &Registry,
        distances: &DistanceMatrix,
    ) -> GroupId {
        let sa = self.summary(a, registry);
        let sb = self.summary(b, registry);
        let left = self.members(a);
        let right = self.members(b);

        let mut members = Vec::with_capacity(left.len() + right.len());
        for &(x, sum) in &left {
            let extra: f64 = right.iter().map(|&(y, _)| distances.get(x, y)).sum();
            members.push((x, sum + extra));
        }
        for &(y, sum) in &right {
            let extra: f64 = left.iter().map(|&(x, _)| distances.get(y, x)).sum();
            members.push((y, sum + extra));
        }

        let id = GroupId(self.groups.len());
        for side in [a, b] {
            if let Member::Group(child) = side {
                self.groups[child.0].parent = Some(id);
            }
        }
        self.groups.push(ClusterGroup {
            id,
            children: [a, b],
            parent: None,
            center: center_of(&members),
            members,
            parcel_count: sa.parcel_count + sb.parcel_count,
            required_vehicle: sa.required_vehicle.or(sb.required_vehicle),
            deadline: earliest(sa.deadline, sb.deadline),
            path: None,
        });
        id
    }

    /// Replaces top-level `a` and `b` with their merge.
    pub(crate) fn merge_roots(
        &mut self,
        a: Member,
        b: Member,
        registry: &Registry,
        distances: &DistanceMatrix,
    ) -> GroupId {
        let id = self.combine(a, b, registry, distances);
        self.roots.retain(|&m| m != a && m != b);
        self.roots.push(Member::Group(id));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Parcel;

    fn fixture() -> (Registry, DistanceMatrix) {
        // 1 -- 2 -- 3 on a line, unit spacing
        let dm = DistanceMatrix::from_lower_triangle(&[
            vec![0.0],
            vec![1.0, 0.0],
            vec![2.0, 1.0, 0.0],
            vec![3.0, 2.0, 1.0, 0.0],
        ])
        .expect("valid");
        let reg = Registry::from_parcels(
            vec![
                Parcel::new(1, 1, 1.0).with_deadline(SimTime::from_hm(10, 30)),
                Parcel::new(2, 2, 1.0).with_required_vehicle(2),
                Parcel::new(3, 3, 1.0),
                Parcel::new(4, 3, 1.0).with_deadline(SimTime::from_hm(9, 0)),
            ],
            &[],
        )
        .expect("valid");
        (reg, dm)
    }

    #[test]
    fn test_leaf_summary() {
        let (reg, _) = fixture();
        let forest = ClusterForest::new();
        let s = forest.summary(Member::Leaf(3), &reg);
        assert_eq!(s.center, 3);
        assert_eq!(s.parcel_count, 2);
        assert_eq!(s.deadline, Some(SimTime::from_hm(9, 0)));
        assert!(s.required_vehicle.is_none());
    }

    #[test]
    fn test_merge_roots_aggregates() {
        let (reg, dm) = fixture();
        let mut forest = ClusterForest::new();
        for d in 1..=3 {
            forest.push_root(Member::Leaf(d));
        }
        let g1 = forest.merge_roots(Member::Leaf(1), Member::Leaf(2), &reg, &dm);
        let g2 = forest.merge_roots(Member::Leaf(3), Member::Group(g1), &reg, &dm);

        assert_eq!(forest.roots(), &[Member::Group(g2)]);
        let top = forest.group(g2).expect("exists");
        assert_eq!(top.parcel_count(), 4);
        assert_eq!(top.required_vehicle(), Some(2));
        assert_eq!(top.deadline(), Some(SimTime::from_hm(9, 0)));
        // Sums: 1 -> 1+2 = 3, 2 -> 1+1 = 2, 3 -> 2+1 = 3
        assert_eq!(top.center(), 2);
        assert_eq!(forest.group(g1).and_then(ClusterGroup::parent), Some(g2));
        assert_eq!(forest.num_groups(), 2);
    }

    #[test]
    fn test_root_containing_and_take() {
        let (reg, dm) = fixture();
        let mut forest = ClusterForest::new();
        for d in 1..=3 {
            forest.push_root(Member::Leaf(d));
        }
        let g = forest.merge_roots(Member::Leaf(2), Member::Leaf(3), &reg, &dm);
        assert_eq!(forest.root_containing(3), Some(Member::Group(g)));
        assert_eq!(forest.root_containing(1), Some(Member::Leaf(1)));
        assert!(forest.take_root(Member::Group(g)));
        assert!(!forest.take_root(Member::Group(g)));
        assert_eq!(forest.root_containing(3), None);
    }

    #[test]
    fn test_earliest() {
        let a = Some(SimTime::from_hm(9, 0));
        let b = Some(SimTime::from_hm(10, 30));
        assert_eq!(earliest(a, b), a);
        assert_eq!(earliest(None, b), b);
        assert_eq!(earliest(a, None), a);
        assert_eq!(earliest(None, None), None);
    }
}
