//! Merge-tree nodes.

use serde::{Deserialize, Serialize};

use crate::models::SimTime;

/// Index of a [`ClusterGroup`] in its forest's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    /// Position in the arena, which is also the creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One side of a merge: a raw destination or a previously built group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Member {
    /// A single destination.
    Leaf(usize),
    /// An internal node of the merge tree.
    Group(GroupId),
}

/// A binary merge-tree node aggregating the destinations beneath it.
///
/// `members` pairs every destination under the node with the sum of its
/// distances to all the other destinations under the node; the center is the
/// member with the smallest sum (lowest id on ties).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterGroup {
    pub(crate) id: GroupId,
    pub(crate) children: [Member; 2],
    pub(crate) parent: Option<GroupId>,
    pub(crate) members: Vec<(usize, f64)>,
    pub(crate) parcel_count: usize,
    pub(crate) required_vehicle: Option<usize>,
    pub(crate) deadline: Option<SimTime>,
    pub(crate) center: usize,
    pub(crate) path: Option<Vec<usize>>,
}

impl ClusterGroup {
    /// Group ID.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// The two merged sides, in merge order.
    pub fn children(&self) -> [Member; 2] {
        self.children
    }

    /// Enclosing group, or `None` for a top-level group.
    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    /// Destinations under this node, in merge order.
    pub fn destinations(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().map(|&(d, _)| d)
    }

    /// Number of destinations under this node.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`: a merge node holds at least two destinations.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Parcels waiting for all destinations under this node.
    pub fn parcel_count(&self) -> usize {
        self.parcel_count
    }

    /// Vehicle every parcel under this node must travel on, if any.
    pub fn required_vehicle(&self) -> Option<usize> {
        self.required_vehicle
    }

    /// Earliest deadline under this node.
    pub fn deadline(&self) -> Option<SimTime> {
        self.deadline
    }

    /// Representative destination.
    pub fn center(&self) -> usize {
        self.center
    }

    /// Visiting order, once a route has been built for this group.
    pub fn path(&self) -> Option<&[usize]> {
        self.path.as_deref()
    }
}

/// Picks the member with the smallest distance sum, lowest id on ties.
pub(crate) fn center_of(members: &[(usize, f64)]) -> usize {
    members
        .iter()
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        .map_or(0, |&(d, _)| d)
}
