//! Recursive path construction over a merge tree.

use crate::cluster::{ClusterForest, Clusterer, Member};
use crate::distance::DistanceMatrix;
use crate::registry::Registry;

/// Orders the destinations of a group into a visiting path.
///
/// At every internal node the child holding the earlier deadline is visited
/// first. When neither child holds one, or both hold the same one, the child
/// whose center is closer to the current origin goes first, and on equal
/// distance the earlier merged child wins. The second child is then walked
/// starting from the last stop of the first.
///
/// # Examples
///
/// ```
/// use u_dispatch::cluster::{ClusterForest, Clusterer};
/// use u_dispatch::distance::DistanceMatrix;
/// use u_dispatch::models::Parcel;
/// use u_dispatch::registry::Registry;
/// use u_dispatch::routing::RouteBuilder;
///
/// let dm = DistanceMatrix::from_lower_triangle(&[
///     vec![0.0],
///     vec![1.0, 0.0],
///     vec![2.0, 1.0, 0.0],
/// ])
/// .unwrap();
/// let registry = Registry::from_parcels(
///     vec![Parcel::new(1, 1, 1.0), Parcel::new(2, 2, 1.0)],
///     &[],
/// )
/// .unwrap();
///
/// let mut forest = ClusterForest::new();
/// let tree = Clusterer::new(&dm, &registry, 16)
///     .build_tree(&mut forest, &[2, 1])
///     .unwrap();
/// let path = RouteBuilder::new(&dm, &registry).build_path(&forest, tree, 0);
/// assert_eq!(path, vec![1, 2]);
/// ```
pub struct RouteBuilder<'a> {
    distances: &'a DistanceMatrix,
    registry: &'a Registry,
}

impl<'a> RouteBuilder<'a> {
    /// Creates a route builder.
    pub fn new(distances: &'a DistanceMatrix, registry: &'a Registry) -> Self {
        Self {
            distances,
            registry,
        }
    }

    /// Builds the visiting order for `member`, starting from `origin`.
    pub fn build_path(&self, forest: &ClusterForest, member: Member, origin: usize) -> Vec<usize> {
        let mut path = Vec::new();
        self.walk(forest, member, origin, &mut path);
        path
    }

    /// Builds a path that visits every deadline-bearing destination of
    /// `member` before the rest.
    ///
    /// Each half is re-clustered into its own tree (without capacity
    /// limits) and walked with [`build_path`](Self::build_path); the second
    /// half starts from the last stop of the first. Falls back to a plain
    /// path when either half is empty.
    pub fn build_timely_split(
        &self,
        forest: &mut ClusterForest,
        member: Member,
        origin: usize,
    ) -> Vec<usize> {
        let mut destinations = forest.destinations(member);
        destinations.sort_unstable();
        let (timely, rest): (Vec<usize>, Vec<usize>) =
            destinations.into_iter().partition(|&d| {
                self.registry
                    .destination(d)
                    .and_then(|info| info.deadline())
                    .is_some()
            });
        if timely.is_empty() || rest.is_empty() {
            return self.build_path(forest, member, origin);
        }

        let clusterer = Clusterer::new(self.distances, self.registry, usize::MAX);
        let mut path = Vec::with_capacity(timely.len() + rest.len());
        let mut from = origin;
        for half in [timely, rest] {
            if let Some(tree) = clusterer.build_tree(forest, &half) {
                let sub = self.build_path(forest, tree, from);
                from = sub.last().copied().unwrap_or(from);
                path.extend(sub);
            }
        }
        path
    }

    fn walk(&self, forest: &ClusterForest, member: Member, origin: usize, path: &mut Vec<usize>) {
        match member {
            Member::Leaf(d) => path.push(d),
            Member::Group(id) => {
                let Some(group) = forest.group(id) else {
                    return;
                };
                let [a, b] = group.children();
                let (first, second) = self.order_children(forest, a, b, origin);
                self.walk(forest, first, origin, path);
                let next_origin = path.last().copied().unwrap_or(origin);
                self.walk(forest, second, next_origin, path);
            }
        }
    }

    fn order_children(
        &self,
        forest: &ClusterForest,
        a: Member,
        b: Member,
        origin: usize,
    ) -> (Member, Member) {
        let sa = forest.summary(a, self.registry);
        let sb = forest.summary(b, self.registry);
        match (sa.deadline, sb.deadline) {
            (Some(_), None) => (a, b),
            (None, Some(_)) => (b, a),
            (Some(x), Some(y)) if x < y => (a, b),
            (Some(x), Some(y)) if y < x => (b, a),
            _ => {
                let da = self.distances.get(origin, sa.center);
                let db = self.distances.get(origin, sb.center);
                if db < da {
                    (b, a)
                } else {
                    (a, b)
                }
            }
        }
    }
}
