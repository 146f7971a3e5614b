//! Agglomerative location clustering.
//!
//! - [`ClusterForest`] — Arena of merge-tree nodes plus the top-level partition
//! - [`ClusterGroup`] — One binary merge node with its aggregates
//! - [`Clusterer`] — Linkage, nearest-pair and closest-center merging passes

mod clusterer;
mod forest;
mod group;

pub use clusterer::{Clusterer, MergeRejection};
pub use forest::{ClusterForest, Summary};
pub use group::{ClusterGroup, GroupId, Member};
