//! Distance matrix over delivery locations.
//!
//! Provides the static, symmetric distance graph and nearest-neighbor
//! queries used by clustering and route building.

mod matrix;

pub use matrix::DistanceMatrix;
