//! Centroid clustering used to group observations by overall feature level

mod kmeans;

pub use kmeans::*;
