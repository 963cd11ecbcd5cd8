//! Risk classification module
//!
//! This module provides:
//! - Ordinal risk labels ranked by centroid level
//! - The fitted risk classifier with JSON artifact persistence

mod classifier;
mod label;

pub use classifier::*;
pub use label::*;
