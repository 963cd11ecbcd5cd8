//! Data module for reading and preparing health-metric tables
//!
//! This module provides:
//! - CSV-backed tabular data with named numeric columns
//! - Feature-matrix extraction for classification
//! - Z-score standardization with stored fit parameters

mod standardize;
mod table;

pub use standardize::*;
pub use table::*;
