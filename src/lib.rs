//! Floorbot Backend Library
//!
//! Exposes the floor price estimation pipeline for binaries and tests.

pub mod floor;
pub mod models;

pub use floor::{FloorConfig, FloorPriceEstimator};
