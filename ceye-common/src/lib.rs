//! # CarbonEye Common Library
//!
//! Shared code for the CarbonEye services:
//! - Error types
//! - Configuration resolution
//! - Geographic primitives (bounding box)
//! - Time and date-interval utilities

pub mod config;
pub mod error;
pub mod geo;
pub mod time;

pub use error::{Error, Result};
pub use geo::BoundingBox;
pub use time::DateInterval;
