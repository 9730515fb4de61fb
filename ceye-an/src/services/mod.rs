//! Analysis pipeline services
//!
//! Leaf-first: date-range arithmetic, the pixel contamination classifier,
//! the change grid analyzer, and the alert filter are pure computation; the
//! Sentinel client and the imagery fan-out talk to the provider; `analysis`
//! coordinates the whole request.

pub mod analysis;
pub mod date_ranges;
pub mod filter;
pub mod grid;
pub mod imagery;
pub mod pixel;
pub mod sentinel;

pub use pixel::PixelClassifier;
pub use sentinel::{ImageryProvider, SentinelHubClient};
