//! HTTP API handlers for ceye-an

pub mod analyze;
pub mod health;

pub use analyze::analyze_deforestation;
pub use health::health_routes;
