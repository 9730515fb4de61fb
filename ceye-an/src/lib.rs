//! ceye-an - Deforestation Analysis Microservice
//!
//! Given a bounding box and a comparison window, fetches Sentinel-2 derived
//! imagery for two date ranges, scores vegetation-index change over a fixed
//! grid, filters alerts whose pixels look contaminated by cloud, water, or
//! shadow, and returns the assembled analysis.

pub mod api;
pub mod error;
pub mod services;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use ceye_common::config::ServiceConfig;
use services::ImageryProvider;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved service configuration
    pub config: Arc<ServiceConfig>,
    /// Imagery provider collaborator (Sentinel Hub in production)
    pub provider: Arc<dyn ImageryProvider>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServiceConfig, provider: Arc<dyn ImageryProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router.
///
/// CORS is permissive: the dashboard frontend is served from a different
/// origin and the API carries no cookies.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::post;

    Router::new()
        .route("/analyze-deforestation", post(api::analyze_deforestation))
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
