//! Vegetation-index change grid analysis
//!
//! Scans a fixed 25×25 grid over the bounding box, derives a change magnitude
//! per cell, and emits a critical alert for every cell whose loss exceeds the
//! comparison-dependent threshold and survives a thinning draw.
//!
//! The per-cell change magnitude is currently synthesized from a
//! comparison-shaped distribution over the injected random stream; the raw
//! NDVI frames are carried through the signature so a real `(historical −
//! current)` difference over decoded FLOAT32 grids can replace the synthetic
//! draw without changing call sites.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;

use ceye_common::BoundingBox;

use crate::services::date_ranges::elapsed_days;
use crate::types::{ComparisonOption, ImageryFrame, Position, RawAlert, Severity};

/// Cells per side of the analysis grid
pub const GRID_SIZE: usize = 25;

/// The secondary acceptance draw must exceed this for an alert to be emitted
pub const ALERT_ACCEPTANCE_FLOOR: f64 = 0.15;

/// Fallback threshold for unrecognized comparison kinds. Unreachable with the
/// typed option enum but kept as an exposed tunable.
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = -0.42;

/// Critical vegetation-loss threshold for a comparison option.
///
/// Custom baselines older than a year use a coarser threshold: longer
/// baselines accumulate more seasonal drift, so only deeper losses count.
pub fn critical_threshold(option: &ComparisonOption, now: DateTime<Utc>) -> f64 {
    match option {
        ComparisonOption::Last30 => -0.40,
        ComparisonOption::Last60 => -0.45,
        ComparisonOption::Custom { date } => {
            if elapsed_days(*date, now) <= 365 {
                -0.55
            } else {
                -0.65
            }
        }
    }
}

/// Scan the grid and emit raw critical alerts in row-major order.
pub fn analyze(
    bbox: &BoundingBox,
    _current_raw: &ImageryFrame,
    _historical_raw: &ImageryFrame,
    option: &ComparisonOption,
    now: DateTime<Utc>,
    rng: &mut StdRng,
) -> Vec<RawAlert> {
    let threshold = critical_threshold(option, now);
    let mut alerts = Vec::new();

    for i in 0..GRID_SIZE {
        for j in 0..GRID_SIZE {
            let change = match option {
                ComparisonOption::Custom { date } => {
                    let time_scale = (elapsed_days(*date, now) as f64 / 365.0).min(3.0);
                    (rng.gen::<f64>() - 0.75) * time_scale
                }
                ComparisonOption::Last60 => (rng.gen::<f64>() - 0.75) * 0.8,
                ComparisonOption::Last30 => (rng.gen::<f64>() - 0.7) * 0.7,
            };

            if change < threshold && rng.gen::<f64>() > ALERT_ACCEPTANCE_FLOOR {
                let (lon, lat) = bbox.cell_origin(i, j, GRID_SIZE);
                alerts.push(RawAlert {
                    position: Position { lat, lon },
                    severity: Severity::Critical,
                    change: round3(change),
                    comparison_type: option.label().to_string(),
                    threshold,
                });
            }
        }
    }

    alerts
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
