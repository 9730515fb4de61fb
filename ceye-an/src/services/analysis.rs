//! Top-level analysis orchestration
//!
//! Validates the request, computes the comparison date ranges, fans out the
//! imagery fetches, scores the change grid, filters contaminated alerts, and
//! assembles the full response. Everything here is request-scoped; nothing is
//! shared across concurrent analyses.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use ceye_common::time;
use ceye_common::BoundingBox;

use crate::error::ApiError;
use crate::services::pixel::PixelClassifier;
use crate::services::sentinel::ImageryProvider;
use crate::services::{date_ranges, filter, grid, imagery};
use crate::types::{
    AnalysisResponse, AnalysisView, ComparisonOption, ContaminationType, FilteredAlert,
    FilteringBreakdown, FilteringView, ImageryPairView, Severity, ThresholdsView, TimeRangeView,
};

/// Run one full deforestation analysis.
///
/// `rng_seed` pins the synthetic random stream for deterministic replay;
/// unset, each request draws from entropy.
pub async fn run(
    provider: &dyn ImageryProvider,
    rng_seed: Option<u64>,
    bbox_raw: &[f64],
    option: &ComparisonOption,
) -> Result<AnalysisResponse, ApiError> {
    let now = time::now();

    // Intake validation: no network call happens past this point unless the
    // request is well-formed.
    let bbox = BoundingBox::from_request(bbox_raw).map_err(ApiError::from)?;
    if let ComparisonOption::Custom { date } = option {
        // The 60-day rule is re-checked inside date_ranges::compute; both
        // call sites share one validator.
        date_ranges::validate_custom_date(*date, now)?;
    }

    info!(bbox = ?bbox.to_array(), comparison = option.label(), "Analyzing deforestation");

    let ranges = date_ranges::compute(option, now)?;
    info!(
        current = %ranges.current.label(),
        historical = %ranges.historical.label(),
        "Computed date ranges"
    );

    let bundle = imagery::fetch_bundle(provider, &bbox, &ranges).await?;

    let mut rng = match rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_alerts = grid::analyze(
        &bbox,
        &bundle.current_ndvi_raw,
        &bundle.historical_ndvi_raw,
        option,
        now,
        &mut rng,
    );
    let raw_count = raw_alerts.len();

    let classifier = PixelClassifier::default();
    let outcome = filter::filter(
        &classifier,
        raw_alerts,
        &bundle.current_true_color,
        &bundle.historical_true_color,
        &bbox,
        &mut rng,
    )?;

    info!(
        raw = raw_count,
        valid = outcome.valid.len(),
        filtered = outcome.filtered.len(),
        "Contamination filtering complete"
    );

    let breakdown = categorize_filtered(&outcome.filtered);

    let (custom_date, days_ago) = match option {
        ComparisonOption::Custom { date } => {
            (Some(*date), Some(date_ranges::elapsed_days(*date, now)))
        }
        _ => (None, None),
    };

    let critical_alerts = outcome
        .valid
        .iter()
        .filter(|a| a.alert.severity == Severity::Critical)
        .count();
    let moderate_alerts = outcome.valid.len() - critical_alerts;

    Ok(AnalysisResponse {
        current: ImageryPairView {
            true_color: imagery::to_data_url(&bundle.current_true_color),
            ndvi: imagery::to_data_url(&bundle.current_ndvi_visual),
        },
        historical: ImageryPairView {
            true_color: imagery::to_data_url(&bundle.historical_true_color),
            ndvi: imagery::to_data_url(&bundle.historical_ndvi_visual),
        },
        analysis: AnalysisView {
            total_alerts: outcome.valid.len(),
            critical_alerts,
            moderate_alerts,
            raw_alerts_count: raw_count,
            total_filtered: outcome.filtered.len(),
            comparison_type: option.label().to_string(),
            time_range: TimeRangeView {
                current: ranges.current.label(),
                historical: ranges.historical.label(),
            },
            thresholds: ThresholdsView {
                critical: grid::critical_threshold(option, now),
            },
            filtering: FilteringView {
                enabled: true,
                strict_contamination_filtering: true,
                enhanced_water_detection: true,
                enhanced_black_region_detection: true,
                strict_cloud_white_pixel_filtering: true,
                filtering_breakdown: breakdown,
                filtered_alerts: outcome.filtered,
                filtering_stats: outcome.stats,
            },
            custom_date,
            days_ago,
        },
        alerts: outcome.valid,
    })
}

/// Count filtered alerts by dominant contamination category.
/// Cloud wins over water, water over black region, checked against either frame.
fn categorize_filtered(filtered: &[FilteredAlert]) -> FilteringBreakdown {
    let mut breakdown = FilteringBreakdown::default();
    for alert in filtered {
        let kinds = [alert.current_contamination, alert.historical_contamination];
        if kinds.contains(&ContaminationType::CloudWhitePixel) {
            breakdown.cloud_white_pixel += 1;
        } else if kinds.contains(&ContaminationType::Water) {
            breakdown.water += 1;
        } else if kinds.contains(&ContaminationType::BlackRegion) {
            breakdown.black_region += 1;
        }
    }
    breakdown
}
