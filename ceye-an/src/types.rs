//! Wire and pipeline types for the deforestation analysis service
//!
//! Field names serialize in the camelCase / snake_case mix the dashboard
//! frontend already consumes, so renames here are load-bearing.

use ceye_common::DateInterval;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Request types
// ============================================================================

/// Body of `POST /analyze-deforestation`
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    /// Raw `[minLon, minLat, maxLon, maxLat]` array; validated at intake
    pub bbox: Vec<f64>,
    /// Comparison window selection
    pub comparison: ComparisonOption,
}

/// Comparison window selection, tagged the way the frontend sends it:
/// `{"type": "30days"}`, `{"type": "60days"}`, or
/// `{"type": "custom", "date": "YYYY-MM-DD"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComparisonOption {
    #[serde(rename = "30days")]
    Last30,
    #[serde(rename = "60days")]
    Last60,
    #[serde(rename = "custom")]
    Custom { date: NaiveDate },
}

impl ComparisonOption {
    /// Wire label echoed in alerts and the analysis summary
    pub fn label(&self) -> &'static str {
        match self {
            ComparisonOption::Last30 => "30days",
            ComparisonOption::Last60 => "60days",
            ComparisonOption::Custom { .. } => "custom",
        }
    }
}

// ============================================================================
// Imagery
// ============================================================================

/// Imagery product recipe requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    /// Rendered RGB composite (PNG)
    TrueColor,
    /// Rendered false-color vegetation-index visualization (PNG)
    NdviVisual,
    /// Raw single-band FLOAT32 vegetation-index grid (TIFF)
    NdviRaw,
}

/// Opaque imagery payload tagged with its product kind and date interval.
///
/// Produced once per request by the fetch fan-out, consumed read-only by the
/// analysis stages, and discarded after response assembly.
#[derive(Debug, Clone)]
pub struct ImageryFrame {
    pub kind: ProductKind,
    pub interval: DateInterval,
    pub bytes: Vec<u8>,
}

// ============================================================================
// Alerts
// ============================================================================

/// Geographic point of an alert
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

/// Alert severity. The grid analyzer currently only emits critical alerts;
/// moderate exists for the summary counts the frontend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Moderate,
}

/// Unfiltered candidate change-detection event at one grid cell.
/// Immutable once created by the grid analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAlert {
    pub position: Position,
    pub severity: Severity,
    /// Vegetation-index delta (historical → current), rounded to 3 decimals
    pub change: f64,
    pub comparison_type: String,
    /// Critical threshold that was in force when the alert was emitted
    pub threshold: f64,
}

// ============================================================================
// Contamination classification
// ============================================================================

/// Pixel condition that invalidates a change signal at a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContaminationType {
    None,
    CloudWhitePixel,
    Water,
    BlackRegion,
    OutOfBounds,
}

/// Raw classifier flags, kept for audit/debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelFlags {
    pub is_very_bright: bool,
    pub is_bright_white: bool,
    pub is_suspicious: bool,
    pub is_water: bool,
    pub is_black: bool,
}

/// Diagnostic record backing a contamination verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelDetails {
    /// Mean of the synthesized RGB channels, rounded to 1 decimal
    pub brightness: f64,
    /// min(R,G,B) / max(R,G,B), rounded to 2 decimals
    pub whiteness: f64,
    /// Synthesized channel estimates
    pub rgb: [u8; 3],
    pub flags: PixelFlags,
}

/// Classification of one pixel position in one reference frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContaminationVerdict {
    pub is_contaminated: bool,
    #[serde(rename = "type")]
    pub kind: ContaminationType,
    /// Absent for out-of-bounds positions (no pixel to diagnose)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<PixelDetails>,
}

/// Which reference frame(s) triggered an alert's filtering decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContaminationSource {
    BothImages,
    CurrentImage,
    HistoricalImage,
}

// ============================================================================
// Filter outputs
// ============================================================================

/// Alert suppressed by the contamination filter. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredAlert {
    #[serde(flatten)]
    pub alert: RawAlert,
    pub filtered_reason: &'static str,
    pub current_contamination: ContaminationType,
    pub historical_contamination: ContaminationType,
    pub contamination_source: ContaminationSource,
    pub details: FilteredDetails,
}

/// Per-frame diagnostic records for a filtered alert
#[derive(Debug, Clone, Serialize)]
pub struct FilteredDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<PixelDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical: Option<PixelDetails>,
}

/// Alert that passed contamination checks in both frames. Terminal output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidAlert {
    #[serde(flatten)]
    pub alert: RawAlert,
    pub validation_info: ValidationInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationInfo {
    pub current_check: ContaminationType,
    pub historical_check: ContaminationType,
    pub passed_contamination_check: bool,
}

/// Counters for one filtering pass
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteringStats {
    pub total_checked: usize,
    pub valid_after_filtering: usize,
    pub total_filtered: usize,
    pub filtering_applied: bool,
}

/// Filtered-alert counts by dominant contamination category
/// (cloud > water > black region, checked in that priority against either frame)
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteringBreakdown {
    pub cloud_white_pixel: usize,
    pub water: usize,
    pub black_region: usize,
}

// ============================================================================
// Response types
// ============================================================================

/// Rendered imagery pair for one period, as base64 data URLs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageryPairView {
    pub true_color: String,
    pub ndvi: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeRangeView {
    pub current: String,
    pub historical: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThresholdsView {
    pub critical: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteringView {
    pub enabled: bool,
    pub strict_contamination_filtering: bool,
    pub enhanced_water_detection: bool,
    pub enhanced_black_region_detection: bool,
    pub strict_cloud_white_pixel_filtering: bool,
    pub filtering_breakdown: FilteringBreakdown,
    pub filtered_alerts: Vec<FilteredAlert>,
    pub filtering_stats: FilteringStats,
}

/// Analysis summary block of the response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisView {
    pub total_alerts: usize,
    pub critical_alerts: usize,
    pub moderate_alerts: usize,
    pub raw_alerts_count: usize,
    pub total_filtered: usize,
    pub comparison_type: String,
    pub time_range: TimeRangeView,
    pub thresholds: ThresholdsView,
    pub filtering: FilteringView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_ago: Option<i64>,
}

/// Full result of one analysis request
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub current: ImageryPairView,
    pub historical: ImageryPairView,
    pub alerts: Vec<ValidAlert>,
    pub analysis: AnalysisView,
}
