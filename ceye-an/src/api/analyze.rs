//! Deforestation analysis endpoint

use axum::{extract::State, Json};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::services::analysis;
use crate::types::{AnalyzeRequest, AnalysisResponse};
use crate::AppState;

/// POST /analyze-deforestation
///
/// The body is decoded by hand from a JSON value so that a missing or
/// malformed `comparison` option surfaces as the same validation failure as
/// a bad bbox, rather than an extractor rejection.
pub async fn analyze_deforestation(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<AnalysisResponse>> {
    let request: AnalyzeRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::Validation(format!("invalid request body: {e}")))?;

    let response = analysis::run(
        state.provider.as_ref(),
        state.config.rng_seed,
        &request.bbox,
        &request.comparison,
    )
    .await?;

    Ok(Json(response))
}
