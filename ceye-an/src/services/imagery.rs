//! Concurrent imagery fetch fan-out
//!
//! One analysis request needs six provider products: true-color, NDVI visual,
//! and raw NDVI, each for the current and historical intervals. They are
//! fetched concurrently and joined; the first failure fails the whole bundle
//! and drops the in-flight siblings, so a request never proceeds on partial
//! imagery.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use ceye_common::{BoundingBox, DateInterval};

use crate::error::ApiError;
use crate::services::date_ranges::DateRanges;
use crate::services::sentinel::{ImageryProvider, ProviderError};
use crate::types::{ImageryFrame, ProductKind};

/// All imagery one analysis request consumes
#[derive(Debug, Clone)]
pub struct ImageryBundle {
    pub current_true_color: ImageryFrame,
    pub current_ndvi_visual: ImageryFrame,
    pub historical_true_color: ImageryFrame,
    pub historical_ndvi_visual: ImageryFrame,
    pub current_ndvi_raw: ImageryFrame,
    pub historical_ndvi_raw: ImageryFrame,
}

/// Fetch a single tagged imagery frame.
pub async fn fetch_frame(
    provider: &dyn ImageryProvider,
    bbox: &BoundingBox,
    interval: DateInterval,
    product: ProductKind,
    token: &str,
) -> Result<ImageryFrame, ProviderError> {
    let bytes = provider.fetch_image(bbox, &interval, product, token).await?;
    Ok(ImageryFrame {
        kind: product,
        interval,
        bytes,
    })
}

/// Authenticate once, then fetch all six products concurrently.
pub async fn fetch_bundle(
    provider: &dyn ImageryProvider,
    bbox: &BoundingBox,
    ranges: &DateRanges,
) -> Result<ImageryBundle, ApiError> {
    let token = provider.authenticate().await.map_err(|e| match e {
        ProviderError::Auth { status, body } => {
            ApiError::Authentication(format!("{status}: {body}"))
        }
        other => ApiError::Authentication(other.to_string()),
    })?;

    let fetch = |interval: DateInterval, product: ProductKind| {
        fetch_frame(provider, bbox, interval, product, token.as_str())
    };

    let (
        current_true_color,
        current_ndvi_visual,
        historical_true_color,
        historical_ndvi_visual,
        current_ndvi_raw,
        historical_ndvi_raw,
    ) = tokio::try_join!(
        fetch(ranges.current, ProductKind::TrueColor),
        fetch(ranges.current, ProductKind::NdviVisual),
        fetch(ranges.historical, ProductKind::TrueColor),
        fetch(ranges.historical, ProductKind::NdviVisual),
        fetch(ranges.current, ProductKind::NdviRaw),
        fetch(ranges.historical, ProductKind::NdviRaw),
    )
    .map_err(ApiError::from)?;

    Ok(ImageryBundle {
        current_true_color,
        current_ndvi_visual,
        historical_true_color,
        historical_ndvi_visual,
        current_ndvi_raw,
        historical_ndvi_raw,
    })
}

/// Encode a rendered frame as a data URL for direct frontend consumption.
pub fn to_data_url(frame: &ImageryFrame) -> String {
    format!("data:{};base64,{}", frame.kind.format(), BASE64.encode(&frame.bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ceye_common::time::now;

    #[test]
    fn test_data_url_prefix_and_payload() {
        let frame = ImageryFrame {
            kind: ProductKind::TrueColor,
            interval: DateInterval::new(now(), now()),
            bytes: vec![1, 2, 3],
        };
        let url = to_data_url(&frame);
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(url.trim_start_matches("data:image/png;base64,"), "AQID");
    }
}
