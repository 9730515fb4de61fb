//! Sentinel Hub imagery provider client
//!
//! OAuth client-credentials token exchange plus the process API for rendered
//! and raw imagery products. Every product is a fixed evalscript recipe over
//! Sentinel-2 L2A bands; non-2xx provider responses surface verbatim with
//! status and body so failures are diagnosable from the request boundary.

use async_trait::async_trait;
use ceye_common::config::ServiceConfig;
use ceye_common::time::format_date;
use ceye_common::{BoundingBox, DateInterval};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::types::ProductKind;

/// Provider output raster dimensions (pixels)
pub const IMAGE_WIDTH: u32 = 512;
pub const IMAGE_HEIGHT: u32 = 512;

/// Scenes are mosaicked least-cloudy-first and capped at this cloud coverage
const MAX_CLOUD_COVERAGE: u32 = 30;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// True-color RGB composite with a linear stretch
const TRUE_COLOR_EVALSCRIPT: &str = r#"
//VERSION=3
function setup() {
  return {
    input: ["B04", "B03", "B02"],
    output: { bands: 3 }
  };
}
function linearStretch(value, min, max) {
    if (value < min) return 0;
    if (value > max) return 1;
    return (value - min) / (max - min);
}
function evaluatePixel(sample) {
  const min = 0.0;
  const max = 0.4;
  let r = linearStretch(sample.B04, min, max);
  let g = linearStretch(sample.B03, min, max);
  let b = linearStretch(sample.B02, min, max);
  return [r, g, b];
}
"#;

/// Raw NDVI data as a single FLOAT32 band, for analysis
const NDVI_DATA_EVALSCRIPT: &str = r#"
//VERSION=3
function setup() {
    return {
        input: ["B04", "B08"],
        output: { bands: 1, sampleType: "FLOAT32" }
    };
}
function evaluatePixel(sample) {
    // NDVI formula: (NIR - Red) / (NIR + Red)
    let ndvi = (sample.B08 - sample.B04) / (sample.B08 + sample.B04 + 1e-6);
    return [ndvi];
}
"#;

/// Visual NDVI image with a vegetation color ramp
const NDVI_VISUAL_EVALSCRIPT: &str = r#"
//VERSION=3
function setup() {
    return {
        input: ["B04", "B08"],
        output: { bands: 3 }
    };
}
const ramp = [
    [-1.0, 0x000000],
    [-0.3, 0x8B4513],
    [-0.1, 0xD2B48C],
    [0.0, 0xFFFF00],
    [0.2, 0xADFF2F],
    [0.4, 0x32CD32],
    [0.6, 0x228B22],
    [0.8, 0x006400],
    [1.0, 0x003000]
];
const visualizer = new ColorRampVisualizer(ramp);

function evaluatePixel(sample) {
    let ndvi = (sample.B08 - sample.B04) / (sample.B08 + sample.B04);
    return visualizer.process(ndvi);
}
"#;

impl ProductKind {
    /// Evalscript rendering recipe for this product
    fn evalscript(&self) -> &'static str {
        match self {
            ProductKind::TrueColor => TRUE_COLOR_EVALSCRIPT,
            ProductKind::NdviVisual => NDVI_VISUAL_EVALSCRIPT,
            ProductKind::NdviRaw => NDVI_DATA_EVALSCRIPT,
        }
    }

    /// Output encoding requested from the provider
    pub fn format(&self) -> &'static str {
        match self {
            ProductKind::TrueColor | ProductKind::NdviVisual => "image/png",
            ProductKind::NdviRaw => "image/tiff",
        }
    }

    /// Whether this product is a rendered image (vs a raw numeric grid)
    pub fn is_rendered(&self) -> bool {
        matches!(self, ProductKind::TrueColor | ProductKind::NdviVisual)
    }
}

/// Imagery provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error {status}: {body}")]
    Auth { status: u16, body: String },

    #[error("API error {status}: {body}")]
    Request { status: u16, body: String },
}

/// External imagery collaborator: credential exchange plus image retrieval.
///
/// Behind a trait so the analysis orchestrator holds `Arc<dyn ImageryProvider>`
/// and tests can substitute a call-counting double.
#[async_trait]
pub trait ImageryProvider: Send + Sync {
    /// Exchange credentials for a bearer token
    async fn authenticate(&self) -> Result<String, ProviderError>;

    /// Fetch one imagery product for a bbox and date interval
    async fn fetch_image(
        &self,
        bbox: &BoundingBox,
        interval: &DateInterval,
        product: ProductKind,
        token: &str,
    ) -> Result<Vec<u8>, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Sentinel Hub process API client
pub struct SentinelHubClient {
    http_client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl SentinelHubClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.provider_base_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }
}

#[async_trait]
impl ImageryProvider for SentinelHubClient {
    async fn authenticate(&self) -> Result<String, ProviderError> {
        let url = format!("{}/oauth/token", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        tracing::debug!("Obtained provider access token");
        Ok(token.access_token)
    }

    async fn fetch_image(
        &self,
        bbox: &BoundingBox,
        interval: &DateInterval,
        product: ProductKind,
        token: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let url = format!("{}/api/v1/process", self.base_url);

        let body = json!({
            "input": {
                "bounds": {
                    "bbox": bbox.to_array(),
                    "properties": { "crs": "http://www.opengis.net/def/crs/EPSG/0/4326" }
                },
                "data": [{
                    "type": "sentinel-2-l2a",
                    "dataFilter": {
                        "timeRange": {
                            "from": format!("{}T00:00:00Z", format_date(interval.start)),
                            "to": format!("{}T23:59:59Z", format_date(interval.end))
                        },
                        "mosaickingOrder": "leastCC",
                        "maxCloudCoverage": MAX_CLOUD_COVERAGE
                    }
                }]
            },
            "output": {
                "width": IMAGE_WIDTH,
                "height": IMAGE_HEIGHT,
                "responses": [{
                    "identifier": "default",
                    "format": { "type": product.format() }
                }]
            },
            "evalscript": product.evalscript(),
        });

        let accept = if product.is_rendered() {
            "image/png"
        } else {
            "application/octet-stream"
        };

        tracing::debug!(?product, range = %interval.label(), "Requesting imagery product");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, accept)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Request {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_formats() {
        assert_eq!(ProductKind::TrueColor.format(), "image/png");
        assert_eq!(ProductKind::NdviVisual.format(), "image/png");
        assert_eq!(ProductKind::NdviRaw.format(), "image/tiff");
        assert!(ProductKind::TrueColor.is_rendered());
        assert!(!ProductKind::NdviRaw.is_rendered());
    }

    #[test]
    fn test_evalscripts_request_expected_bands() {
        assert!(ProductKind::TrueColor.evalscript().contains("B02"));
        assert!(ProductKind::NdviRaw.evalscript().contains("FLOAT32"));
        assert!(ProductKind::NdviVisual.evalscript().contains("ColorRampVisualizer"));
    }
}
