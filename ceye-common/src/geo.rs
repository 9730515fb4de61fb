//! Geographic primitives
//!
//! WGS84 bounding-box handling shared by the analysis pipeline and the
//! imagery provider client. Longitude before latitude throughout, matching
//! the provider's `[minLon, minLat, maxLon, maxLat]` convention.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Geographic rectangle in WGS84 degrees.
///
/// Invariant: `min_lon < max_lon` and `min_lat < max_lat`. Upstream input is
/// not trusted to satisfy this, so construction goes through
/// [`BoundingBox::from_request`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Validate and build a bounding box from a raw request array.
    ///
    /// Rejects anything that is not exactly four finite, correctly ordered
    /// coordinates. Ordering is checked here rather than downstream so a
    /// degenerate box never reaches the normalization arithmetic.
    pub fn from_request(raw: &[f64]) -> Result<Self> {
        if raw.len() != 4 {
            return Err(Error::InvalidInput(format!(
                "bbox must have exactly 4 elements, got {}",
                raw.len()
            )));
        }
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidInput(
                "bbox coordinates must be finite numbers".to_string(),
            ));
        }
        let bbox = Self {
            min_lon: raw[0],
            min_lat: raw[1],
            max_lon: raw[2],
            max_lat: raw[3],
        };
        if bbox.min_lon >= bbox.max_lon || bbox.min_lat >= bbox.max_lat {
            return Err(Error::InvalidInput(
                "bbox must be ordered as [minLon, minLat, maxLon, maxLat] with positive extent"
                    .to_string(),
            ));
        }
        Ok(bbox)
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Origin (lon, lat) of cell (i, j) in an `grid_size` × `grid_size`
    /// partition. `i` indexes longitude, `j` latitude.
    pub fn cell_origin(&self, i: usize, j: usize, grid_size: usize) -> (f64, f64) {
        let lon = self.min_lon + (i as f64 / grid_size as f64) * self.width();
        let lat = self.min_lat + (j as f64 / grid_size as f64) * self.height();
        (lon, lat)
    }

    /// Normalize a (lon, lat) point into [0, 1] relative to this box.
    ///
    /// Points outside the box map outside [0, 1]; callers decide how to
    /// treat that. Fails only if the arithmetic degenerates (a box that
    /// somehow bypassed construction-time validation).
    pub fn normalize(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let x = (lon - self.min_lon) / self.width();
        let y = (lat - self.min_lat) / self.height();
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::Internal(format!(
                "degenerate bbox produced non-finite normalized position for ({lon}, {lat})"
            )));
        }
        Ok((x, y))
    }

    /// Provider wire format: `[minLon, minLat, maxLon, maxLat]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }
}
