//! Pixel contamination classifier
//!
//! Decides whether a normalized position inside a true-color frame looks
//! contaminated by cloud, water, or shadow. Checks run as a priority cascade:
//! cloud family first, then water, then dark regions.
//!
//! The channel estimates are synthesized from pixel position plus an injected
//! random stream rather than decoded from the frame bytes; the frame argument
//! is kept in the signature so real decoding can slot in without touching
//! call sites.
//! TODO: decode the provider PNG (image crate) and derive the channel values
//! from actual pixels instead of the positional model.

use rand::rngs::StdRng;
use rand::Rng;

use crate::services::sentinel::{IMAGE_HEIGHT, IMAGE_WIDTH};
use crate::types::{ContaminationType, ContaminationVerdict, ImageryFrame, PixelDetails, PixelFlags};

// Cloud family thresholds, brightness on a 0-255 scale
const VERY_BRIGHT_CLOUD_BRIGHTNESS: f64 = 140.0;
const BRIGHT_WHITE_BRIGHTNESS: f64 = 120.0;
const BRIGHT_WHITE_WHITENESS: f64 = 0.55;
const SOFT_WHITE_BRIGHTNESS: f64 = 110.0;
const SOFT_WHITE_WHITENESS: f64 = 0.50;
const HAZE_BRIGHTNESS: f64 = 100.0;
const HAZE_WHITENESS: f64 = 0.45;
const SUSPICIOUS_BRIGHTNESS_FLOOR: f64 = 90.0;

// Water and dark-region parameters
const DARK_PIXEL_FLOOR: f64 = 70.0;
const WATER_LIKELIHOOD_FLOOR: f64 = 0.15;
const WATER_LIKELIHOOD_BASE: f64 = 0.9;
const WATER_EDGE_FALLOFF: f64 = 1.5;
const BLUE_OVER_RED_MARGIN: f64 = 20.0;
const BLUE_OVER_GREEN_MARGIN: f64 = 15.0;
const BLUE_WATER_LIKELIHOOD_SCALE: f64 = 0.4;
const BLACK_WATER_LIKELIHOOD_SCALE: f64 = 0.5;
const BLACK_NON_WATER_LIKELIHOOD: f64 = 0.25;
const CLOUD_SHADOW_LIKELIHOOD: f64 = 0.35;

/// Classifies pixel positions against a frame of known dimensions
#[derive(Debug, Clone, Copy)]
pub struct PixelClassifier {
    pub width: u32,
    pub height: u32,
}

impl Default for PixelClassifier {
    fn default() -> Self {
        Self {
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
        }
    }
}

impl PixelClassifier {
    /// Classify the pixel at a normalized (x, y) position.
    ///
    /// `x_norm`/`y_norm` are conceptually in [0, 1] but not guaranteed to be;
    /// positions that project outside the frame return an `out_of_bounds`
    /// verdict (not contaminated) with no diagnostics.
    pub fn classify(
        &self,
        _frame: &ImageryFrame,
        x_norm: f64,
        y_norm: f64,
        rng: &mut StdRng,
    ) -> ContaminationVerdict {
        let pixel_x = (x_norm * self.width as f64).floor() as i64;
        let pixel_y = (y_norm * self.height as f64).floor() as i64;
        let (w, h) = (self.width as i64, self.height as i64);

        if pixel_x < 0 || pixel_x >= w || pixel_y < 0 || pixel_y >= h {
            return ContaminationVerdict {
                is_contaminated: false,
                kind: ContaminationType::OutOfBounds,
                details: None,
            };
        }

        // Synthesized channel estimates keyed by position, green-biased to
        // mimic vegetated scenes
        let base_variation = rng.gen::<f64>() * 0.3;
        let position_factor = (pixel_x + pixel_y) as f64 / (w + h) as f64;

        let r = channel(80.0 + base_variation * 100.0 + position_factor * 50.0);
        let g = channel(90.0 + base_variation * 120.0 + position_factor * 60.0);
        let b = channel(60.0 + base_variation * 80.0 + position_factor * 40.0);

        let (rf, gf, bf) = (r as f64, g as f64, b as f64);
        let brightness = (rf + gf + bf) / 3.0;
        let whiteness = rf.min(gf).min(bf) / rf.max(gf).max(bf);

        // Cloud family
        let is_very_bright_cloud = brightness > VERY_BRIGHT_CLOUD_BRIGHTNESS;
        let is_bright_white_cloud =
            brightness > BRIGHT_WHITE_BRIGHTNESS && whiteness > BRIGHT_WHITE_WHITENESS;
        let is_soft_white_cloud =
            brightness > SOFT_WHITE_BRIGHTNESS && whiteness > SOFT_WHITE_WHITENESS;
        let is_haze_cloud = brightness > HAZE_BRIGHTNESS && whiteness > HAZE_WHITENESS;
        let is_suspicious_bright = brightness > SUSPICIOUS_BRIGHTNESS_FLOOR;

        // Water likelihood rises toward the frame interior
        let edge_distance = pixel_x
            .min(w - pixel_x)
            .min(pixel_y.min(h - pixel_y)) as f64
            / w.min(h) as f64;
        let water_likelihood =
            WATER_LIKELIHOOD_FLOOR.max(WATER_LIKELIHOOD_BASE - edge_distance * WATER_EDGE_FALLOFF);

        let is_blue_water = bf > rf + BLUE_OVER_RED_MARGIN
            && bf > gf + BLUE_OVER_GREEN_MARGIN
            && rng.gen::<f64>() < water_likelihood * BLUE_WATER_LIKELIHOOD_SCALE;

        let is_dark_pixel = brightness < DARK_PIXEL_FLOOR;
        let is_black_water =
            is_dark_pixel && rng.gen::<f64>() < water_likelihood * BLACK_WATER_LIKELIHOOD_SCALE;
        let is_black_non_water = is_dark_pixel && rng.gen::<f64>() < BLACK_NON_WATER_LIKELIHOOD;
        let is_cloud_shadow = is_dark_pixel && rng.gen::<f64>() < CLOUD_SHADOW_LIKELIHOOD;

        // Priority cascade: cloud > water > dark regions
        let kind = if is_very_bright_cloud
            || is_bright_white_cloud
            || is_soft_white_cloud
            || is_haze_cloud
            || is_suspicious_bright
        {
            ContaminationType::CloudWhitePixel
        } else if is_blue_water || is_black_water {
            ContaminationType::Water
        } else if is_black_non_water || is_cloud_shadow {
            ContaminationType::BlackRegion
        } else {
            ContaminationType::None
        };

        ContaminationVerdict {
            is_contaminated: kind != ContaminationType::None,
            kind,
            details: Some(PixelDetails {
                brightness: round_to(brightness, 1),
                whiteness: round_to(whiteness, 2),
                rgb: [r, g, b],
                flags: PixelFlags {
                    is_very_bright: is_very_bright_cloud,
                    is_bright_white: is_bright_white_cloud,
                    is_suspicious: is_suspicious_bright,
                    is_water: is_blue_water || is_black_water,
                    is_black: is_dark_pixel,
                },
            }),
        }
    }
}

fn channel(value: f64) -> u8 {
    value.floor().clamp(0.0, 255.0) as u8
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
