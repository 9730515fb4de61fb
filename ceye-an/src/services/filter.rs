//! Alert contamination filtering
//!
//! Checks every raw alert against both true-color reference frames and drops
//! those where either frame looks contaminated. Strict by design: the filter
//! prefers losing a genuine alert over surfacing a cloud artifact. The
//! partition is exhaustive and order-preserving; every input alert lands in
//! exactly one of the two output lists.

use rand::rngs::StdRng;

use ceye_common::BoundingBox;

use crate::error::ApiError;
use crate::services::pixel::PixelClassifier;
use crate::types::{
    ContaminationSource, FilteredAlert, FilteredDetails, FilteringStats, ImageryFrame, RawAlert,
    ValidAlert, ValidationInfo,
};

/// Result of one filtering pass
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub valid: Vec<ValidAlert>,
    pub filtered: Vec<FilteredAlert>,
    pub stats: FilteringStats,
}

/// Partition alerts into valid and filtered against the two reference frames.
pub fn filter(
    classifier: &PixelClassifier,
    alerts: Vec<RawAlert>,
    current_true_color: &ImageryFrame,
    historical_true_color: &ImageryFrame,
    bbox: &BoundingBox,
    rng: &mut StdRng,
) -> Result<FilterOutcome, ApiError> {
    let total = alerts.len();
    let mut valid = Vec::new();
    let mut filtered = Vec::new();

    for alert in alerts {
        let (x_norm, y_norm) = bbox.normalize(alert.position.lon, alert.position.lat)?;

        let current = classifier.classify(current_true_color, x_norm, y_norm, rng);
        let historical = classifier.classify(historical_true_color, x_norm, y_norm, rng);

        // Contamination in EITHER frame suppresses the alert
        if current.is_contaminated || historical.is_contaminated {
            let source = match (current.is_contaminated, historical.is_contaminated) {
                (true, true) => ContaminationSource::BothImages,
                (true, false) => ContaminationSource::CurrentImage,
                (false, true) => ContaminationSource::HistoricalImage,
                (false, false) => unreachable!(),
            };
            filtered.push(FilteredAlert {
                alert,
                filtered_reason: "contamination_detected",
                current_contamination: current.kind,
                historical_contamination: historical.kind,
                contamination_source: source,
                details: FilteredDetails {
                    current: current.details,
                    historical: historical.details,
                },
            });
        } else {
            valid.push(ValidAlert {
                alert,
                validation_info: ValidationInfo {
                    current_check: current.kind,
                    historical_check: historical.kind,
                    passed_contamination_check: true,
                },
            });
        }
    }

    let stats = FilteringStats {
        total_checked: total,
        valid_after_filtering: valid.len(),
        total_filtered: filtered.len(),
        filtering_applied: true,
    };

    Ok(FilterOutcome {
        valid,
        filtered,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ComparisonOption, ContaminationType, Position, ProductKind, Severity};
    use ceye_common::time::now;
    use ceye_common::DateInterval;
    use rand::SeedableRng;

    fn bbox() -> BoundingBox {
        BoundingBox::from_request(&[-60.0, -10.0, -59.5, -9.5]).unwrap()
    }

    fn frame() -> ImageryFrame {
        ImageryFrame {
            kind: ProductKind::TrueColor,
            interval: DateInterval::new(now(), now()),
            bytes: vec![0u8; 16],
        }
    }

    fn alert_at(lat: f64, lon: f64) -> RawAlert {
        RawAlert {
            position: Position { lat, lon },
            severity: Severity::Critical,
            change: -0.5,
            comparison_type: ComparisonOption::Last30.label().to_string(),
            threshold: -0.40,
        }
    }

    #[test]
    fn test_partition_is_exhaustive_and_ordered() {
        let classifier = PixelClassifier::default();
        let mut rng = StdRng::seed_from_u64(11);
        let alerts: Vec<_> = (0..20)
            .map(|k| alert_at(-10.0 + k as f64 * 0.02, -60.0 + k as f64 * 0.02))
            .collect();
        let n = alerts.len();

        let outcome = filter(
            &classifier,
            alerts,
            &frame(),
            &frame(),
            &bbox(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(outcome.valid.len() + outcome.filtered.len(), n);
        assert_eq!(outcome.stats.total_checked, n);
        assert_eq!(outcome.stats.valid_after_filtering, outcome.valid.len());
        assert_eq!(outcome.stats.total_filtered, outcome.filtered.len());
        assert!(outcome.stats.filtering_applied);

        // order preserved within each partition: change values were distinct
        // positions, so check lat monotonicity
        for list in [
            outcome.valid.iter().map(|a| a.alert.position.lat).collect::<Vec<_>>(),
            outcome.filtered.iter().map(|a| a.alert.position.lat).collect::<Vec<_>>(),
        ] {
            assert!(list.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_out_of_bbox_alert_is_always_valid() {
        // A position far outside the bbox projects out of the frame in both
        // checks; out-of-bounds is not contamination, so the alert survives.
        let classifier = PixelClassifier::default();
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = filter(
            &classifier,
            vec![alert_at(-5.0, -50.0)],
            &frame(),
            &frame(),
            &bbox(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(outcome.valid.len(), 1);
        let info = &outcome.valid[0].validation_info;
        assert_eq!(info.current_check, ContaminationType::OutOfBounds);
        assert_eq!(info.historical_check, ContaminationType::OutOfBounds);
        assert!(info.passed_contamination_check);
    }

    #[test]
    fn test_corner_alert_filtered_from_both_frames() {
        // The far corner of the frame is deterministically cloud-bright.
        let classifier = PixelClassifier::default();
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = filter(
            &classifier,
            vec![alert_at(-9.5001, -59.5001)],
            &frame(),
            &frame(),
            &bbox(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(outcome.filtered.len(), 1);
        let filtered = &outcome.filtered[0];
        assert_eq!(filtered.contamination_source, ContaminationSource::BothImages);
        assert_eq!(
            filtered.current_contamination,
            ContaminationType::CloudWhitePixel
        );
        assert_eq!(
            filtered.historical_contamination,
            ContaminationType::CloudWhitePixel
        );
        assert_eq!(filtered.filtered_reason, "contamination_detected");
        assert!(filtered.details.current.is_some());
        assert!(filtered.details.historical.is_some());
    }

    #[test]
    fn test_provenance_matches_verdicts() {
        let classifier = PixelClassifier::default();
        let mut rng = StdRng::seed_from_u64(77);
        let alerts: Vec<_> = (0..625)
            .map(|k| {
                let i = k / 25;
                let j = k % 25;
                let (lon, lat) = bbox().cell_origin(i, j, 25);
                alert_at(lat, lon)
            })
            .collect();

        let outcome = filter(
            &classifier,
            alerts,
            &frame(),
            &frame(),
            &bbox(),
            &mut rng,
        )
        .unwrap();

        for filtered in &outcome.filtered {
            let current_hit = filtered.current_contamination != ContaminationType::None
                && filtered.current_contamination != ContaminationType::OutOfBounds;
            let historical_hit = filtered.historical_contamination != ContaminationType::None
                && filtered.historical_contamination != ContaminationType::OutOfBounds;
            let expected = match (current_hit, historical_hit) {
                (true, true) => ContaminationSource::BothImages,
                (true, false) => ContaminationSource::CurrentImage,
                (false, true) => ContaminationSource::HistoricalImage,
                (false, false) => panic!("filtered alert with no contaminated frame"),
            };
            assert_eq!(filtered.contamination_source, expected);
        }
        for valid in &outcome.valid {
            assert!(matches!(
                valid.validation_info.current_check,
                ContaminationType::None | ContaminationType::OutOfBounds
            ));
        }
    }
}
