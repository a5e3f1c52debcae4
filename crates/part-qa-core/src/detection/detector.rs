//! The defect detector: anomaly scoring, fusion and verdict in one call.

use tracing::debug;

use super::anomaly::AnomalyScorer;
use super::classify::classify;
use super::config::{BrightnessPenalty, DetectionConfig};
use super::features::{FeatureExtractor, FeatureVector};
use super::fusion::fuse;
use super::quality::{confidence, is_qualified, quality_score, round_to};
use crate::domain::{CapturedImage, DefectAssessment, Inspector};
use crate::error::InspectResult;

/// Rule-based defect detector for single part images.
///
/// Stateless between calls; one instance can inspect images from many
/// threads at once.
#[derive(Debug, Clone)]
pub struct DefectDetector {
    scorer: AnomalyScorer,
    extractor: FeatureExtractor,
    brightness: BrightnessPenalty,
    pass_threshold: f64,
}

impl DefectDetector {
    /// Creates a detector with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InspectError::InvalidConfig`] when the configuration
    /// cannot be run, for example edge thresholds with `low > high`.
    pub fn new(config: &DetectionConfig) -> InspectResult<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: &DetectionConfig) -> Self {
        Self {
            scorer: AnomalyScorer::new(config),
            extractor: FeatureExtractor::new(config.feature_edges),
            brightness: config.brightness,
            pass_threshold: config.pass_threshold,
        }
    }

    /// Computes the feature vector for an image.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InspectError::InvalidImage`] for zero-sized images.
    pub fn features(&self, image: &CapturedImage) -> InspectResult<FeatureVector> {
        image.validate()?;
        Ok(self.extractor.extract(&image.to_rgb8()))
    }

    /// Minimum quality score for a pass.
    #[must_use]
    pub const fn pass_threshold(&self) -> f64 {
        self.pass_threshold
    }
}

impl Default for DefectDetector {
    fn default() -> Self {
        Self::from_valid(&DetectionConfig::default())
    }
}

impl Inspector for DefectDetector {
    fn name(&self) -> &'static str {
        "defect"
    }

    fn inspect(&self, image: &CapturedImage) -> InspectResult<DefectAssessment> {
        image.validate()?;
        let rgb = image.to_rgb8();

        let (measurements, scores) = self.scorer.detect(&rgb);
        let penalty = self.brightness.for_mean(measurements.brightness_mean);
        let defect_score = fuse(&scores, penalty);

        // The verdict is taken on the unrounded quality; rounding is for output only.
        let quality = quality_score(defect_score);
        let qualified = is_qualified(quality, self.pass_threshold);
        let defect_type = classify(&scores, qualified);

        debug!(
            source = %image.source,
            fired = scores.len(),
            defect_score,
            quality,
            qualified,
            "inspected image"
        );

        Ok(DefectAssessment {
            qualified,
            quality_score: round_to(quality, 2),
            defect_score: round_to(defect_score, 3),
            defect_type,
            confidence: round_to(confidence(defect_score), 3),
            defect_details: scores,
        })
    }
}
