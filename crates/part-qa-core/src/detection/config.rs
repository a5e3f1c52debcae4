//! Tuning constants for the defect detector.
//!
//! Every threshold the detectors compare against lives here, so the rule set
//! can be audited and adjusted without touching control flow.

use crate::domain::AnomalyKind;
use crate::error::{InspectError, InspectResult};

/// Firing threshold and normalization span for one detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleThreshold {
    /// Raw statistic must exceed this for the detector to fire.
    pub threshold: f64,
    /// Excess over the threshold that maps to a score of 1.0.
    pub span: f64,
}

impl RuleThreshold {
    /// Creates a rule.
    #[must_use]
    pub const fn new(threshold: f64, span: f64) -> Self {
        Self { threshold, span }
    }

    /// Score for a raw statistic, or `None` if the rule does not fire.
    ///
    /// A NaN statistic never fires.
    #[must_use]
    pub fn score(&self, raw: f64) -> Option<f64> {
        (raw > self.threshold).then(|| ((raw - self.threshold) / self.span).min(1.0))
    }
}

/// One [`RuleThreshold`] per [`AnomalyKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    rules: [RuleThreshold; AnomalyKind::COUNT],
}

impl RuleTable {
    /// Returns the rule for `kind`.
    #[must_use]
    pub const fn get(&self, kind: AnomalyKind) -> RuleThreshold {
        self.rules[kind as usize]
    }

    /// Replaces the rule for `kind`.
    pub fn set(&mut self, kind: AnomalyKind, rule: RuleThreshold) {
        self.rules[kind as usize] = rule;
    }

    /// Iterates `(kind, rule)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (AnomalyKind, RuleThreshold)> + '_ {
        AnomalyKind::ALL.into_iter().map(|k| (k, self.get(k)))
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        // Indexed by AnomalyKind declaration order.
        Self {
            rules: [
                RuleThreshold::new(8000.0, 5000.0), // color_anomaly: hue variance
                RuleThreshold::new(35.0, 40.0),     // color_uniformity: std of region hues
                RuleThreshold::new(0.5, 0.3),       // edge_anomaly: edge pixel fraction
                RuleThreshold::new(100.0, 80.0),    // brightness_anomaly: gray std
                RuleThreshold::new(1500.0, 1000.0), // texture_anomaly: mean local variance
                RuleThreshold::new(50.0, 30.0),     // contour_anomaly: external contours
                RuleThreshold::new(45.0, 35.0),     // shape_complexity: perimeter / sqrt(area)
                RuleThreshold::new(0.3, 0.4),       // contour_discontinuity
            ],
        }
    }
}

/// Canny hysteresis thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeThresholds {
    /// Weak-edge threshold.
    pub low: f32,
    /// Strong-edge threshold.
    pub high: f32,
}

impl EdgeThresholds {
    /// Checks that both thresholds are finite, non-negative and ordered.
    ///
    /// Canny's hysteresis step asserts `low <= high`, so an unordered pair
    /// must be refused before an edge map is computed.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::InvalidConfig`] naming the offending pair.
    pub fn validate(&self, name: &str) -> InspectResult<()> {
        let Self { low, high } = *self;
        if !(low.is_finite() && high.is_finite()) || low < 0.0 {
            return Err(InspectError::invalid_config(format!(
                "{name} thresholds must be finite and non-negative (low {low}, high {high})"
            )));
        }
        if low > high {
            return Err(InspectError::invalid_config(format!(
                "{name} low threshold ({low}) exceeds high threshold ({high})"
            )));
        }
        Ok(())
    }
}

/// Contour geometry limits used by the shape detectors.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourConfig {
    /// Largest contour must exceed this area for shape complexity.
    pub min_shape_area: f64,
    /// Number of largest contours examined for solidity and area share.
    pub main_contours: usize,
    /// Contours must exceed this area for the solidity check.
    pub min_solidity_area: f64,
    /// Solidity below this counts as discontinuous.
    pub solidity_floor: f64,
    /// Area share check runs only with more contours than this.
    pub fragment_min_contours: usize,
    /// Main-contour area share below this counts as fragmented.
    pub main_area_floor: f64,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            min_shape_area: 100.0,
            main_contours: 3,
            min_solidity_area: 500.0,
            solidity_floor: 0.7,
            fragment_min_contours: 5,
            main_area_floor: 0.6,
        }
    }
}

/// Global brightness limits outside which a flat penalty is added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessPenalty {
    /// Mean gray below this is too dark.
    pub dark_below: f64,
    /// Mean gray above this is overexposed.
    pub bright_above: f64,
    /// Amount added to the fused defect score.
    pub penalty: f64,
}

impl BrightnessPenalty {
    /// Penalty for an image with the given mean gray level.
    #[must_use]
    pub fn for_mean(&self, mean: f64) -> f64 {
        if mean < self.dark_below || mean > self.bright_above {
            self.penalty
        } else {
            0.0
        }
    }
}

impl Default for BrightnessPenalty {
    fn default() -> Self {
        Self {
            dark_below: 30.0,
            bright_above: 220.0,
            penalty: 0.1,
        }
    }
}

/// Full detector configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Per-kind firing thresholds.
    pub rules: RuleTable,
    /// Canny thresholds for the anomaly edge map (high, to ignore normal texture).
    pub anomaly_edges: EdgeThresholds,
    /// Canny thresholds for the feature vector's edge density.
    pub feature_edges: EdgeThresholds,
    /// Side of the square box filter used for local variance.
    pub texture_kernel: u32,
    /// Rows and columns of the hue uniformity grid.
    pub uniformity_grid: u32,
    /// Contour geometry limits.
    pub contours: ContourConfig,
    /// Global brightness penalty.
    pub brightness: BrightnessPenalty,
    /// Minimum quality score for a part to pass.
    pub pass_threshold: f64,
}

impl DetectionConfig {
    /// Checks the values the detectors cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::InvalidConfig`] for unordered edge thresholds
    /// or a zero-sized texture kernel or uniformity grid.
    pub fn validate(&self) -> InspectResult<()> {
        self.anomaly_edges.validate("anomaly edge")?;
        self.feature_edges.validate("feature edge")?;
        if self.texture_kernel == 0 {
            return Err(InspectError::invalid_config("texture kernel must be at least 1"));
        }
        if self.uniformity_grid == 0 {
            return Err(InspectError::invalid_config("uniformity grid must be at least 1"));
        }
        Ok(())
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            rules: RuleTable::default(),
            anomaly_edges: EdgeThresholds {
                low: 80.0,
                high: 200.0,
            },
            feature_edges: EdgeThresholds {
                low: 50.0,
                high: 150.0,
            },
            texture_kernel: 15,
            uniformity_grid: 3,
            contours: ContourConfig::default(),
            brightness: BrightnessPenalty::default(),
            pass_threshold: 60.0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = RuleTable::default();
        assert_eq!(
            rules.get(AnomalyKind::ColorAnomaly),
            RuleThreshold::new(8000.0, 5000.0)
        );
        assert_eq!(
            rules.get(AnomalyKind::ContourDiscontinuity),
            RuleThreshold::new(0.3, 0.4)
        );
        assert_eq!(rules.iter().count(), 8);
    }

    #[test]
    fn test_rule_fires_only_above_threshold() {
        let rule = RuleThreshold::new(100.0, 80.0);
        assert_eq!(rule.score(100.0), None);
        assert_eq!(rule.score(50.0), None);
        assert!((rule.score(140.0).unwrap() - 0.5).abs() < 1e-12);
        assert!((rule.score(1e6).unwrap() - 1.0).abs() < f64::EPSILON);
        assert_eq!(rule.score(f64::NAN), None);
    }

    #[test]
    fn test_rule_score_monotonic() {
        let rule = RuleTable::default().get(AnomalyKind::ColorAnomaly);
        let mut last = 0.0;
        for step in 0..200 {
            let raw = 8000.0 + f64::from(step) * 50.0;
            let score = rule.score(raw).unwrap_or(0.0);
            assert!(score >= last, "score dropped at raw={raw}");
            assert!((0.0..=1.0).contains(&score));
            last = score;
        }
    }

    #[test]
    fn test_set_rule() {
        let mut rules = RuleTable::default();
        rules.set(AnomalyKind::EdgeAnomaly, RuleThreshold::new(0.4, 0.2));
        assert_eq!(
            rules.get(AnomalyKind::EdgeAnomaly),
            RuleThreshold::new(0.4, 0.2)
        );
        assert_eq!(
            rules.get(AnomalyKind::ColorUniformity),
            RuleThreshold::new(35.0, 40.0)
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(DetectionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_unordered_edge_thresholds_rejected() {
        let mut config = DetectionConfig::default();
        config.anomaly_edges.low = 250.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, InspectError::InvalidConfig(_)));
        assert!(err.to_string().contains("anomaly edge"));

        let mut config = DetectionConfig::default();
        config.feature_edges = EdgeThresholds {
            low: 150.0,
            high: 50.0,
        };
        assert!(config.validate().is_err());

        let equal = EdgeThresholds {
            low: 100.0,
            high: 100.0,
        };
        assert!(equal.validate("equal").is_ok());
    }

    #[test]
    fn test_non_finite_edge_thresholds_rejected() {
        let nan = EdgeThresholds {
            low: f32::NAN,
            high: 200.0,
        };
        assert!(nan.validate("nan").is_err());
        let negative = EdgeThresholds {
            low: -1.0,
            high: 200.0,
        };
        assert!(negative.validate("negative").is_err());
    }

    #[test]
    fn test_zero_kernel_rejected() {
        let config = DetectionConfig {
            texture_kernel: 0,
            ..DetectionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_brightness_penalty() {
        let penalty = BrightnessPenalty::default();
        assert!((penalty.for_mean(29.9) - 0.1).abs() < f64::EPSILON);
        assert!(penalty.for_mean(30.0).abs() < f64::EPSILON);
        assert!(penalty.for_mean(128.0).abs() < f64::EPSILON);
        assert!(penalty.for_mean(220.0).abs() < f64::EPSILON);
        assert!((penalty.for_mean(220.5) - 0.1).abs() < f64::EPSILON);
    }
}
