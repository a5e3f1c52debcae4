//! Assessment types produced by the defect detector.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A dimension of visual irregularity flagged by one detector.
///
/// Declaration order is the tie-break priority used when two kinds share the
/// highest score.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Hue variance over the whole image.
    ColorAnomaly,
    /// Spread of mean hue across a 3x3 region grid.
    ColorUniformity,
    /// Fraction of edge pixels.
    EdgeAnomaly,
    /// Global brightness standard deviation.
    BrightnessAnomaly,
    /// Mean local variance.
    TextureAnomaly,
    /// Number of external contours.
    ContourAnomaly,
    /// Perimeter-to-area complexity of the largest contour.
    ShapeComplexity,
    /// Concave or fragmented contours.
    ContourDiscontinuity,
}

impl AnomalyKind {
    /// Number of anomaly kinds.
    pub const COUNT: usize = 8;

    /// All kinds in priority order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::ColorAnomaly,
        Self::ColorUniformity,
        Self::EdgeAnomaly,
        Self::BrightnessAnomaly,
        Self::TextureAnomaly,
        Self::ContourAnomaly,
        Self::ShapeComplexity,
        Self::ContourDiscontinuity,
    ];

    /// Snake-case name used in JSON output and config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ColorAnomaly => "color_anomaly",
            Self::ColorUniformity => "color_uniformity",
            Self::EdgeAnomaly => "edge_anomaly",
            Self::BrightnessAnomaly => "brightness_anomaly",
            Self::TextureAnomaly => "texture_anomaly",
            Self::ContourAnomaly => "contour_anomaly",
            Self::ShapeComplexity => "shape_complexity",
            Self::ContourDiscontinuity => "contour_discontinuity",
        }
    }

    /// Looks a kind up by its snake-case name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores of the detectors that fired, keyed by kind.
///
/// A missing kind means that detector did not fire. Iteration follows
/// [`AnomalyKind`] declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnomalyScores(BTreeMap<AnomalyKind, f64>);

impl AnomalyScores {
    /// Creates an empty score set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a score for `kind`, replacing any previous one.
    pub fn insert(&mut self, kind: AnomalyKind, score: f64) {
        self.0.insert(kind, score);
    }

    /// Returns the score for `kind`, if that detector fired.
    #[must_use]
    pub fn get(&self, kind: AnomalyKind) -> Option<f64> {
        self.0.get(&kind).copied()
    }

    /// Returns whether `kind` fired.
    #[must_use]
    pub fn contains(&self, kind: AnomalyKind) -> bool {
        self.0.contains_key(&kind)
    }

    /// Number of detectors that fired.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no detector fired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(kind, score)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (AnomalyKind, f64)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }

    /// Highest-scoring kind; the earlier kind wins a tie.
    #[must_use]
    pub fn strongest(&self) -> Option<(AnomalyKind, f64)> {
        self.iter().fold(None, |best, (kind, score)| match best {
            Some((_, top)) if score <= top => best,
            _ => Some((kind, score)),
        })
    }

    /// Maximum score, or 0 when empty.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.0.values().copied().fold(0.0, f64::max)
    }

    /// Arithmetic mean of the scores, or 0 when empty.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.values().sum::<f64>() / self.0.len() as f64
    }
}

impl FromIterator<(AnomalyKind, f64)> for AnomalyScores {
    fn from_iter<I: IntoIterator<Item = (AnomalyKind, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Human-readable defect category.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefectType {
    /// Unusual hue spread (stains, discoloration).
    #[serde(rename = "color anomaly")]
    Color,
    /// Patchy or inconsistent coloring across regions.
    #[serde(rename = "color-distribution anomaly")]
    ColorDistribution,
    /// Excess edges (scratches, cracks).
    #[serde(rename = "edge defect")]
    Edge,
    /// Shadows or glare.
    #[serde(rename = "brightness anomaly")]
    Brightness,
    /// Irregular surface texture.
    #[serde(rename = "texture anomaly")]
    Texture,
    /// Too many separate contours.
    #[serde(rename = "contour anomaly")]
    Contour,
    /// Unusually complex outline.
    #[serde(rename = "shape anomaly")]
    Shape,
    /// Broken or concave outline, possibly an occluded part.
    #[serde(rename = "discontinuous contour (possible occlusion)")]
    DiscontinuousContour,
    /// Three or more detectors fired together.
    #[serde(rename = "multi-indicator appearance anomaly")]
    MultiIndicator,
}

impl DefectType {
    /// Category reported when `kind` is the strongest single anomaly.
    #[must_use]
    pub const fn for_kind(kind: AnomalyKind) -> Self {
        match kind {
            AnomalyKind::ColorAnomaly => Self::Color,
            AnomalyKind::ColorUniformity => Self::ColorDistribution,
            AnomalyKind::EdgeAnomaly => Self::Edge,
            AnomalyKind::BrightnessAnomaly => Self::Brightness,
            AnomalyKind::TextureAnomaly => Self::Texture,
            AnomalyKind::ContourAnomaly => Self::Contour,
            AnomalyKind::ShapeComplexity => Self::Shape,
            AnomalyKind::ContourDiscontinuity => Self::DiscontinuousContour,
        }
    }

    /// The label written to JSON and history records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Color => "color anomaly",
            Self::ColorDistribution => "color-distribution anomaly",
            Self::Edge => "edge defect",
            Self::Brightness => "brightness anomaly",
            Self::Texture => "texture anomaly",
            Self::Contour => "contour anomaly",
            Self::Shape => "shape anomaly",
            Self::DiscontinuousContour => "discontinuous contour (possible occlusion)",
            Self::MultiIndicator => "multi-indicator appearance anomaly",
        }
    }
}

impl fmt::Display for DefectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final verdict for one inspected image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectAssessment {
    /// Whether the part passes inspection.
    ///
    /// Decided on the unrounded quality score, before `quality_score` is
    /// rounded. A part just under the pass threshold can therefore report
    /// `quality_score: 60.0` and still fail: one saturated detector gives a
    /// defect score of 0.55 and an unrounded quality of 59.99999999999999.
    pub qualified: bool,
    /// Quality score from 0 (severe) to 100 (clean), rounded to 2 decimals
    /// for output only. Compare against `qualified`, not this value, to learn
    /// the verdict.
    pub quality_score: f64,
    /// Fused defect score from 0 to 1, rounded to 3 decimals.
    pub defect_score: f64,
    /// Defect category; absent for qualified parts.
    pub defect_type: Option<DefectType>,
    /// Scores of the detectors that fired.
    pub defect_details: AnomalyScores,
    /// Confidence in the verdict from 0.1 to 0.95, rounded to 3 decimals.
    pub confidence: f64,
}

impl DefectAssessment {
    /// "Passed" or "Failed", as stored in inspection history.
    #[must_use]
    pub const fn verdict(&self) -> &'static str {
        if self.qualified {
            "Passed"
        } else {
            "Failed"
        }
    }
}
