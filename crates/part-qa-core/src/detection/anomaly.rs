//! Rule-based anomaly detectors.

use image::RgbImage;
use imageproc::edges::canny;
use tracing::debug;

use super::color::{to_gray, HsvPlanes};
use super::config::{ContourConfig, DetectionConfig, EdgeThresholds, RuleTable};
use super::contours::ContourSet;
use super::features::edge_density;
use super::stats::{grid_cells, mean_local_variance, Moments};
use crate::domain::{AnomalyKind, AnomalyScores};

/// Raw statistics the detectors compare against their thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMeasurements {
    /// Variance of the hue plane.
    pub hue_variance: f64,
    /// Standard deviation of the regional mean hues.
    pub hue_uniformity: f64,
    /// Fraction of pixels on the anomaly edge map.
    pub edge_density: f64,
    /// Mean gray level.
    pub brightness_mean: f64,
    /// Standard deviation of the gray level.
    pub brightness_std: f64,
    /// Mean local variance of the gray plane.
    pub texture_variance: f64,
    /// Number of external contours on the edge map.
    pub contour_count: usize,
    /// Complexity of the largest contour, when it is large enough to measure.
    pub shape_complexity: Option<f64>,
    /// Combined concavity and fragmentation signal of the main contours.
    pub discontinuity: f64,
}

impl ImageMeasurements {
    /// The statistic compared against `kind`'s rule, if there is one.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn raw(&self, kind: AnomalyKind) -> Option<f64> {
        match kind {
            AnomalyKind::ColorAnomaly => Some(self.hue_variance),
            AnomalyKind::ColorUniformity => Some(self.hue_uniformity),
            AnomalyKind::EdgeAnomaly => Some(self.edge_density),
            AnomalyKind::BrightnessAnomaly => Some(self.brightness_std),
            AnomalyKind::TextureAnomaly => Some(self.texture_variance),
            AnomalyKind::ContourAnomaly => Some(self.contour_count as f64),
            AnomalyKind::ShapeComplexity => self.shape_complexity,
            AnomalyKind::ContourDiscontinuity => Some(self.discontinuity),
        }
    }
}

/// Runs the detector battery over an image.
#[derive(Debug, Clone)]
pub struct AnomalyScorer {
    rules: RuleTable,
    edges: EdgeThresholds,
    texture_kernel: u32,
    uniformity_grid: u32,
    contours: ContourConfig,
}

impl AnomalyScorer {
    /// Creates a scorer from the detection settings.
    ///
    /// The settings are expected to have passed [`DetectionConfig::validate`];
    /// [`super::DefectDetector::new`] checks this before building a scorer.
    #[must_use]
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            rules: config.rules.clone(),
            edges: config.anomaly_edges,
            texture_kernel: config.texture_kernel,
            uniformity_grid: config.uniformity_grid,
            contours: config.contours.clone(),
        }
    }

    /// Measures an image and scores it in one step.
    #[must_use]
    pub fn detect(&self, image: &RgbImage) -> (ImageMeasurements, AnomalyScores) {
        let measurements = self.measure(image);
        let scores = self.score(&measurements);
        (measurements, scores)
    }

    /// Derives every raw statistic the rules need.
    #[must_use]
    pub fn measure(&self, image: &RgbImage) -> ImageMeasurements {
        let (width, height) = image.dimensions();

        let hsv = HsvPlanes::from_rgb(image);
        let hue_variance = Moments::from_bytes(&hsv.hue).variance;
        let regional_hues = grid_cells(width, height, self.uniformity_grid, self.uniformity_grid)
            .into_iter()
            .map(|cell| Moments::from_values(cell.values(&hsv.hue, width).map(f64::from)).mean);
        let hue_uniformity = Moments::from_values(regional_hues).std_dev();

        let gray = to_gray(image);
        let brightness = Moments::from_bytes(gray.as_raw());
        let texture_variance = mean_local_variance(
            gray.as_raw(),
            width as usize,
            height as usize,
            self.texture_kernel as usize,
        );

        let edges = canny(&gray, self.edges.low, self.edges.high);
        let contours = ContourSet::from_edges(&edges);

        let measurements = ImageMeasurements {
            hue_variance,
            hue_uniformity,
            edge_density: edge_density(&edges),
            brightness_mean: brightness.mean,
            brightness_std: brightness.std_dev(),
            texture_variance,
            contour_count: contours.len(),
            shape_complexity: self.shape_complexity(&contours),
            discontinuity: self.discontinuity(&contours),
        };
        debug!(?measurements, "measured image");
        measurements
    }

    /// Applies the rule table; only detectors that fire appear in the result.
    #[must_use]
    pub fn score(&self, measurements: &ImageMeasurements) -> AnomalyScores {
        self.rules
            .iter()
            .filter_map(|(kind, rule)| {
                let raw = measurements.raw(kind)?;
                let score = rule.score(raw)?;
                debug!(%kind, raw, score, "detector fired");
                Some((kind, score))
            })
            .collect()
    }

    fn shape_complexity(&self, contours: &ContourSet) -> Option<f64> {
        contours
            .largest()
            .filter(|shape| shape.area > self.contours.min_shape_area)
            .and_then(|shape| shape.complexity())
    }

    #[allow(clippy::cast_precision_loss)]
    fn discontinuity(&self, contours: &ContourSet) -> f64 {
        let limits = &self.contours;
        let main = contours.largest_n(limits.main_contours);

        let concavity = main
            .iter()
            .filter(|shape| shape.area > limits.min_solidity_area)
            .filter_map(|shape| shape.solidity())
            .filter(|&solidity| solidity < limits.solidity_floor)
            .map(|solidity| 1.0 - solidity)
            .fold(0.0, f64::max);

        let total = contours.total_area();
        let fragmentation = if contours.len() > limits.fragment_min_contours && total > 0.0 {
            let ratio = main.iter().map(|s| s.area).sum::<f64>() / total;
            if ratio < limits.main_area_floor {
                1.0 - ratio
            } else {
                0.0
            }
        } else {
            0.0
        };

        concavity.max(fragmentation)
    }
}

impl Default for AnomalyScorer {
    fn default() -> Self {
        Self::new(&DetectionConfig::default())
    }
}
