//! Fixed-length feature vector for downstream analysis.
//!
//! The rule-based scorer does not read this vector; it is exported alongside
//! the assessment for anyone who wants to fit their own model on top.

use image::RgbImage;
use imageproc::edges::canny;
use serde::{Deserialize, Serialize};

use super::color::{to_gray, HsvPlanes};
use super::config::EdgeThresholds;
use super::stats::{grid_cells, Moments};

const HIST_BINS: usize = 50;
const HIST_KEPT: usize = 20;
const TEXTURE_GRID: u32 = 4;

/// Ordered image statistics, always [`FeatureVector::LEN`] values long.
///
/// Layout:
/// - `0..20` hue histogram (50 bins over `0..180`, first 20 kept)
/// - `20..40` saturation histogram (50 bins over `0..256`, first 20 kept)
/// - `40..60` value histogram (same binning)
/// - `60..92` 4x4 gray grid, mean then std per cell, row-major
/// - `92` edge density
/// - `93..95` gray mean and std
/// - `95..98` blue, green and red variance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Number of values in every feature vector.
    pub const LEN: usize = 3 * HIST_KEPT + 2 * (TEXTURE_GRID * TEXTURE_GRID) as usize + 1 + 2 + 3;

    /// The values in layout order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Consumes the vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the vector holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Computes [`FeatureVector`]s.
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor {
    edges: EdgeThresholds,
}

impl FeatureExtractor {
    /// Creates an extractor using `edges` for the edge density feature.
    #[must_use]
    pub const fn new(edges: EdgeThresholds) -> Self {
        Self { edges }
    }

    /// Extracts features from an RGB image.
    #[must_use]
    pub fn extract(&self, image: &RgbImage) -> FeatureVector {
        let mut out = Vec::with_capacity(FeatureVector::LEN);

        let hsv = HsvPlanes::from_rgb(image);
        out.extend(histogram_prefix(&hsv.hue, 180));
        out.extend(histogram_prefix(&hsv.saturation, 256));
        out.extend(histogram_prefix(&hsv.value, 256));

        let gray = to_gray(image);
        let (width, height) = gray.dimensions();
        let plane = gray.as_raw();
        for cell in grid_cells(width, height, TEXTURE_GRID, TEXTURE_GRID) {
            let m = Moments::from_values(cell.values(plane, width).map(f64::from));
            out.push(m.mean);
            out.push(m.std_dev());
        }

        out.push(edge_density(&canny(&gray, self.edges.low, self.edges.high)));

        let brightness = Moments::from_bytes(plane);
        out.push(brightness.mean);
        out.push(brightness.std_dev());

        // Blue, green, red.
        for channel in [2, 1, 0] {
            let m = Moments::from_values(image.pixels().map(|p| f64::from(p.0[channel])));
            out.push(m.variance);
        }

        debug_assert_eq!(out.len(), FeatureVector::LEN);
        FeatureVector(out)
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(EdgeThresholds {
            low: 50.0,
            high: 150.0,
        })
    }
}

/// Fraction of non-zero pixels in an edge map.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn edge_density(edges: &image::GrayImage) -> f64 {
    let total = edges.as_raw().len();
    if total == 0 {
        return 0.0;
    }
    let on = edges.as_raw().iter().filter(|&&v| v > 0).count();
    on as f64 / total as f64
}

/// Counts `values` into 50 equal bins over `0..range` and keeps the first 20.
#[allow(clippy::cast_precision_loss)]
fn histogram_prefix(values: &[u8], range: usize) -> Vec<f64> {
    let mut bins = [0u64; HIST_BINS];
    for &v in values {
        let bin = usize::from(v) * HIST_BINS / range;
        if let Some(slot) = bins.get_mut(bin) {
            *slot += 1;
        }
    }
    bins[..HIST_KEPT].iter().map(|&c| c as f64).collect()
}
