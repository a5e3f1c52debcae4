//! Defect detection pipeline.
//!
//! [`DefectDetector`] ties the stages together: [`AnomalyScorer`] measures
//! the image and applies the rule table, [`fuse`] combines the fired scores,
//! and the quality and confidence curves turn the result into a verdict.
//! [`FeatureExtractor`] runs separately and is not consulted by the rules.

mod anomaly;
mod classify;
pub mod color;
mod config;
pub mod contours;
mod detector;
mod features;
mod fusion;
mod quality;
pub mod stats;

pub use anomaly::{AnomalyScorer, ImageMeasurements};
pub use classify::classify;
pub use config::{
    BrightnessPenalty, ContourConfig, DetectionConfig, EdgeThresholds, RuleTable, RuleThreshold,
};
pub use detector::DefectDetector;
pub use features::{FeatureExtractor, FeatureVector};
pub use fusion::fuse;
pub use quality::{confidence, is_qualified, quality_score, round_to};
