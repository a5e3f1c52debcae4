//! Core domain types for part inspection.

mod assessment;
mod image;
mod inspector;
mod report;

pub use assessment::{AnomalyKind, AnomalyScores, DefectAssessment, DefectType};
pub use image::{CapturedImage, ImageDimensions};
pub use inspector::Inspector;
pub use report::{HistoryStats, InspectionRecord, InspectionReport};
