//! Per-image report and history record types.

use serde::{Deserialize, Serialize};

use super::{DefectAssessment, ImageDimensions};

/// Everything emitted for one inspected image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionReport {
    /// Path or label of the inspected image.
    pub path: String,
    /// Timestamp of inspection (RFC 3339).
    pub timestamp: String,
    /// Image dimensions.
    pub dimensions: ImageDimensions,
    /// The verdict.
    pub assessment: DefectAssessment,
    /// Raw feature vector, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<f64>>,
}

/// One persisted inspection, as kept by a record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    /// Store-assigned identifier, increasing from 1.
    pub id: u64,
    /// Time the record was written (RFC 3339).
    pub timestamp: String,
    /// "Passed" or "Failed".
    pub result: String,
    /// Verdict confidence.
    pub confidence: f64,
    /// Where the inspected image is stored, if anywhere.
    pub image_path: Option<String>,
    /// Defect category label, if any.
    pub defect_type: Option<String>,
    /// Quality score.
    pub quality_score: f64,
}

impl InspectionRecord {
    /// Returns whether this record is a pass.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.result == "Passed"
    }
}

/// Aggregate figures over the inspection history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Number of records.
    pub total: u64,
    /// Records that passed.
    pub passed: u64,
    /// Records that failed.
    pub failed: u64,
    /// Percentage of passes, 0 when there are no records.
    pub pass_rate: f64,
    /// Mean quality score rounded to 2 decimals, 0 when there are no records.
    pub avg_score: f64,
}

impl HistoryStats {
    /// Computes statistics over a set of records.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_records(records: &[InspectionRecord]) -> Self {
        let total = records.len() as u64;
        if total == 0 {
            return Self::default();
        }
        let passed = records.iter().filter(|r| r.passed()).count() as u64;
        let failed = total - passed;
        let avg = records.iter().map(|r| r.quality_score).sum::<f64>() / total as f64;
        Self {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64 * 100.0,
            avg_score: (avg * 100.0).round() / 100.0,
        }
    }
}
