//! Persistence port for inspection history.

use crate::domain::{DefectAssessment, HistoryStats, InspectionRecord};

/// Port for persisting assessments and reading them back.
pub trait RecordStore: Send + Sync {
    /// Persists an assessment together with the stored image location.
    ///
    /// Returns the identifier assigned to the new record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn add(&self, assessment: &DefectAssessment, image_path: Option<&str>) -> anyhow::Result<u64>;

    /// Returns up to `limit` records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn records(&self, limit: usize) -> anyhow::Result<Vec<InspectionRecord>>;

    /// Returns aggregate statistics over all records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn statistics(&self) -> anyhow::Result<HistoryStats>;
}
