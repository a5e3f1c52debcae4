//! Mock implementations of core port traits.

use std::sync::{Arc, Mutex, PoisonError};

use part_qa_core::domain::{
    CapturedImage, DefectAssessment, HistoryStats, InspectionRecord, InspectionReport,
};
use part_qa_core::ports::{
    ImageSource, LoadFailure, ProgressEvent, ProgressSink, RecordStore, ResultOutput,
};

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-built images, optionally interleaved with load failures.
pub struct MockImageSource {
    items: Vec<Result<CapturedImage, LoadFailure>>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given images.
    #[must_use]
    pub fn new(images: Vec<CapturedImage>) -> Self {
        Self {
            items: images.into_iter().map(Ok).collect(),
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Appends an item at `path` that fails to load with `reason`.
    #[must_use]
    pub fn with_failure(mut self, path: impl Into<String>, reason: impl Into<String>) -> Self {
        self.items.push(Err(LoadFailure::new(path, reason)));
        self
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = Result<CapturedImage, LoadFailure>> + Send + '_> {
        if let Ok(mut c) = self.iteration_count.lock() {
            *c += 1;
        }
        Box::new(self.items.iter().cloned())
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures reports for later assertions.
pub struct MockResultOutput {
    reports: Arc<Mutex<Vec<InspectionReport>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured reports.
    #[must_use]
    pub fn reports(&self) -> Vec<InspectionReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, report: &InspectionReport) -> anyhow::Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Completed { .. }))
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Skipped { .. }))
    }

    /// Returns the `(processed, failed, skipped)` counts from the `Finished` event.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished {
                processed,
                failed,
                skipped,
            } => Some((*processed, *failed, *skipped)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// In-memory implementation of `RecordStore` for testing.
pub struct MockRecordStore {
    records: Arc<Mutex<Vec<InspectionRecord>>>,
}

impl MockRecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns every stored record in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<InspectionRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MockRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MockRecordStore {
    #[allow(clippy::significant_drop_tightening)]
    fn add(&self, assessment: &DefectAssessment, image_path: Option<&str>) -> anyhow::Result<u64> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let id = records.len() as u64 + 1;
        records.push(InspectionRecord {
            id,
            timestamp: "1970-01-01T00:00:00Z".into(),
            result: assessment.verdict().into(),
            confidence: assessment.confidence,
            image_path: image_path.map(str::to_string),
            defect_type: assessment.defect_type.map(|t| t.label().to_string()),
            quality_score: assessment.quality_score,
        });
        Ok(id)
    }

    fn records(&self, limit: usize) -> anyhow::Result<Vec<InspectionRecord>> {
        Ok(self.all().into_iter().rev().take(limit).collect())
    }

    fn statistics(&self) -> anyhow::Result<HistoryStats> {
        Ok(HistoryStats::from_records(&self.all()))
    }
}
