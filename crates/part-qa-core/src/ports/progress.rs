//! Progress reporting port for UI integration.

use crate::domain::InspectionReport;

/// Events emitted during a batch inspection for progress tracking.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Inspection started for an image.
    Started {
        /// Path to the image.
        path: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total images in batch, if known.
        total: Option<usize>,
    },
    /// Inspection completed for an image.
    Completed {
        /// The report for the image.
        report: InspectionReport,
    },
    /// An image could not be loaded or inspected.
    Skipped {
        /// Path to the image.
        path: String,
        /// Reason for skipping.
        reason: String,
    },
    /// All images have been processed.
    Finished {
        /// Images inspected successfully.
        processed: usize,
        /// Inspected images that failed the quality check.
        failed: usize,
        /// Total images skipped.
        skipped: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
