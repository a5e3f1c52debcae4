//! Part QA Core - Domain types, ports and the defect-scoring engine
//!
//! This crate turns one captured image of a manufactured part into a
//! [`DefectAssessment`]: a pass/fail verdict with a quality score, a defect
//! category and a confidence value. It performs no I/O; image acquisition,
//! persistence and presentation live behind the traits in [`ports`].

pub mod detection;
pub mod domain;
pub mod error;
pub mod ports;

pub use detection::{DefectDetector, DetectionConfig, FeatureVector};
pub use domain::{
    AnomalyKind, AnomalyScores, CapturedImage, DefectAssessment, DefectType, HistoryStats,
    ImageDimensions, InspectionRecord, InspectionReport, Inspector,
};
pub use error::{InspectError, InspectResult};
pub use ports::{
    ImageSource, LoadFailure, ProgressEvent, ProgressSink, RecordStore, ResultOutput,
};
