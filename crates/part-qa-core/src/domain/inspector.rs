//! Inspector trait for pluggable part checks.

use super::{CapturedImage, DefectAssessment};
use crate::error::InspectResult;

/// Trait for engines that turn one captured image into a verdict.
///
/// Implementations hold no per-call state, so a single instance can be
/// shared across threads.
pub trait Inspector: Send + Sync {
    /// Returns the name of this inspector.
    fn name(&self) -> &'static str;

    /// Inspects an image and returns the assessment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InspectError::InvalidImage`] if the image cannot be
    /// analyzed as a pixel grid.
    fn inspect(&self, image: &CapturedImage) -> InspectResult<DefectAssessment>;
}
