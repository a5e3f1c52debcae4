//! Image source port: anything that can hand over captured images.

use thiserror::Error;

use crate::domain::CapturedImage;

/// An image the source located but could not load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct LoadFailure {
    /// Path or label of the image that failed.
    pub path: String,
    /// Why it failed, with any underlying cause chain.
    pub reason: String,
}

impl LoadFailure {
    /// Creates a load failure for `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Port for acquiring images (files, cameras, upload queues).
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over images from this source.
    ///
    /// # Errors
    ///
    /// Individual items are [`LoadFailure`]s, naming the image, if it fails
    /// to load or the device is unavailable.
    fn images(&self) -> Box<dyn Iterator<Item = Result<CapturedImage, LoadFailure>> + Send + '_>;

    /// Returns the total number of images, if known.
    fn count_hint(&self) -> Option<usize>;
}
