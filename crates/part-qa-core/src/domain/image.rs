//! Captured image types.

use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};

use crate::error::InspectError;

/// A decoded still image of a part, as handed to the detector.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    /// Where the image came from (file path, camera label, `synthetic://...`).
    pub source: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Decoded pixel data.
    pub image: DynamicImage,
}

impl CapturedImage {
    /// Wraps a decoded image, reading its dimensions.
    #[must_use]
    pub fn new(source: impl Into<String>, image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            source: source.into(),
            width,
            height,
            image,
        }
    }

    /// Returns the image dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }

    /// Checks that the pixel grid is usable for analysis.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::InvalidImage`] when either dimension is zero or
    /// the recorded dimensions disagree with the pixel buffer.
    pub fn validate(&self) -> Result<(), InspectError> {
        if self.width == 0 || self.height == 0 {
            return Err(InspectError::invalid_image(format!(
                "{}: zero-sized image ({}x{})",
                self.source, self.width, self.height
            )));
        }
        if self.image.dimensions() != (self.width, self.height) {
            return Err(InspectError::invalid_image(format!(
                "{}: pixel buffer is {:?}, expected {}x{}",
                self.source,
                self.image.dimensions(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    /// Converts to 8-bit RGB. Grayscale inputs are replicated across channels.
    #[must_use]
    pub fn to_rgb8(&self) -> image::RgbImage {
        self.image.to_rgb8()
    }
}

/// Image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates a new dimensions value.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
