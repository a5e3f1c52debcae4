//! Error types for the inspection core.

use thiserror::Error;

/// Result type alias for inspection operations.
pub type InspectResult<T> = Result<T, InspectError>;

/// Errors raised by the defect-scoring engine.
///
/// Degenerate but decodable images (uniform, all black, all white) are not
/// errors; they produce a regular assessment.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The input cannot be treated as a pixel grid.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The detector configuration cannot be run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl InspectError {
    /// Create an invalid image error.
    #[must_use]
    pub fn invalid_image(details: impl Into<String>) -> Self {
        Self::InvalidImage(details.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig(details.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InspectError::invalid_image("0x0 buffer");
        assert_eq!(err.to_string(), "invalid image: 0x0 buffer");

        let err = InspectError::invalid_config("edge thresholds out of order");
        assert_eq!(
            err.to_string(),
            "invalid configuration: edge thresholds out of order"
        );
    }
}
