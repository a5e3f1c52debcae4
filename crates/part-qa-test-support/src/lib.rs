//! Test support utilities for part-qa.
//!
//! Provides mocks, synthetic image builders, and utilities for testing
//! the part inspection pipeline.
//!
//! # Example
//!
//! ```
//! use part_qa_test_support::{MockImageSource, SyntheticImageBuilder};
//!
//! // Create synthetic part images
//! let clean = SyntheticImageBuilder::uniform_gray(64, 64, 128);
//! let noisy = SyntheticImageBuilder::checkerboard(64, 64);
//!
//! // Create mock image source
//! let source = MockImageSource::new(vec![clean, noisy]);
//! ```

mod builders;
mod mocks;

pub use builders::{write_fixture, SyntheticImageBuilder};
pub use mocks::{MockImageSource, MockProgressSink, MockRecordStore, MockResultOutput};
