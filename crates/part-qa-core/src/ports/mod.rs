//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the inspection core and its
//! collaborators: image acquisition, persistence, and presentation.

mod image_source;
mod progress;
mod record_store;
mod result_output;

pub use image_source::{ImageSource, LoadFailure};
pub use progress::{ProgressEvent, ProgressSink};
pub use record_store::RecordStore;
pub use result_output::ResultOutput;
