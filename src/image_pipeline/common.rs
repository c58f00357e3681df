//! Common utilities module
//!
//! Error type and stage timing shared across the pipeline.

pub mod error;
pub mod timing;

pub use error::{MapError, Result};
pub use timing::{PipelineTimings, StepTiming, Timer};
