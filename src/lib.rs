pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod pipeline;
pub mod stages;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use models::{PointQuad, Reading};
pub use monitor::{RangeStatus, ReadingRange};
pub use pipeline::{Pipeline, PipelineContext, PipelineStep};
