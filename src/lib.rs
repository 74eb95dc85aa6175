pub mod config;
pub mod constants;
pub mod crs;
pub mod domain;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;

pub use config::PipelineConfig;
pub use domain::{SchoolFrame, SchoolRecord, SchoolSource, UnifiedSchools};
pub use error::{Result, SchoolDataError};
pub use pipeline::{process_school_data, PipelineResult, SchoolPipeline};
