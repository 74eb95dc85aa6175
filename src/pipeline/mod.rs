// School data pipeline: ingestion, processing and GeoJSON output

pub mod geojson_out;
pub mod ingestion;
pub mod orchestrator;
pub mod processing;

pub use orchestrator::{process_school_data, PipelineResult, SchoolPipeline, SourceSummary};
