use thiserror::Error;

use crate::crs::ProjectionError;
use crate::domain::SchoolSource;

#[derive(Error, Debug)]
pub enum SchoolDataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("Expected a FeatureCollection in {dataset} input, found {found}")]
    NotFeatureCollection { dataset: SchoolSource, found: String },

    #[error("Both input datasets must have a CRS (missing on {0} input)")]
    MissingCrs(SchoolSource),

    #[error("Unsupported coordinate reference system: {0}")]
    UnsupportedCrs(String),

    #[error("Reprojection failed for {dataset} row {row}: {reason}")]
    Reprojection {
        dataset: SchoolSource,
        row: usize,
        reason: ProjectionError,
    },

    #[error("Missing required column '{column}' in {dataset} input")]
    MissingColumn {
        dataset: SchoolSource,
        column: String,
    },

    #[error("Column '{column}' appears more than once after lowercasing in {dataset} input")]
    DuplicateColumn {
        dataset: SchoolSource,
        column: String,
    },

    #[error("Cannot convert enrollment {value} to float in {dataset} row {row}")]
    InvalidEnrollment {
        dataset: SchoolSource,
        row: usize,
        value: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SchoolDataError>;
