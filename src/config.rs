use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{Result, SchoolDataError};

/// Settings for one run of the school pipeline.
///
/// `Default` reproduces the command-line behaviour; tests and library callers
/// can override individual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Text a row's region columns are searched for (case-insensitive substring)
    pub region_name: String,
    /// Columns searched for `region_name`
    pub region_columns: Vec<String>,
    /// Treat a GeoJSON input without a `crs` member as WGS84 lon/lat (RFC 7946)
    pub assume_wgs84_when_undeclared: bool,
    /// Pretty-print the output FeatureCollection
    pub pretty_output: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            region_name: constants::DEFAULT_REGION_NAME.to_string(),
            region_columns: constants::default_region_columns(),
            assume_wgs84_when_undeclared: true,
            pretty_output: true,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.region_name.trim().is_empty() {
            return Err(SchoolDataError::Config(
                "region_name must not be empty".to_string(),
            ));
        }
        if self.region_columns.is_empty() {
            return Err(SchoolDataError::Config(
                "region_columns must name at least one column".to_string(),
            ));
        }
        Ok(())
    }
}
