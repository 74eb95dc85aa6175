use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::domain::{SchoolFrame, SchoolRecord};
use crate::error::{Result, SchoolDataError};
use crate::metrics::FilterMetrics;

/// Keeps rows whose region columns mention a place name.
///
/// Matching is a case-insensitive substring search, so "South San Francisco"
/// matches "San Francisco". Null and non-text values never match.
#[derive(Debug, Clone)]
pub struct RegionFilter {
    pattern: Regex,
    columns: Vec<String>,
}

impl RegionFilter {
    pub fn new(region_name: &str, columns: Vec<String>) -> Result<Self> {
        let pattern = RegexBuilder::new(&regex::escape(region_name))
            .case_insensitive(true)
            .build()
            .map_err(|e| SchoolDataError::Config(format!("invalid region name: {}", e)))?;
        Ok(Self { pattern, columns })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(&config.region_name, config.region_columns.clone())
    }

    pub fn matches(&self, record: &SchoolRecord) -> bool {
        self.columns.iter().any(|column| match record.get(column) {
            Value::String(text) => self.pattern.is_match(text),
            _ => false,
        })
    }

    /// Drop rows outside the region, keeping input order.
    pub fn apply(&self, mut frame: SchoolFrame) -> SchoolFrame {
        let before = frame.len();
        frame.records.retain(|record| self.matches(record));
        let kept = frame.len();

        FilterMetrics::record_filtered(frame.source, kept, before - kept);
        info!(
            "Kept {} of {} {} rows matching '{}'",
            kept,
            before,
            frame.source,
            self.pattern.as_str()
        );
        if kept == 0 && before > 0 {
            debug!("No {} rows in region; output will have none from this source", frame.source);
        }
        frame
    }
}
