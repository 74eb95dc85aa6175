use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::domain::{SchoolFrame, SchoolSource, UnifiedSchools};
use crate::error::{Result, SchoolDataError};
use crate::pipeline::geojson_out::write_geojson;
use crate::pipeline::ingestion::{load_school_file, InputProvenance};
use crate::pipeline::processing::normalize::{normalize_frame, normalizer_for, NormalizationStats};
use crate::pipeline::processing::{merge_frames, RegionFilter};

/// Per-source counts for one run
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub source: SchoolSource,
    pub provenance: Option<InputProvenance>,
    pub normalization: NormalizationStats,
    /// Rows left after the region filter
    pub rows_in_region: usize,
}

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub inputs: Vec<SourceSummary>,
    pub output_rows: usize,
    pub output_columns: Vec<String>,
    pub output_path: PathBuf,
    pub output_bytes: u64,
}

pub struct SchoolPipeline {
    config: PipelineConfig,
}

impl SchoolPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalize, filter and merge two in-memory frames.
    pub fn process(
        &self,
        private: SchoolFrame,
        public: SchoolFrame,
    ) -> Result<(UnifiedSchools, Vec<SourceSummary>)> {
        self.config.validate()?;
        let filter = RegionFilter::from_config(&self.config)?;

        // Both CRS are checked before either frame is transformed
        for frame in [&private, &public] {
            if frame.crs.is_none() {
                return Err(SchoolDataError::MissingCrs(frame.source));
            }
        }

        let mut summaries = Vec::with_capacity(2);
        let mut cleaned = Vec::with_capacity(2);
        for frame in [private, public] {
            let normalizer = normalizer_for(frame.source);
            let (frame, stats) = normalize_frame(frame, normalizer.as_ref())?;
            let frame = filter.apply(frame);
            summaries.push(SourceSummary {
                source: frame.source,
                provenance: None,
                normalization: stats,
                rows_in_region: frame.len(),
            });
            cleaned.push(frame);
        }

        let merged = merge_frames(&cleaned[0], &cleaned[1]);
        Ok((merged, summaries))
    }

    /// Load both inputs, process them and write the merged collection.
    ///
    /// Progress lines go to stdout; diagnostics go through `tracing`.
    #[instrument(skip(self))]
    pub fn run(
        &self,
        private_path: &Path,
        public_path: &Path,
        output_path: &Path,
    ) -> Result<PipelineResult> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!("Starting run {}", run_id);

        println!("Loading input files...");
        let private = load_school_file(private_path, SchoolSource::Private, &self.config)?;
        let public = load_school_file(public_path, SchoolSource::Public, &self.config)?;

        println!("Processing...");
        let (merged, mut inputs) = self.process(private.frame, public.frame)?;
        inputs[0].provenance = Some(private.provenance);
        inputs[1].provenance = Some(public.provenance);

        println!("Saving cleaned dataset to: {}", output_path.display());
        let output_bytes = write_geojson(&merged, output_path, self.config.pretty_output)?;
        println!("Done!");

        let finished_at = Utc::now();
        info!(
            "Run {} finished in {} ms with {} rows",
            run_id,
            (finished_at - started_at).num_milliseconds(),
            merged.len()
        );

        Ok(PipelineResult {
            run_id,
            started_at,
            finished_at,
            inputs,
            output_rows: merged.len(),
            output_columns: merged.columns,
            output_path: output_path.to_path_buf(),
            output_bytes,
        })
    }
}

/// Clean and merge two loaded frames with the given settings.
pub fn process_school_data(
    private: SchoolFrame,
    public: SchoolFrame,
    config: &PipelineConfig,
) -> Result<UnifiedSchools> {
    SchoolPipeline::new(config.clone())
        .process(private, public)
        .map(|(merged, _)| merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::domain::SchoolRecord;
    use geo::{point, Geometry};
    use serde_json::{json, Value};

    fn frame(source: SchoolSource, crs: Option<Crs>, rows: Vec<Value>) -> SchoolFrame {
        let mut frame = SchoolFrame::new(source, crs);
        for row in rows {
            let properties = row.as_object().cloned().unwrap();
            for key in properties.keys() {
                frame.add_column(key);
            }
            frame.records.push(SchoolRecord::new(
                Some(Geometry::Point(point!(x: -122.45, y: 37.76))),
                properties,
            ));
        }
        frame
    }

    #[test]
    fn test_process_scenarios() {
        let private = frame(
            SchoolSource::Private,
            Some(Crs::Wgs84),
            vec![json!({"LEVEL_": 1, "ENROLLMENT": -5, "CITY": "San Francisco", "COUNTY": "San Francisco", "A": "x"})],
        );
        let public = frame(
            SchoolSource::Public,
            Some(Crs::Wgs84),
            vec![
                json!({"level_": "Not Reported", "enrollment": 10, "city": "Oakland", "county": "Alameda", "b": 1}),
                json!({"level_": "high", "enrollment": 900, "city": "South San Francisco", "county": "San Mateo", "b": 2}),
            ],
        );

        let (merged, summaries) = SchoolPipeline::new(PipelineConfig::default())
            .process(private, public)
            .unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(
            merged.columns,
            vec!["a", "b", "city", "county", "enrollment", "level_", "level_clean", "school_id"]
        );
        assert_eq!(merged.records[0].get("level_clean"), &json!("Elementary"));
        assert_eq!(merged.records[0].get("enrollment"), &Value::Null);
        assert_eq!(merged.records[0].get("b"), &Value::Null);
        assert_eq!(merged.records[1].get("level_clean"), &json!("High"));
        assert_eq!(merged.records[1].get("a"), &Value::Null);
        assert_eq!(merged.records[1].get("school_id"), &json!(1));

        assert_eq!(summaries[1].normalization.rows, 2);
        assert_eq!(summaries[1].rows_in_region, 1);
    }

    #[test]
    fn test_missing_crs_checked_before_transform() {
        // The private frame would fail reprojection; the missing public CRS wins.
        let mut private = frame(SchoolSource::Private, Some(Crs::WebMercator), vec![]);
        private.records.push(SchoolRecord::new(
            Some(Geometry::Point(point!(x: f64::NAN, y: 0.0))),
            serde_json::Map::new(),
        ));
        let public = frame(SchoolSource::Public, None, vec![]);

        let result = process_school_data(private, public, &PipelineConfig::default());
        assert!(matches!(result, Err(SchoolDataError::MissingCrs(SchoolSource::Public))));
    }

    #[test]
    fn test_out_of_range_row_outside_region_does_not_abort() {
        let mut private = frame(
            SchoolSource::Private,
            Some(Crs::Wgs84),
            vec![json!({"level_": 1, "enrollment": 10, "city": "San Francisco", "county": "San Francisco"})],
        );
        let mut fresno = serde_json::Map::new();
        fresno.insert("level_".to_string(), json!(2));
        fresno.insert("enrollment".to_string(), json!(50));
        fresno.insert("city".to_string(), json!("Fresno"));
        fresno.insert("county".to_string(), json!("Fresno"));
        private.records.push(SchoolRecord::new(
            Some(Geometry::Point(point!(x: 181.0, y: 37.0))),
            fresno,
        ));
        let public = frame(SchoolSource::Public, Some(Crs::Wgs84), vec![]);

        let merged = process_school_data(private, public, &PipelineConfig::default()).unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged.records[0].get("city"), &json!("San Francisco"));
    }

    #[test]
    fn test_process_records_filter_metrics() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let public = frame(
            SchoolSource::Public,
            Some(Crs::Wgs84),
            vec![
                json!({"level_": "high", "enrollment": 1, "city": "San Francisco", "county": "San Francisco"}),
                json!({"level_": "high", "enrollment": 1, "city": "Berkeley", "county": "Alameda"}),
            ],
        );
        let private = frame(SchoolSource::Private, Some(Crs::Wgs84), vec![]);

        let merged = ::metrics::with_local_recorder(&recorder, || {
            process_school_data(private, public, &PipelineConfig::default())
        })
        .unwrap();

        assert_eq!(merged.len(), 1);
        let rendered = handle.render();
        assert!(
            rendered.contains("sf_schools_filter_rows_kept_total{source=\"public\"} 1"),
            "{}",
            rendered
        );
        assert!(
            rendered.contains("sf_schools_filter_rows_dropped_total{source=\"public\"} 1"),
            "{}",
            rendered
        );
        assert!(
            rendered.contains("sf_schools_normalize_rows_total{source=\"public\"} 2"),
            "{}",
            rendered
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PipelineConfig {
            region_name: String::new(),
            ..PipelineConfig::default()
        };
        let result = process_school_data(
            frame(SchoolSource::Private, Some(Crs::Wgs84), vec![]),
            frame(SchoolSource::Public, Some(Crs::Wgs84), vec![]),
            &config,
        );
        assert!(matches!(result, Err(SchoolDataError::Config(_))));
    }
}
