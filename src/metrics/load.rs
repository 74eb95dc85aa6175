//! Load Phase Metrics

use crate::domain::SchoolSource;
use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct LoadMetrics;

impl LoadMetrics {
    /// Record a successfully loaded input file
    pub fn record_file_loaded(source: SchoolSource, features: usize, bytes: usize) {
        ::metrics::counter!(phase_metric!(counter, "load", "files"), "source" => source.as_str()).increment(1);
        ::metrics::counter!(phase_metric!(counter, "load", "features"), "source" => source.as_str())
            .increment(features as u64);
        ::metrics::histogram!(phase_metric!(histogram, "load", "file_bytes"), "source" => source.as_str())
            .record(bytes as f64);
    }

    pub fn record_load_error(source: SchoolSource) {
        ::metrics::counter!(phase_metric!(counter, "load", "errors"), "source" => source.as_str()).increment(1);
    }
}

impl PhaseMetrics for LoadMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "load", "files"));
        let _ = counter!(phase_metric!(counter, "load", "features"));
        let _ = counter!(phase_metric!(counter, "load", "errors"));
        let _ = histogram!(phase_metric!(histogram, "load", "file_bytes"));
    }

    fn phase_name() -> &'static str {
        "load"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "load", "files"),
                metric_type: MetricType::Counter,
                help: "Input files read",
                labels: vec!["source"],
            },
            MetricDoc {
                name: phase_metric!(counter, "load", "features"),
                metric_type: MetricType::Counter,
                help: "Features read from input files",
                labels: vec!["source"],
            },
            MetricDoc {
                name: phase_metric!(counter, "load", "errors"),
                metric_type: MetricType::Counter,
                help: "Input files that could not be read or parsed",
                labels: vec!["source"],
            },
            MetricDoc {
                name: phase_metric!(histogram, "load", "file_bytes"),
                metric_type: MetricType::Histogram,
                help: "Size of each input file in bytes",
                labels: vec!["source"],
            },
        ]
    }
}
