//! Merge Phase Metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct MergeMetrics;

impl MergeMetrics {
    pub fn record_merged(rows: usize, columns: usize) {
        ::metrics::counter!(phase_metric!(counter, "merge", "rows")).increment(rows as u64);
        ::metrics::histogram!(phase_metric!(histogram, "merge", "columns")).record(columns as f64);
    }

    pub fn record_written(bytes: u64) {
        ::metrics::counter!(phase_metric!(counter, "merge", "files_written")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "merge", "output_bytes")).record(bytes as f64);
    }
}

impl PhaseMetrics for MergeMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "merge", "rows"));
        let _ = counter!(phase_metric!(counter, "merge", "files_written"));
        let _ = histogram!(phase_metric!(histogram, "merge", "columns"));
        let _ = histogram!(phase_metric!(histogram, "merge", "output_bytes"));
    }

    fn phase_name() -> &'static str {
        "merge"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "merge", "rows"),
                metric_type: MetricType::Counter,
                help: "Rows in the unified output",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "merge", "files_written"),
                metric_type: MetricType::Counter,
                help: "Output files written",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "merge", "columns"),
                metric_type: MetricType::Histogram,
                help: "Attribute columns in the unified output",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "merge", "output_bytes"),
                metric_type: MetricType::Histogram,
                help: "Size of the written GeoJSON in bytes",
                labels: vec![],
            },
        ]
    }
}
