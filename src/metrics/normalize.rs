//! Normalize Phase Metrics

use crate::domain::SchoolSource;
use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct NormalizeMetrics;

impl NormalizeMetrics {
    pub fn record_frame_normalized(
        source: SchoolSource,
        rows: usize,
        unmapped_levels: usize,
        enrollment_nulled: usize,
        duration_secs: f64,
    ) {
        ::metrics::counter!(phase_metric!(counter, "normalize", "rows"), "source" => source.as_str())
            .increment(rows as u64);
        ::metrics::counter!(phase_metric!(counter, "normalize", "unmapped_levels"), "source" => source.as_str())
            .increment(unmapped_levels as u64);
        ::metrics::counter!(phase_metric!(counter, "normalize", "enrollment_nulled"), "source" => source.as_str())
            .increment(enrollment_nulled as u64);
        ::metrics::histogram!(phase_metric!(histogram, "normalize", "duration_seconds"), "source" => source.as_str())
            .record(duration_secs);
    }
}

impl PhaseMetrics for NormalizeMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "normalize", "rows"));
        let _ = counter!(phase_metric!(counter, "normalize", "unmapped_levels"));
        let _ = counter!(phase_metric!(counter, "normalize", "enrollment_nulled"));
        let _ = histogram!(phase_metric!(histogram, "normalize", "duration_seconds"));
    }

    fn phase_name() -> &'static str {
        "normalize"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "normalize", "rows"),
                metric_type: MetricType::Counter,
                help: "Rows reprojected and cleaned",
                labels: vec!["source"],
            },
            MetricDoc {
                name: phase_metric!(counter, "normalize", "unmapped_levels"),
                metric_type: MetricType::Counter,
                help: "Rows whose level value had no grade band",
                labels: vec!["source"],
            },
            MetricDoc {
                name: phase_metric!(counter, "normalize", "enrollment_nulled"),
                metric_type: MetricType::Counter,
                help: "Negative or non-finite enrollment values replaced with null",
                labels: vec!["source"],
            },
            MetricDoc {
                name: phase_metric!(histogram, "normalize", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Time spent normalizing one input",
                labels: vec!["source"],
            },
        ]
    }
}
