//! Region Filter Phase Metrics

use crate::domain::SchoolSource;
use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct FilterMetrics;

impl FilterMetrics {
    pub fn record_filtered(source: SchoolSource, kept: usize, dropped: usize) {
        ::metrics::counter!(phase_metric!(counter, "filter", "rows_kept"), "source" => source.as_str())
            .increment(kept as u64);
        ::metrics::counter!(phase_metric!(counter, "filter", "rows_dropped"), "source" => source.as_str())
            .increment(dropped as u64);
    }
}

impl PhaseMetrics for FilterMetrics {
    fn register_metrics() {
        use metrics::counter;

        let _ = counter!(phase_metric!(counter, "filter", "rows_kept"));
        let _ = counter!(phase_metric!(counter, "filter", "rows_dropped"));
    }

    fn phase_name() -> &'static str {
        "filter"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "filter", "rows_kept"),
                metric_type: MetricType::Counter,
                help: "Rows inside the target region",
                labels: vec!["source"],
            },
            MetricDoc {
                name: phase_metric!(counter, "filter", "rows_dropped"),
                metric_type: MetricType::Counter,
                help: "Rows outside the target region",
                labels: vec!["source"],
            },
        ]
    }
}
