//! Phase-organized metrics for the school pipeline
//!
//! Each pipeline phase defines its own metrics in a dedicated submodule.
//! Metrics go through the `metrics` facade. `init_metrics` installs a
//! Prometheus recorder without an HTTP listener; `render_metrics` returns the
//! current snapshot in text exposition format.

pub mod filter;
pub mod load;
pub mod merge;
pub mod normalize;
pub mod registry;

pub use filter::FilterMetrics;
pub use load::LoadMetrics;
pub use merge::MergeMetrics;
pub use normalize::NormalizeMetrics;

use std::sync::{Once, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

static INIT: Once = Once::new();
static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder and register all phase metrics. Idempotent.
///
/// If another recorder is already installed, metrics still go to that one
/// and `render_metrics` returns `None`.
pub fn init_metrics() {
    INIT.call_once(|| {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                if HANDLE.set(handle).is_err() {
                    warn!("Prometheus handle already stored");
                }
                info!("Prometheus recorder installed");
            }
            Err(e) => warn!("Failed to install Prometheus recorder: {}", e),
        }
        registry::register_all_metrics();
    });
}

/// Render the recorded metrics, if `init_metrics` installed the recorder
pub fn render_metrics() -> Option<String> {
    HANDLE.get().map(PrometheusHandle::render)
}

/// Trait for phase-specific metrics collections
pub trait PhaseMetrics {
    /// Register all metrics for this phase
    fn register_metrics();

    /// Phase name used as the metric name prefix
    fn phase_name() -> &'static str;

    /// Documentation for all metrics in this phase
    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
    pub labels: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
}

/// Builds metric names following `sf_schools_{phase}_{metric_name}[_total]`
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("sf_schools_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("sf_schools_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SchoolSource;

    #[test]
    fn test_phase_metrics_are_recorded_with_source_label() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            FilterMetrics::record_filtered(SchoolSource::Public, 3, 2);
            MergeMetrics::record_merged(3, 7);
        });

        let rendered = handle.render();
        assert!(rendered.contains("sf_schools_filter_rows_kept_total{source=\"public\"} 3"), "{}", rendered);
        assert!(rendered.contains("sf_schools_filter_rows_dropped_total{source=\"public\"} 2"), "{}", rendered);
        assert!(rendered.contains("sf_schools_merge_rows_total 3"), "{}", rendered);
    }
}
