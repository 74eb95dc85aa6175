//! Registers every phase's metrics and detects naming conflicts early.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::metrics::{MetricDoc, PhaseMetrics};

pub fn register_all_metrics() {
    let all_metrics = collect_all_metrics();
    info!("Registered {} metrics across all phases", all_metrics.len());
}

/// Register each phase and return the combined documentation keyed by metric name
pub fn collect_all_metrics() -> HashMap<&'static str, MetricDoc> {
    let mut all_metrics = HashMap::new();

    register_phase_metrics::<super::LoadMetrics>(&mut all_metrics);
    register_phase_metrics::<super::NormalizeMetrics>(&mut all_metrics);
    register_phase_metrics::<super::FilterMetrics>(&mut all_metrics);
    register_phase_metrics::<super::MergeMetrics>(&mut all_metrics);

    all_metrics
}

fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<&'static str, MetricDoc>) {
    T::register_metrics();
    let phase_name = T::phase_name();

    for doc in T::metrics_documentation() {
        if all_metrics.contains_key(doc.name) {
            warn!(
                "Metric name conflict: '{}' defined again by phase '{}'",
                doc.name, phase_name
            );
        } else {
            debug!("{} ({:?}): {}", doc.name, doc.metric_type, doc.help);
            all_metrics.insert(doc.name, doc);
        }
    }
}
