//! Pipeline metrics
//!
//! Counters and histograms are recorded through the `metrics` facade. Nothing is
//! exported until `init_metrics` installs the Prometheus recorder; before that
//! every call is a no-op.

use ::metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing::{info, warn};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const PAGES_FETCHED: &str = "pipeline_pages_fetched_total";
pub const PAGES_EMPTY: &str = "pipeline_pages_empty_total";
pub const TAG_LOOKUPS: &str = "pipeline_tag_lookups_total";
pub const TAG_LOOKUPS_EMPTY: &str = "pipeline_tag_lookups_empty_total";
pub const RUNS: &str = "pipeline_runs_total";
pub const RUNS_FAILED: &str = "pipeline_runs_failed_total";
pub const OUTPUT_RECORDS: &str = "pipeline_output_records_total";
pub const RUN_DURATION: &str = "pipeline_run_duration_seconds";

/// Install the Prometheus recorder. Idempotent.
pub fn init_metrics() {
    if HANDLE.get().is_some() {
        return;
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if HANDLE.set(handle).is_ok() {
                describe_all();
                info!("Prometheus recorder installed");
            }
        }
        Err(e) => warn!("Failed to install Prometheus recorder: {}", e),
    }
}

/// Render the current metrics in Prometheus text format
pub fn render() -> Option<String> {
    HANDLE.get().map(|h| h.render())
}

fn describe_all() {
    describe_counter!(PAGES_FETCHED, "Calendar pages requested from the events provider");
    describe_counter!(PAGES_EMPTY, "Calendar pages that yielded no data");
    describe_counter!(TAG_LOOKUPS, "Artist tag lookups issued");
    describe_counter!(TAG_LOOKUPS_EMPTY, "Artist tag lookups that yielded no tags");
    describe_counter!(RUNS, "Pipeline invocations");
    describe_counter!(RUNS_FAILED, "Pipeline invocations that returned an error");
    describe_counter!(OUTPUT_RECORDS, "Output records produced");
    describe_histogram!(RUN_DURATION, "Wall time of one pipeline invocation");
}

/// Recording helpers grouped by pipeline phase
pub struct PipelineMetrics;

impl PipelineMetrics {
    pub fn record_page(empty: bool) {
        counter!(PAGES_FETCHED).increment(1);
        if empty {
            counter!(PAGES_EMPTY).increment(1);
        }
    }

    pub fn record_tag_lookup(empty: bool) {
        counter!(TAG_LOOKUPS).increment(1);
        if empty {
            counter!(TAG_LOOKUPS_EMPTY).increment(1);
        }
    }

    pub fn record_run(duration_secs: f64, records: usize) {
        counter!(RUNS).increment(1);
        counter!(OUTPUT_RECORDS).increment(records as u64);
        histogram!(RUN_DURATION).record(duration_secs);
    }

    pub fn record_run_failure() {
        counter!(RUNS).increment(1);
        counter!(RUNS_FAILED).increment(1);
    }
}
