//! Prometheus metrics for siudang-service.
//!
//! HTTP metrics from `service_core` go through the `metrics` facade and are
//! rendered by the installed exporter; domain metrics live in the default
//! `prometheus` registry. `/metrics` serves both.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder};
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Store call latency by backend and operation.
pub static STORE_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "siudang_store_query_duration_seconds",
        "Store call duration in seconds",
        &["backend", "operation"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register store_query_duration")
});

/// Accounts added to the chart, by type.
pub static ACCOUNTS_CREATED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "siudang_accounts_created_total",
        "Total number of accounts created",
        &["account_type"]
    )
    .expect("Failed to register accounts_created")
});

/// Journal postings by outcome: `posted`, `invalid` or `store_error`.
pub static JOURNAL_ENTRIES_POSTED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "siudang_journal_entries_total",
        "Total number of journal entry submissions",
        &["status"]
    )
    .expect("Failed to register journal_entries")
});

/// Registration steps by outcome.
pub static REGISTRATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "siudang_registrations_total",
        "Registration attempts by stage and outcome",
        &["stage", "outcome"]
    )
    .expect("Failed to register registrations")
});

/// Password logins by outcome.
pub static LOGINS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "siudang_logins_total",
        "Login attempts by outcome",
        &["outcome"]
    )
    .expect("Failed to register logins")
});

/// Store failures that degraded a page render.
pub static STORE_ERRORS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "siudang_store_errors_total",
        "Store failures by page and error kind",
        &["page", "kind"]
    )
    .expect("Failed to register store_errors")
});

/// Install the facade recorder and register every domain metric.
pub fn init_metrics() {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::warn!(error = %e, "Metrics recorder not installed"),
    }

    Lazy::force(&STORE_QUERY_DURATION);
    Lazy::force(&ACCOUNTS_CREATED);
    Lazy::force(&JOURNAL_ENTRIES_POSTED);
    Lazy::force(&REGISTRATIONS);
    Lazy::force(&LOGINS);
    Lazy::force(&STORE_ERRORS);
}

/// Both registries in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default();

    let encoder = TextEncoder::new();
    if let Ok(domain) = encoder.encode_to_string(&prometheus::gather()) {
        output.push_str(&domain);
    }
    output
}
