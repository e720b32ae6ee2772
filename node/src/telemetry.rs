// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use alert_changelog::{Alert, Operation};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::sync::OnceLock;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const CHANGES_OBSERVED: &str = "alert_changes_observed_total";
pub const ENTRIES_PRUNED: &str = "changelog_entries_pruned_total";

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "alert_node=debug,alert_changelog=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROM_HANDLE.set(handle).is_err() {
                tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
            }
        }
        Err(e) => tracing::error!("Failed to install Prometheus recorder: {}", e),
    }

    metrics::describe_counter!(CHANGES_OBSERVED, "Alert mutations observed by the change hooks");
    metrics::describe_counter!(ENTRIES_PRUNED, "Change log entries removed by retention");
    metrics::gauge!("alert_node_up", 1.0);
}

/// Change observer counting mutations per operation.
pub fn count_change(operation: Operation, _alert: &Alert) {
    metrics::counter!(CHANGES_OBSERVED, 1, "operation" => operation.as_str());
}

pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}
