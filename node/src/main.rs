// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use alert_node::config::NodeConfig;
use alert_node::server::{build_router, AppState};
use alert_node::telemetry::init_telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    let cfg = NodeConfig::from_env();
    tracing::info!(
        "Initializing Alert Node: bind={}, export_dir={:?}, default_keep={}",
        cfg.bind_addr,
        cfg.changelog.export_dir,
        cfg.changelog.default_keep
    );

    let state = Arc::new(AppState::new(&cfg));
    let app = build_router(state, cfg.auth_token.clone());

    tracing::info!("Listening on {}", cfg.bind_addr);
    let listener = TcpListener::bind(cfg.bind_addr).await?;
    axum::serve(listener, app).await
}
