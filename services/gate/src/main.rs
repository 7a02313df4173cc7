mod config;
mod routes;
mod state;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::GateConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = GateConfig::from_env()?;
    let app_state = AppState::from_config(&cfg)?;

    info!(
        root = %app_state.gate.root_hex(),
        hash = %cfg.hash,
        "gate: root loaded"
    );

    let app = routes::router(app_state);

    let addr = &cfg.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("gate listening on http://{addr}");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
