use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use gnr_server::config::load_config;
use gnr_server::{app, build_state, shutdown_on};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = load_config()?;
    let state = build_state(&config)?;
    tracing::info!(
        targets = state.encoder.targets().len(),
        encoder = ?state.encoder.options(),
        layout = ?state.registry.layout(),
        models = state.registry.len(),
        "models ready"
    );

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await?;
    Ok(())
}
