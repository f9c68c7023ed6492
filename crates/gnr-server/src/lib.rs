//! gnr-server
//!
//! HTTP front end for the susceptibility predictor: serves the form
//! description, runs predictions and renders the HTML report.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use gnr_encoder::Encoder;
use gnr_models::ModelRegistry;

use config::ServerConfig;
use state::AppState;

/// Build the encoder and load every model artifact `config` names.
///
/// Fails if any artifact is missing or was fitted on different columns
/// than the encoder produces.
pub fn build_state(config: &ServerConfig) -> eyre::Result<AppState> {
    let encoder = Encoder::new(config.encoder_tables(), config.encoder);
    let registry = ModelRegistry::load(
        &config.model_dir,
        encoder.targets(),
        &config.hospitals,
        config.layout,
    )?;
    registry.validate_schemas(&encoder)?;
    Ok(AppState::new(encoder, registry))
}

/// Resolves when `signal` fires. If the handler could not be installed the
/// error is logged and this never resolves, so the server keeps serving.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("shutting down"),
        Err(e) => {
            tracing::error!(error = %e, "failed to install shutdown signal handler");
            std::future::pending::<()>().await;
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/form", get(routes::form::describe_form))
        .route("/predictions", post(routes::predictions::create_prediction))
        .route(
            "/predictions/report",
            post(routes::predictions::create_prediction_report),
        )
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(axum_mw::from_fn(middleware::audit::audit_log)),
        )
        .with_state(state)
}
