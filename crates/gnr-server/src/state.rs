use std::sync::Arc;

use gnr_encoder::Encoder;
use gnr_models::ModelRegistry;

/// Shared application state, injected into all route handlers via Axum state.
///
/// Both halves are built at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub encoder: Arc<Encoder>,
    pub registry: Arc<ModelRegistry>,
}

impl AppState {
    pub fn new(encoder: Encoder, registry: ModelRegistry) -> Self {
        Self {
            encoder: Arc::new(encoder),
            registry: Arc::new(registry),
        }
    }
}
