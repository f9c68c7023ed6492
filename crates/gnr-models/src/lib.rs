//! gnr-models
//!
//! Fitted susceptibility models. Loads exported logistic-regression
//! artifacts once at startup and answers `predict` calls against them.

pub mod artifact;
pub mod error;
pub mod predictor;
pub mod registry;

pub use artifact::LogisticArtifact;
pub use error::ModelError;
pub use predictor::Predictor;
pub use registry::{ArtifactLayout, ModelKey, ModelRegistry};
