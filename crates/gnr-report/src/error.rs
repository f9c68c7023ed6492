use thiserror::Error;

use gnr_encoder::EncodingError;
use gnr_models::ModelError;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    #[error("prediction failed: {0}")]
    Model(#[from] ModelError),

    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<tera::Error> for ReportError {
    fn from(e: tera::Error) -> Self {
        ReportError::TemplateRender(e.to_string())
    }
}
