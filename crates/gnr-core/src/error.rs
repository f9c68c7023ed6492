use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown {kind}: {value}")]
    UnknownLabel { kind: &'static str, value: String },
}

impl CoreError {
    pub(crate) fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        CoreError::UnknownLabel {
            kind,
            value: value.into(),
        }
    }
}
