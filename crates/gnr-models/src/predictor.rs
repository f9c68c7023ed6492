/// A fitted binary classifier for one target (and optionally one site).
///
/// Implementations are immutable once loaded; `predict_proba` must be a pure
/// function of its input.
pub trait Predictor: Send + Sync {
    /// Column names the model was fitted on, in order.
    fn feature_names(&self) -> &[String];

    /// `[P(susceptible), P(nonsusceptible)]` for one feature row laid out
    /// as in [`Predictor::feature_names`].
    fn predict_proba(&self, features: &[f64]) -> [f64; 2];
}
