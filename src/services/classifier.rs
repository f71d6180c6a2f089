use std::sync::Arc;
use thiserror::Error;

/// Errors raised by a classifier while scoring rows
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("feature shape mismatch: expected {expected} columns, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("non-finite value in column {column}")]
    NonFinite { column: usize },

    #[error("inference failed: {0}")]
    Internal(String),
}

/// A frozen, trained binary classifier
///
/// Implementations are loaded once and shared read-only across worker
/// threads, hence the `Send + Sync` bound.
pub trait Classifier: Send + Sync {
    /// Predict one raw class label per input row
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>, ClassifierError>;

    /// Number of columns each row must carry
    fn n_features(&self) -> usize;

    /// Human readable model name
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Shared handle to the process-wide classifier
pub type ClassifierHandle = Arc<dyn Classifier>;
