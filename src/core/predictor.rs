use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

use crate::models::{Decision, FeatureVector};
use crate::services::{Classifier, ClassifierError};

/// Errors raised while invoking the classifier for a single request
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("classifier failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("classifier returned {0} labels for a single applicant")]
    UnexpectedOutput(usize),

    #[error("classifier panicked: {0}")]
    Panicked(String),
}

/// Run the classifier on one encoded applicant and map its label
///
/// The classifier sees exactly one row and must answer with exactly one
/// label. A raw label of `1` approves; any other label rejects.
pub fn predict(
    vector: &FeatureVector,
    classifier: &dyn Classifier,
) -> Result<Decision, PredictionError> {
    let rows = [vector.to_row()];

    let labels = panic::catch_unwind(AssertUnwindSafe(|| classifier.predict(&rows)))
        .map_err(|payload| PredictionError::Panicked(panic_message(payload.as_ref())))??;

    let raw = match labels.as_slice() {
        [raw] => *raw,
        other => return Err(PredictionError::UnexpectedOutput(other.len())),
    };

    if raw != 0 && raw != 1 {
        // Still a rejection, but a non-binary model needs this adapter revisited
        tracing::warn!("Classifier '{}' emitted non-binary label {}", classifier.name(), raw);
    }

    Ok(Decision::from_raw(raw))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DecisionLabel;

    /// Classifier that replays a fixed list of labels
    struct FixedLabels(Vec<i64>);

    impl Classifier for FixedLabels {
        fn predict(&self, _rows: &[Vec<f64>]) -> Result<Vec<i64>, ClassifierError> {
            Ok(self.0.clone())
        }

        fn n_features(&self) -> usize {
            9
        }
    }

    struct Failing;

    impl Classifier for Failing {
        fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>, ClassifierError> {
            Err(ClassifierError::ShapeMismatch {
                expected: 11,
                actual: rows[0].len(),
            })
        }

        fn n_features(&self) -> usize {
            11
        }
    }

    struct Panicking;

    impl Classifier for Panicking {
        fn predict(&self, _rows: &[Vec<f64>]) -> Result<Vec<i64>, ClassifierError> {
            panic!("tree index out of bounds")
        }

        fn n_features(&self) -> usize {
            9
        }
    }

    fn vector() -> FeatureVector {
        FeatureVector::from_array([2, 1, 0, 900000, 2500000, 12, 750, 300000, 500000])
    }

    #[test]
    fn test_label_mapping() {
        let approved = predict(&vector(), &FixedLabels(vec![1])).unwrap();
        assert_eq!(approved.label, DecisionLabel::Approved);
        assert_eq!(approved.raw_class, 1);

        let rejected = predict(&vector(), &FixedLabels(vec![0])).unwrap();
        assert_eq!(rejected.label, DecisionLabel::Rejected);
        assert_eq!(rejected.raw_class, 0);
    }

    #[test]
    fn test_unexpected_class_is_rejection() {
        let decision = predict(&vector(), &FixedLabels(vec![3])).unwrap();
        assert_eq!(decision.label, DecisionLabel::Rejected);
        assert_eq!(decision.raw_class, 3);
    }

    #[test]
    fn test_label_count_must_be_one() {
        let err = predict(&vector(), &FixedLabels(vec![])).unwrap_err();
        assert!(matches!(err, PredictionError::UnexpectedOutput(0)));

        let err = predict(&vector(), &FixedLabels(vec![1, 0])).unwrap_err();
        assert!(matches!(err, PredictionError::UnexpectedOutput(2)));
    }

    #[test]
    fn test_classifier_error_keeps_message() {
        let err = predict(&vector(), &Failing).unwrap_err();
        assert!(err.to_string().contains("expected 11 columns, got 9"));
    }

    #[test]
    fn test_panic_is_contained() {
        let err = predict(&vector(), &Panicking).unwrap_err();
        match err {
            PredictionError::Panicked(msg) => assert_eq!(msg, "tree index out of bounds"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
