use std::fmt;
use thiserror::Error;

use crate::core::{
    encoder::{encode, EncodingError},
    predictor::{predict, PredictionError},
};
use crate::models::{ApplicantRecord, Decision, FeatureVector};
use crate::services::ClassifierHandle;

/// Any failure while scoring a single applicant
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

/// Outcome of scoring one applicant
#[derive(Debug, Clone, Copy)]
pub struct ScoreResult {
    pub features: FeatureVector,
    pub decision: Decision,
}

/// Scoring orchestrator: encode then predict
///
/// # Pipeline Stages
/// 1. Categorical lookup and asset aggregation
/// 2. Classifier invocation on the single encoded row
/// 3. Label mapping to an approval decision
///
/// Holds only a shared read-only classifier, so clones are cheap and
/// concurrent calls never interact.
#[derive(Clone)]
pub struct LoanScorer {
    classifier: ClassifierHandle,
}

impl LoanScorer {
    pub fn new(classifier: ClassifierHandle) -> Self {
        Self { classifier }
    }

    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    /// Score an applicant
    ///
    /// An encoding failure returns before the classifier is touched.
    pub fn score(&self, record: &ApplicantRecord) -> Result<ScoreResult, ScoringError> {
        let features = encode(record)?;
        let decision = predict(&features, self.classifier.as_ref())?;

        Ok(ScoreResult { features, decision })
    }
}

impl fmt::Debug for LoanScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoanScorer")
            .field("model", &self.classifier.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DecisionLabel;
    use crate::services::{Classifier, ClassifierError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Approves when cibil_score >= 700 and records every row it is given
    #[derive(Default)]
    struct RecordingClassifier {
        calls: AtomicUsize,
        rows: Mutex<Vec<Vec<f64>>>,
    }

    impl Classifier for RecordingClassifier {
        fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rows.lock().unwrap().extend(rows.iter().cloned());
            Ok(rows
                .iter()
                .map(|row| if row[FeatureVector::CREDIT_SCORE] >= 700.0 { 1 } else { 0 })
                .collect())
        }

        fn n_features(&self) -> usize {
            9
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn create_record(cibil_score: u64) -> ApplicantRecord {
        ApplicantRecord {
            no_of_dependents: 2,
            education: "Graduate".to_string(),
            self_employed: "No".to_string(),
            income_annum: 900000,
            loan_amount: 2500000,
            loan_term: 12,
            cibil_score,
            residential_assets_value: 500000,
            commercial_assets_value: 0,
            luxury_assets_value: 100000,
            bank_asset_value: 200000,
        }
    }

    #[test]
    fn test_score_passes_encoded_row() {
        let classifier = Arc::new(RecordingClassifier::default());
        let scorer = LoanScorer::new(classifier.clone());

        let result = scorer.score(&create_record(750)).unwrap();

        assert_eq!(result.decision.label, DecisionLabel::Approved);
        assert_eq!(
            *classifier.rows.lock().unwrap(),
            vec![vec![2.0, 1.0, 0.0, 900000.0, 2500000.0, 12.0, 750.0, 300000.0, 500000.0]]
        );
    }

    #[test]
    fn test_score_is_idempotent() {
        let scorer = LoanScorer::new(Arc::new(RecordingClassifier::default()));
        let record = create_record(640);

        let first = scorer.score(&record).unwrap();
        let second = scorer.score(&record).unwrap();

        assert_eq!(first.features, second.features);
        assert_eq!(first.decision, second.decision);
        assert_eq!(first.decision.label, DecisionLabel::Rejected);
    }

    #[test]
    fn test_encoding_failure_skips_classifier() {
        let classifier = Arc::new(RecordingClassifier::default());
        let scorer = LoanScorer::new(classifier.clone());

        let mut record = create_record(750);
        record.self_employed = "Freelance".to_string();

        let err = scorer.score(&record).unwrap_err();
        assert!(matches!(err, ScoringError::Encoding(_)));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_model_name() {
        let scorer = LoanScorer::new(Arc::new(RecordingClassifier::default()));
        assert_eq!(scorer.model_name(), "recording");
        assert!(format!("{:?}", scorer).contains("recording"));
    }
}
