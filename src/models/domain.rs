use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of features the classifier was trained on
pub const FEATURE_COUNT: usize = 9;

/// Training-time column names, in the order the classifier consumes them
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "no_of_dependents",
    "education",
    "self_employed",
    "income_annum",
    "loan_amount",
    "loan_term",
    "cibil_score",
    "Movable_assets",
    "Immovable_assets",
];

/// Applicant attributes as received from the transport layer
///
/// Categorical fields are kept as raw strings; mapping them to codes is the
/// encoder's job so unknown values surface as encoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub no_of_dependents: u64,
    pub education: String,
    pub self_employed: String,
    pub income_annum: u64,
    pub loan_amount: u64,
    pub loan_term: u64,
    pub cibil_score: u64,
    pub residential_assets_value: u64,
    pub commercial_assets_value: u64,
    pub luxury_assets_value: u64,
    pub bank_asset_value: u64,
}

/// Encoded feature vector with a pinned column order
///
/// Positions follow [`FEATURE_NAMES`]. Fields are private so the only way to
/// build one is through the encoder or [`FeatureVector::from_array`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FeatureVector([u64; FEATURE_COUNT]);

impl FeatureVector {
    pub const DEPENDENTS: usize = 0;
    pub const EDUCATION: usize = 1;
    pub const SELF_EMPLOYED: usize = 2;
    pub const INCOME: usize = 3;
    pub const LOAN_AMOUNT: usize = 4;
    pub const LOAN_TERM: usize = 5;
    pub const CREDIT_SCORE: usize = 6;
    pub const MOVABLE_ASSETS: usize = 7;
    pub const IMMOVABLE_ASSETS: usize = 8;

    pub fn from_array(values: [u64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[u64; FEATURE_COUNT] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<u64> {
        self.0.get(index).copied()
    }

    pub fn movable_assets(&self) -> u64 {
        self.0[Self::MOVABLE_ASSETS]
    }

    pub fn immovable_assets(&self) -> u64 {
        self.0[Self::IMMOVABLE_ASSETS]
    }

    /// Row in the floating point layout tree ensembles split on
    pub fn to_row(&self) -> Vec<f64> {
        self.0.iter().map(|&v| v as f64).collect()
    }
}

/// Domain-level outcome of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionLabel {
    Approved,
    Rejected,
}

impl DecisionLabel {
    /// Only class `1` approves; every other raw label is a rejection
    pub fn from_raw(raw: i64) -> Self {
        if raw == 1 {
            DecisionLabel::Approved
        } else {
            DecisionLabel::Rejected
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionLabel::Approved => "Approved",
            DecisionLabel::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for DecisionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision plus the raw class the classifier emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub label: DecisionLabel,
    pub raw_class: i64,
}

impl Decision {
    pub fn from_raw(raw_class: i64) -> Self {
        Self {
            label: DecisionLabel::from_raw(raw_class),
            raw_class,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.label == DecisionLabel::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_names_match_positions() {
        assert_eq!(FEATURE_NAMES[FeatureVector::DEPENDENTS], "no_of_dependents");
        assert_eq!(FEATURE_NAMES[FeatureVector::CREDIT_SCORE], "cibil_score");
        assert_eq!(FEATURE_NAMES[FeatureVector::MOVABLE_ASSETS], "Movable_assets");
        assert_eq!(FEATURE_NAMES[FeatureVector::IMMOVABLE_ASSETS], "Immovable_assets");
    }

    #[test]
    fn test_decision_from_raw() {
        assert_eq!(Decision::from_raw(1).label, DecisionLabel::Approved);
        assert_eq!(Decision::from_raw(0).label, DecisionLabel::Rejected);
        // Anything that is not 1 is treated as a rejection
        assert_eq!(Decision::from_raw(2).label, DecisionLabel::Rejected);
        assert_eq!(Decision::from_raw(-1).raw_class, -1);
    }

    #[test]
    fn test_row_conversion_keeps_order() {
        let vector = FeatureVector::from_array([1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(vector.to_row(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }
}
