use thiserror::Error;

use crate::models::{ApplicantRecord, FeatureVector, FEATURE_COUNT};

/// Education labels as they appeared in the training data
const EDUCATION_CODES: [(&str, u64); 2] = [("Not Graduate", 0), ("Graduate", 1)];

/// Self-employment labels as they appeared in the training data
const EMPLOYMENT_CODES: [(&str, u64); 2] = [("No", 0), ("Yes", 1)];

/// Errors that can occur while encoding an applicant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("unrecognized value {value:?} for field '{field}'")]
    UnknownCategory { field: &'static str, value: String },

    #[error("aggregate '{feature}' overflows a 64-bit integer")]
    AggregateOverflow { feature: &'static str },
}

/// Encode an applicant into the classifier's feature vector
///
/// Output order:
/// `[dependents, education, self_employed, income, loan_amount, loan_term,
///   cibil_score, movable_assets, immovable_assets]`
///
/// where `movable_assets = bank + luxury` and
/// `immovable_assets = residential + commercial`.
///
/// Categorical values are matched exactly after trimming surrounding
/// whitespace. Case is not folded.
pub fn encode(record: &ApplicantRecord) -> Result<FeatureVector, EncodingError> {
    let education = lookup_code("education", &record.education, &EDUCATION_CODES)?;
    let self_employed = lookup_code("self_employed", &record.self_employed, &EMPLOYMENT_CODES)?;

    let movable_assets = record
        .bank_asset_value
        .checked_add(record.luxury_assets_value)
        .ok_or(EncodingError::AggregateOverflow { feature: "Movable_assets" })?;
    let immovable_assets = record
        .residential_assets_value
        .checked_add(record.commercial_assets_value)
        .ok_or(EncodingError::AggregateOverflow { feature: "Immovable_assets" })?;

    let mut values = [0u64; FEATURE_COUNT];
    values[FeatureVector::DEPENDENTS] = record.no_of_dependents;
    values[FeatureVector::EDUCATION] = education;
    values[FeatureVector::SELF_EMPLOYED] = self_employed;
    values[FeatureVector::INCOME] = record.income_annum;
    values[FeatureVector::LOAN_AMOUNT] = record.loan_amount;
    values[FeatureVector::LOAN_TERM] = record.loan_term;
    values[FeatureVector::CREDIT_SCORE] = record.cibil_score;
    values[FeatureVector::MOVABLE_ASSETS] = movable_assets;
    values[FeatureVector::IMMOVABLE_ASSETS] = immovable_assets;

    Ok(FeatureVector::from_array(values))
}

#[inline]
fn lookup_code(
    field: &'static str,
    raw: &str,
    codes: &[(&str, u64)],
) -> Result<u64, EncodingError> {
    let trimmed = raw.trim();
    codes
        .iter()
        .find(|(label, _)| *label == trimmed)
        .map(|(_, code)| *code)
        .ok_or_else(|| EncodingError::UnknownCategory {
            field,
            value: raw.to_string(),
        })
}
