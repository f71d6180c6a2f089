use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::ApplicantRecord;

/// Request body for the prediction endpoint
///
/// Field names are the training-time column names and form part of the
/// public contract with existing callers. Categorical values are only
/// bounded in size here; whether they name a known category is decided by
/// the encoder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoanRequest {
    pub no_of_dependents: u64,
    #[validate(length(max = 256))]
    pub education: String,
    #[validate(length(max = 256))]
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

impl From<LoanRequest> for ApplicantRecord {
    fn from(req: LoanRequest) -> Self {
        ApplicantRecord {
            no_of_dependents: req.no_of_dependents,
            education: req.education,
            self_employed: req.self_employed,
            income_annum: req.income_annum,
            loan_amount: req.loan_amount,
            loan_term: req.loan_term,
            cibil_score: req.cibil_score,
            residential_assets_value: req.residential_assets_value,
            commercial_assets_value: req.commercial_assets_value,
            luxury_assets_value: req.luxury_assets_value,
            bank_asset_value: req.bank_asset_value,
        }
    }
}
