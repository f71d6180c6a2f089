// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ApplicantRecord, Decision, DecisionLabel, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use requests::LoanRequest;
pub use responses::{ErrorResponse, HealthResponse, PredictionResponse, StatusResponse};
