use actix_web::{web, HttpResponse, Responder};
use std::time::Instant;
use validator::Validate;

use crate::core::{LoanScorer, ScoringError};
use crate::models::{
    ApplicantRecord, ErrorResponse, HealthResponse, LoanRequest, PredictionResponse,
    StatusResponse,
};

/// Application state shared across all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub scorer: LoanScorer,
    pub model_name: String,
}

impl AppState {
    pub fn new(scorer: LoanScorer, model_name: Option<String>) -> Self {
        let model_name = model_name.unwrap_or_else(|| scorer.model_name().to_string());
        Self { scorer, model_name }
    }
}

/// Configure all prediction-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(home))
        .route("/health", web::get().to(health_check))
        .route("/predict", web::post().to(predict_loan));
}

/// Service banner
async fn home(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(StatusResponse {
        status: "Online".to_string(),
        model: state.model_name.clone(),
    })
}

/// Health check endpoint
///
/// The classifier is loaded before the server binds, so a responding
/// process is always ready to score.
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        model: state.model_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Loan prediction endpoint
///
/// POST /predict
///
/// Request body:
/// ```json
/// {
///   "no_of_dependents": 2,
///   "education": "Graduate",
///   "self_employed": "No",
///   "income_annum": 900000,
///   "loan_amount": 2500000,
///   "loan_term": 12,
///   "cibil_score": 750,
///   "residential_assets_value": 500000,
///   "commercial_assets_value": 0,
///   "luxury_assets_value": 100000,
///   "bank_asset_value": 200000
/// }
/// ```
///
/// Response body: `{"prediction": "Approved", "status_code": 1}`
async fn predict_loan(
    state: web::Data<AppState>,
    req: web::Json<LoanRequest>,
) -> Result<HttpResponse, ScoringError> {
    let request_id = uuid::Uuid::new_v4();

    if let Err(errors) = req.validate() {
        tracing::info!(%request_id, "Validation failed for predict request: {}", errors);
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    let record = ApplicantRecord::from(req.into_inner());
    let started = Instant::now();

    let result = match state.scorer.score(&record) {
        Ok(result) => result,
        Err(ScoringError::Encoding(e)) => {
            tracing::info!(%request_id, "Rejected malformed applicant: {}", e);
            return Err(e.into());
        }
        Err(e) => {
            tracing::error!(%request_id, "Prediction failed: {}", e);
            return Err(e);
        }
    };

    tracing::info!(
        %request_id,
        decision = %result.decision.label,
        raw_class = result.decision.raw_class,
        elapsed_us = started.elapsed().as_micros() as u64,
        "Scored loan application"
    );
    tracing::debug!(%request_id, features = ?result.features.as_array(), "Encoded features");

    Ok(HttpResponse::Ok().json(PredictionResponse::from(result.decision)))
}
