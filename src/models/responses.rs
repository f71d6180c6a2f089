use serde::{Deserialize, Serialize};
use crate::models::domain::Decision;

/// Response for the prediction endpoint
///
/// `{"prediction": "Approved", "status_code": 1}` is the shape existing
/// callers depend on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionResponse {
    pub prediction: String,
    pub status_code: i64,
}

impl From<Decision> for PredictionResponse {
    fn from(decision: Decision) -> Self {
        Self {
            prediction: decision.label.as_str().to_string(),
            status_code: decision.raw_class,
        }
    }
}

/// Service banner returned from the root path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub model: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_response_shape() {
        let approved = PredictionResponse::from(Decision::from_raw(1));
        assert_eq!(
            serde_json::to_value(&approved).unwrap(),
            serde_json::json!({"prediction": "Approved", "status_code": 1})
        );

        let rejected = PredictionResponse::from(Decision::from_raw(0));
        assert_eq!(
            serde_json::to_value(&rejected).unwrap(),
            serde_json::json!({"prediction": "Rejected", "status_code": 0})
        );
    }
}
