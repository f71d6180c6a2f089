//! SwiftLoan - loan approval scoring service
//!
//! This library provides the inference pipeline behind the service: it
//! encodes applicant attributes into the feature vector the trained
//! classifier expects, runs the classifier, and maps its label to an
//! approval decision.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{encode, predict, EncodingError, LoanScorer, PredictionError, ScoringError};
pub use crate::models::{ApplicantRecord, Decision, DecisionLabel, FeatureVector, LoanRequest, PredictionResponse};
pub use crate::services::{Classifier, ClassifierHandle, ModelUnavailable, RandomForest};
