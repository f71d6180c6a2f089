// Core pipeline exports
pub mod encoder;
pub mod predictor;
pub mod scorer;

pub use encoder::{encode, EncodingError};
pub use predictor::{predict, PredictionError};
pub use scorer::{LoanScorer, ScoreResult, ScoringError};
