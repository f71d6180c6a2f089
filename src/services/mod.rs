// Service exports
pub mod classifier;
pub mod forest;

pub use classifier::{Classifier, ClassifierError, ClassifierHandle};
pub use forest::{DecisionTree, ModelUnavailable, RandomForest};
