use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{FEATURE_COUNT, FEATURE_NAMES};
use crate::services::classifier::{Classifier, ClassifierError};

const LEAF: i64 = -1;

/// The classifier artifact could not be brought up
///
/// Raised only at startup. The service refuses to start rather than
/// answering with fabricated predictions.
#[derive(Debug, Error)]
pub enum ModelUnavailable {
    #[error("model file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read model file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed model file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid model structure: {0}")]
    Invalid(String),

    #[error("model schema does not match the encoder: {0}")]
    Incompatible(String),
}

/// One fitted decision tree in the parallel-array layout
///
/// Node `i` is a leaf when `children_left[i] == -1`. Internal nodes route a
/// row left when `f32(row[feature[i]]) <= threshold[i]`: inputs are rounded
/// to single precision before the comparison, exactly as the trees saw them
/// at fit time, while thresholds stay double precision. `value[i]` holds the
/// per-class weight at that node.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n_nodes = self.children_left.len();
        if n_nodes == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != n_nodes
            || self.feature.len() != n_nodes
            || self.threshold.len() != n_nodes
            || self.value.len() != n_nodes
        {
            return Err(format!("node arrays disagree on length (expected {})", n_nodes));
        }

        for node in 0..n_nodes {
            let left = self.children_left[node];
            let right = self.children_right[node];

            if left == LEAF {
                if right != LEAF {
                    return Err(format!("node {} has only a right child", node));
                }
                let weights = &self.value[node];
                if weights.len() != n_classes {
                    return Err(format!(
                        "leaf {} has {} class weights, expected {}",
                        node,
                        weights.len(),
                        n_classes
                    ));
                }
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(format!("leaf {} has invalid class weights", node));
                }
                continue;
            }

            // Children must point forward, which also rules out cycles
            for child in [left, right] {
                if child <= node as i64 || child >= n_nodes as i64 {
                    return Err(format!("node {} has out-of-range child {}", node, child));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {} splits on unknown feature {}", node, feature));
            }
            if self.threshold[node].is_nan() {
                return Err(format!("node {} has a NaN threshold", node));
            }
        }

        Ok(())
    }

    /// Normalized class distribution of the leaf `row` lands in
    fn leaf_distribution(&self, row: &[f64]) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let column = self.feature[node] as usize;
            node = if as_split_value(row[column]) <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let weights = &self.value[node];
        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            weights.iter().map(|w| w / total).collect()
        } else {
            vec![0.0; weights.len()]
        }
    }
}

/// Round an input to the single precision the trees were fitted on
#[inline]
fn as_split_value(value: f64) -> f64 {
    (value as f32) as f64
}

/// Serialized form of the exported forest
#[derive(Debug, Deserialize)]
struct ForestArtifact {
    #[serde(default)]
    name: Option<String>,
    n_features: usize,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
}

/// Random forest classifier loaded from a JSON export
///
/// Class probabilities are the mean of every tree's normalized leaf
/// distribution; the predicted label is the most probable class, with the
/// first class winning ties.
#[derive(Debug, Clone)]
pub struct RandomForest {
    name: String,
    n_features: usize,
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Load and validate a forest from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelUnavailable> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ModelUnavailable::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                ModelUnavailable::Unreadable {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let forest = Self::from_json(&raw)?;
        tracing::info!(
            "Loaded model '{}' from {} ({} trees, {} classes)",
            forest.name,
            path.display(),
            forest.trees.len(),
            forest.classes.len()
        );
        Ok(forest)
    }

    /// Parse and validate a forest from its JSON export
    pub fn from_json(raw: &str) -> Result<Self, ModelUnavailable> {
        let artifact: ForestArtifact = serde_json::from_str(raw)?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: ForestArtifact) -> Result<Self, ModelUnavailable> {
        if artifact.n_features != FEATURE_COUNT {
            return Err(ModelUnavailable::Incompatible(format!(
                "model expects {} features, encoder produces {}",
                artifact.n_features, FEATURE_COUNT
            )));
        }
        if let Some(names) = &artifact.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(ModelUnavailable::Incompatible(format!(
                    "feature order {:?} differs from {:?}",
                    names, FEATURE_NAMES
                )));
            }
        }
        if artifact.classes.is_empty() {
            return Err(ModelUnavailable::Invalid("model declares no classes".to_string()));
        }
        if artifact.trees.is_empty() {
            return Err(ModelUnavailable::Invalid("model contains no trees".to_string()));
        }

        for (index, tree) in artifact.trees.iter().enumerate() {
            tree.validate(artifact.n_features, artifact.classes.len())
                .map_err(|reason| ModelUnavailable::Invalid(format!("tree {}: {}", index, reason)))?;
        }

        Ok(Self {
            name: artifact.name.unwrap_or_else(|| "random-forest".to_string()),
            n_features: artifact.n_features,
            classes: artifact.classes,
            trees: artifact.trees,
        })
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean class probabilities for a single row
    pub fn predict_proba_row(&self, row: &[f64]) -> Result<Vec<f64>, ClassifierError> {
        self.check_row(row)?;

        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (total, p) in totals.iter_mut().zip(tree.leaf_distribution(row)) {
                *total += p;
            }
        }

        let n_trees = self.trees.len() as f64;
        Ok(totals.into_iter().map(|t| t / n_trees).collect())
    }

    fn check_row(&self, row: &[f64]) -> Result<(), ClassifierError> {
        if row.len() != self.n_features {
            return Err(ClassifierError::ShapeMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        if let Some(column) = row.iter().position(|v| !v.is_finite()) {
            return Err(ClassifierError::NonFinite { column });
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>, ClassifierError> {
        rows.iter()
            .map(|row| -> Result<i64, ClassifierError> {
                let proba = self.predict_proba_row(row)?;
                let mut best = 0usize;
                for (index, p) in proba.iter().enumerate() {
                    if *p > proba[best] {
                        best = index;
                    }
                }
                Ok(self.classes[best])
            })
            .collect()
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn name(&self) -> &str {
        &self.name
    }
}
