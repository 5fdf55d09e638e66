//! Pretrained regression artifacts.
//!
//! The engine treats a regressor as an opaque `row -> f64` function. Artifacts
//! are JSON documents produced offline by the training pipeline and loaded once
//! at startup.

use serde::Deserialize;
use std::path::Path;

use crate::error::{EnergyError, ModelLoadError};

/// A single node of a regression tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf {
        leaf: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        /// Taken when `x[feature] < threshold`
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn evaluate(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { leaf } => return *leaf,
                TreeNode::Split { feature, threshold, left, right } => {
                    idx = if row[*feature] < *threshold { *left } else { *right };
                }
            }
        }
    }

    fn max_feature(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                TreeNode::Split { feature, .. } => Some(*feature),
                TreeNode::Leaf { .. } => None,
            })
            .max()
    }
}

/// Serialized regressor, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Regressor {
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    /// Additive tree ensemble (gradient boosting): `base_score + Σ tree(x)`.
    TreeEnsemble {
        n_features: usize,
        #[serde(default)]
        base_score: f64,
        trees: Vec<Tree>,
    },
}

impl Regressor {
    pub fn from_file(path: &Path) -> Result<Self, ModelLoadError> {
        let model: Regressor = read_artifact(path)?;
        model.check_shape()?;
        Ok(model)
    }

    pub fn n_features(&self) -> usize {
        match self {
            Regressor::Linear { coefficients, .. } => coefficients.len(),
            Regressor::TreeEnsemble { n_features, .. } => *n_features,
        }
    }

    /// Rejects artifacts that could index out of bounds or loop while predicting.
    fn check_shape(&self) -> Result<(), ModelLoadError> {
        match self {
            Regressor::Linear { coefficients, intercept } => {
                if coefficients.is_empty() {
                    return Err(ModelLoadError::Shape("linear model has no coefficients".into()));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(ModelLoadError::Shape("linear model has non-finite weights".into()));
                }
            }
            Regressor::TreeEnsemble { n_features, trees, .. } => {
                if trees.is_empty() {
                    return Err(ModelLoadError::Shape("tree ensemble has no trees".into()));
                }
                for (t, tree) in trees.iter().enumerate() {
                    if tree.nodes.is_empty() {
                        return Err(ModelLoadError::Shape(format!("tree {t} is empty")));
                    }
                    // Children must point forward so evaluation always terminates.
                    for (i, node) in tree.nodes.iter().enumerate() {
                        if let TreeNode::Split { left, right, .. } = node {
                            let bad = |c: usize| c <= i || c >= tree.nodes.len();
                            if bad(*left) || bad(*right) {
                                return Err(ModelLoadError::Shape(format!(
                                    "tree {t} node {i} has invalid children ({left}, {right})"
                                )));
                            }
                        }
                    }
                    if let Some(max) = tree.max_feature() {
                        if max >= *n_features {
                            return Err(ModelLoadError::Shape(format!(
                                "tree {t} splits on feature {max} but model declares {n_features}"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn predict(&self, row: &[f64]) -> Result<f64, EnergyError> {
        if row.len() != self.n_features() {
            return Err(EnergyError::Prediction(format!(
                "expected {} features, got {}",
                self.n_features(),
                row.len()
            )));
        }
        let value = match self {
            Regressor::Linear { coefficients, intercept } => {
                intercept + coefficients.iter().zip(row).map(|(w, x)| w * x).sum::<f64>()
            }
            Regressor::TreeEnsemble { base_score, trees, .. } => {
                base_score + trees.iter().map(|t| t.evaluate(row)).sum::<f64>()
            }
        };
        if !value.is_finite() {
            return Err(EnergyError::Prediction("model produced a non-finite value".into()));
        }
        Ok(value)
    }
}

/// Per-feature standardisation: `(x - mean) / scale`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn from_file(path: &Path) -> Result<Self, ModelLoadError> {
        let scaler: StandardScaler = read_artifact(path)?;
        if scaler.mean.is_empty() || scaler.mean.len() != scaler.scale.len() {
            return Err(ModelLoadError::Shape(format!(
                "scaler mean/scale lengths differ ({} vs {})",
                scaler.mean.len(),
                scaler.scale.len()
            )));
        }
        Ok(scaler)
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, EnergyError> {
        if row.len() != self.n_features() {
            return Err(EnergyError::Prediction(format!(
                "scaler expects {} features, got {}",
                self.n_features(),
                row.len()
            )));
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            // zero variance columns pass through centred only
            .map(|(x, (m, s))| if *s == 0.0 { x - m } else { (x - m) / s })
            .collect())
    }
}

fn read_artifact<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ModelLoadError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ModelLoadError::Parse { path: display, source })
}
