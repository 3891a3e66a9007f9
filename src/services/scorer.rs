use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::error::{AppError, AppResult};

/// Capability of turning a numeric feature matrix into P(positive class)
#[cfg_attr(test, mockall::automock)]
pub trait Scorable: Send + Sync {
    /// One probability per input row, in input row order
    fn predict_probability(&self, matrix: &[Vec<f64>]) -> AppResult<Vec<f64>>;

    /// Row width the scorer was fitted on, when it is known
    fn n_features(&self) -> Option<usize> {
        None
    }
}

/// A fitted binary logistic regression
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        if coefficients.is_empty() {
            bail!("Model has no coefficients");
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            bail!("Model parameters must be finite");
        }

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    /// Loads `{"coefficients": [...], "intercept": ...}` from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let artifact: LogisticRegression = super::artifacts::read_json(path)
            .with_context(|| format!("Could not load model from {}", path.display()))?;
        let model = Self::new(artifact.coefficients, artifact.intercept)?;

        tracing::info!(
            path = %path.display(),
            features = model.coefficients.len(),
            "Model loaded"
        );
        Ok(model)
    }

    fn decision(&self, row: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Scorable for LogisticRegression {
    fn predict_probability(&self, matrix: &[Vec<f64>]) -> AppResult<Vec<f64>> {
        matrix
            .iter()
            .enumerate()
            .map(|(index, row)| {
                if row.len() != self.coefficients.len() {
                    return Err(AppError::Pipeline(format!(
                        "Row {} has {} features, model expects {}",
                        index,
                        row.len(),
                        self.coefficients.len()
                    )));
                }
                Ok(sigmoid(self.decision(row)))
            })
            .collect()
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }
}
