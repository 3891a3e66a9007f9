use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    services::features::{FeatureRow, CATEGORICAL_COLUMNS},
};

/// Capability of turning categorical columns into numbers
///
/// Implementations are fitted ahead of time and stateless at inference.
#[cfg_attr(test, mockall::automock)]
pub trait Encodable: Send + Sync {
    /// Encodes the categorical part of each row, one output row per input row
    ///
    /// Fails with [`AppError::UnknownCategory`] on a value outside the
    /// fitted vocabulary.
    fn transform(&self, rows: &[FeatureRow]) -> AppResult<Vec<Vec<f64>>>;

    /// Number of values produced per row
    fn output_width(&self) -> usize;
}

/// On-disk form of a fitted one-hot encoder
#[derive(Debug, Deserialize)]
struct EncoderArtifact {
    columns: Vec<String>,
    categories: Vec<Vec<String>>,
}

/// One-hot encoder over a fixed vocabulary per categorical column
///
/// Unknown values are an error rather than an all-zero block.
#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    vocabularies: Vec<HashMap<String, usize>>,
    offsets: Vec<usize>,
    width: usize,
}

impl OneHotEncoder {
    /// Builds an encoder from the fitted categories of each column, in
    /// [`CATEGORICAL_COLUMNS`] order
    pub fn new(categories: Vec<Vec<String>>) -> Result<Self> {
        if categories.len() != CATEGORICAL_COLUMNS.len() {
            bail!(
                "Encoder has {} category lists, expected {}",
                categories.len(),
                CATEGORICAL_COLUMNS.len()
            );
        }

        let mut vocabularies = Vec::with_capacity(categories.len());
        let mut offsets = Vec::with_capacity(categories.len());
        let mut width = 0;

        for (column, values) in CATEGORICAL_COLUMNS.iter().zip(categories) {
            if values.is_empty() {
                bail!("Encoder has no categories for column {}", column);
            }

            let mut vocabulary = HashMap::with_capacity(values.len());
            for (position, value) in values.into_iter().enumerate() {
                if vocabulary.insert(value.clone(), position).is_some() {
                    bail!("Duplicate category '{}' for column {}", value, column);
                }
            }

            offsets.push(width);
            width += vocabulary.len();
            vocabularies.push(vocabulary);
        }

        Ok(Self {
            vocabularies,
            offsets,
            width,
        })
    }

    /// Loads a fitted encoder artifact
    ///
    /// The artifact's column list must match [`CATEGORICAL_COLUMNS`] exactly.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let artifact: EncoderArtifact = super::artifacts::read_json(path)
            .with_context(|| format!("Could not load encoder from {}", path.display()))?;

        if artifact.columns != CATEGORICAL_COLUMNS {
            bail!(
                "Encoder was fitted on columns {:?}, expected {:?}",
                artifact.columns,
                CATEGORICAL_COLUMNS
            );
        }

        let encoder = Self::new(artifact.categories)?;
        tracing::info!(path = %path.display(), width = encoder.width, "Encoder loaded");
        Ok(encoder)
    }
}

impl Encodable for OneHotEncoder {
    fn transform(&self, rows: &[FeatureRow]) -> AppResult<Vec<Vec<f64>>> {
        rows.iter()
            .map(|row| {
                let mut encoded = vec![0.0; self.width];
                for (column, value) in row.categorical.iter().enumerate() {
                    let position = self.vocabularies[column].get(value).ok_or_else(|| {
                        AppError::UnknownCategory {
                            column: CATEGORICAL_COLUMNS[column].to_string(),
                            value: value.clone(),
                        }
                    })?;
                    encoded[self.offsets[column] + position] = 1.0;
                }
                Ok(encoded)
            })
            .collect()
    }

    fn output_width(&self) -> usize {
        self.width
    }
}
