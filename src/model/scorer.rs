//! Batch scoring of raw application tables from an exported model artifact
//!
//! The scorer replays the training-time preprocessing from the artifact's
//! scaling parameters and named coefficients, so a raw table scores to the
//! same probabilities the pipeline would produce. Feature weights are looked
//! up by name; a name with no coefficient contributes nothing, which covers
//! category levels the model never saw.

use std::fmt;

use polars::prelude::*;

use crate::model::logistic::{sigmoid, ModelError};
use crate::pipeline::schema::{CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};
use crate::report::ModelArtifact;

/// Scores raw applications using exported model parameters.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    intercept: f64,
    coefficients: std::collections::BTreeMap<String, f64>,
    means: std::collections::BTreeMap<String, f64>,
    stds: std::collections::BTreeMap<String, f64>,
}

impl RiskScorer {
    pub fn from_artifact(artifact: &ModelArtifact) -> Self {
        Self {
            intercept: artifact.intercept,
            coefficients: artifact.coefficients.clone(),
            means: artifact.scaling_params.means.clone(),
            stds: artifact.scaling_params.stds.clone(),
        }
    }

    /// Default probability for every row of a raw application table.
    ///
    /// Numeric columns are standardized with the artifact's fit-time mean
    /// and std before their weight applies; a null numeric value sits on
    /// the column mean and contributes nothing. Categorical values map to
    /// the `column_label` coefficient, with unknown labels and nulls
    /// contributing nothing.
    pub fn score(&self, df: &DataFrame) -> Result<Vec<f64>, ModelError> {
        let mut linear = vec![self.intercept; df.height()];

        for column in NUMERIC_COLUMNS {
            let mean = self.lookup_scaling(&self.means, column, "mean")?;
            let std = self.lookup_scaling(&self.stds, column, "std")?;
            if std == 0.0 {
                return Err(ModelError::InvalidInput(format!(
                    "artifact std for column '{}' is zero",
                    column
                )));
            }
            let weight = self.coefficients.get(column).copied().unwrap_or(0.0);

            let values = df
                .column(column)
                .map_err(|_| missing_column(column))?
                .cast(&DataType::Float64)?;
            for (z, value) in linear.iter_mut().zip(values.f64()?.iter()) {
                if let Some(value) = value {
                    *z += weight * (value - mean) / std;
                }
            }
        }

        for column in CATEGORICAL_COLUMNS {
            let labels = df
                .column(column)
                .map_err(|_| missing_column(column))?
                .cast(&DataType::String)?;
            for (z, label) in linear.iter_mut().zip(labels.str()?.iter()) {
                if let Some(label) = label {
                    let feature = format!("{}_{}", column, label);
                    if let Some(weight) = self.coefficients.get(&feature) {
                        *z += weight;
                    }
                }
            }
        }

        Ok(linear.into_iter().map(sigmoid).collect())
    }

    fn lookup_scaling(
        &self,
        params: &std::collections::BTreeMap<String, f64>,
        column: &str,
        kind: &str,
    ) -> Result<f64, ModelError> {
        params.get(column).copied().ok_or_else(|| {
            ModelError::InvalidInput(format!(
                "artifact has no {} for numeric column '{}'",
                kind, column
            ))
        })
    }
}

fn missing_column(column: &str) -> ModelError {
    ModelError::InvalidInput(format!("scoring input is missing column '{}'", column))
}

/// Probability bucket used when presenting scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// Band boundaries: below 0.2 is low, below 0.5 is medium, the rest
    /// is high.
    pub fn from_probability(probability: f64) -> Self {
        if probability < 0.2 {
            Self::Low
        } else if probability < 0.5 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
