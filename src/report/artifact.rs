//! Model artifact export and loading
//!
//! The artifact is the JSON contract between training and scoring: named
//! coefficients, the fit-time scaling parameters needed to reproduce the
//! preprocessing, and held-out performance. Coefficient names follow the
//! preprocessor's feature names, so `WorkExperience_5+ years` is the weight
//! of that indicator column.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::pipeline::ColumnScaling;

/// Fit-time standardization parameters, keyed by numeric column name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingParams {
    pub means: BTreeMap<String, f64>,
    pub stds: BTreeMap<String, f64>,
}

/// Held-out evaluation results stored alongside the coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub accuracy: f64,
    pub roc_auc: f64,
}

/// Optional provenance block describing the training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Export timestamp (ISO 8601 format)
    pub timestamp: String,
    /// Crisk version that produced the artifact
    pub crisk_version: String,
    /// Rows in the training partition
    pub training_rows: usize,
    /// Rows in the held-out partition
    pub test_rows: usize,
}

/// Everything a scorer needs to reproduce the trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub intercept: f64,
    /// Feature weights keyed by preprocessor feature name
    pub coefficients: BTreeMap<String, f64>,
    pub scaling_params: ScalingParams,
    pub performance: Performance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ArtifactMetadata>,
}

impl ModelArtifact {
    /// Assemble an artifact from fitted model and preprocessor state.
    ///
    /// `feature_names` and `weights` must be positionally aligned; the
    /// pairing is what turns the weight vector into named coefficients.
    pub fn from_training(
        feature_names: &[String],
        weights: &Array1<f64>,
        intercept: f64,
        scaling: &[ColumnScaling],
        performance: Performance,
    ) -> Result<Self> {
        if feature_names.len() != weights.len() {
            bail!(
                "feature name count {} does not match weight count {}",
                feature_names.len(),
                weights.len()
            );
        }

        let coefficients: BTreeMap<String, f64> = feature_names
            .iter()
            .cloned()
            .zip(weights.iter().copied())
            .collect();

        let mut means = BTreeMap::new();
        let mut stds = BTreeMap::new();
        for params in scaling {
            means.insert(params.column.clone(), params.mean);
            stds.insert(params.column.clone(), params.std);
        }

        Ok(Self {
            intercept,
            coefficients,
            scaling_params: ScalingParams { means, stds },
            performance,
            metadata: None,
        })
    }

    /// Attach a provenance block with the current timestamp and version.
    pub fn with_metadata(mut self, training_rows: usize, test_rows: usize) -> Self {
        self.metadata = Some(ArtifactMetadata {
            timestamp: Utc::now().to_rfc3339(),
            crisk_version: env!("CARGO_PKG_VERSION").to_string(),
            training_rows,
            test_rows,
        });
        self
    }
}

/// Write an artifact as pretty-printed JSON, creating parent directories
/// as needed.
pub fn export_artifact(artifact: &ModelArtifact, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory {}", parent.display())
            })?;
        }
    }

    let json = serde_json::to_string_pretty(artifact)
        .context("Failed to serialize model artifact to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write model artifact to {}", output_path.display()))?;

    Ok(())
}

/// Read an artifact back from disk.
pub fn load_artifact(path: &Path) -> Result<ModelArtifact> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model artifact from {}", path.display()))?;

    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse model artifact in {}", path.display()))
}
