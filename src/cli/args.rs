//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::model::TrainingConfig;

/// Crisk - Train and apply a credit risk scoring model
#[derive(Parser, Debug)]
#[command(name = "crisk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file of loan applications (CSV or Parquet).
    /// When omitted, a synthetic portfolio is generated instead.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Number of synthetic applications to generate when no input is given
    #[arg(long, default_value = "1000")]
    pub rows: usize,

    /// Seed for synthetic data generation and the train/test shuffle
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Fraction of rows held out for evaluation.
    /// Must be strictly between 0 and 1; the split is stratified by target class.
    #[arg(long, default_value = "0.2", value_parser = validate_test_fraction)]
    pub test_fraction: f64,

    /// Gradient descent learning rate
    #[arg(long, default_value = "0.1")]
    pub learning_rate: f64,

    /// Maximum gradient descent iterations
    #[arg(long, default_value = "1000")]
    pub max_iterations: usize,

    /// Stop training early once the log-loss improvement between iterations
    /// drops below this value
    #[arg(long, default_value = "1e-6")]
    pub tolerance: f64,

    /// L2 penalty strength for training. 0 disables regularization;
    /// the intercept is never penalized.
    #[arg(long, default_value = "0.0")]
    pub l2: f64,

    /// Output path for the exported model artifact (JSON)
    #[arg(short, long, default_value = "models/model_coefficients.json")]
    pub output: PathBuf,

    /// Number of rows to use for schema inference (CSV only).
    /// Higher values improve type detection for ambiguous columns but may be slower.
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Suppress the banner, configuration card, and summary table
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a table of applications with an exported model artifact
    Score {
        /// Input file of applications to score (CSV or Parquet)
        input: PathBuf,

        /// Path to the model artifact JSON
        #[arg(short, long, default_value = "models/model_coefficients.json")]
        model: PathBuf,

        /// Output file for the scored table (CSV or Parquet, determined by extension).
        /// When omitted, scores are only printed.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of rows to use for schema inference (CSV only).
        /// Use 0 for full table scan (very slow for large files).
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,

        /// Maximum number of scored rows to print
        #[arg(long, default_value = "20")]
        display_limit: usize,
    },
}

impl Cli {
    /// Assemble gradient-descent hyperparameters from the parsed flags.
    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            learning_rate: self.learning_rate,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            l2_penalty: self.l2,
        }
    }
}

/// Validator for test_fraction parameter
fn validate_test_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value <= 0.0 || value >= 1.0 {
        Err(format!(
            "test_fraction must be strictly between 0.0 and 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
