//! Logistic regression trained by batch gradient descent
//!
//! The trainer consumes the preprocessor's standardized feature matrix, so
//! plain full-batch gradient descent with a fixed learning rate converges
//! quickly and no external solver is required.

use ndarray::{Array1, Array2};
use polars::prelude::*;
use thiserror::Error;

/// Errors produced by model training, prediction, and evaluation
#[derive(Debug, Error)]
pub enum ModelError {
    /// A fitted-state operation was invoked before `fit`.
    #[error("model is not fitted; call fit on training data first")]
    NotFitted,

    /// Input shapes or values are unusable for training/prediction.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An underlying polars operation failed.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Gradient-descent hyperparameters
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub max_iterations: usize,
    /// Stop early once the log-loss improvement drops below this value.
    pub tolerance: f64,
    /// L2 penalty strength; 0 disables it. The intercept is never penalized.
    pub l2_penalty: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iterations: 1000,
            tolerance: 1e-6,
            l2_penalty: 0.0,
        }
    }
}

/// Parameters produced by a completed training run.
#[derive(Debug, Clone)]
struct FittedModel {
    weights: Array1<f64>,
    intercept: f64,
    iterations: usize,
    final_loss: f64,
}

/// The two-state model lifecycle; fitted parameters only exist inside the
/// `Fitted` variant.
#[derive(Debug, Clone, Default)]
enum ModelState {
    #[default]
    Unfit,
    Fitted(FittedModel),
}

/// Binary logistic regression classifier
#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    config: TrainingConfig,
    state: ModelState,
}

impl LogisticRegression {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            state: ModelState::Unfit,
        }
    }

    /// Whether `fit` has completed successfully.
    pub fn is_fitted(&self) -> bool {
        matches!(self.state, ModelState::Fitted(_))
    }

    /// Train on a feature matrix and 0/1 target vector.
    ///
    /// Weights and intercept start at zero and follow the full-batch
    /// gradient of the mean log-loss. Training stops at `max_iterations`
    /// or as soon as the loss improves by less than `tolerance` between
    /// consecutive iterations. Re-fitting discards the previous parameters.
    pub fn fit(
        &mut self,
        features: &Array2<f64>,
        targets: &Array1<f64>,
    ) -> Result<(), ModelError> {
        let (n_rows, n_features) = features.dim();
        if n_rows == 0 || n_features == 0 {
            return Err(ModelError::InvalidInput(
                "training matrix must have at least one row and one column".to_string(),
            ));
        }
        if targets.len() != n_rows {
            return Err(ModelError::InvalidInput(format!(
                "feature matrix has {} rows but target vector has {}",
                n_rows,
                targets.len()
            )));
        }
        if targets.iter().any(|&y| y != 0.0 && y != 1.0) {
            return Err(ModelError::InvalidInput(
                "targets must contain only 0 and 1".to_string(),
            ));
        }

        let n = n_rows as f64;
        let mut weights = Array1::<f64>::zeros(n_features);
        let mut intercept = 0.0;
        let mut previous_loss = f64::INFINITY;
        let mut iterations = 0;
        let mut final_loss = previous_loss;

        for iteration in 0..self.config.max_iterations {
            let linear = features.dot(&weights) + intercept;
            let predictions = linear.mapv(sigmoid);
            let errors = &predictions - targets;

            let mut weight_grad = features.t().dot(&errors) / n;
            if self.config.l2_penalty > 0.0 {
                weight_grad = &weight_grad + &(&weights * (self.config.l2_penalty / n));
            }
            let intercept_grad = errors.sum() / n;

            weights = &weights - &(&weight_grad * self.config.learning_rate);
            intercept -= self.config.learning_rate * intercept_grad;

            let loss = log_loss(targets, &predictions);
            iterations = iteration + 1;
            final_loss = loss;

            if (previous_loss - loss).abs() < self.config.tolerance {
                break;
            }
            previous_loss = loss;
        }

        self.state = ModelState::Fitted(FittedModel {
            weights,
            intercept,
            iterations,
            final_loss,
        });
        Ok(())
    }

    /// Predicted default probabilities, one per input row.
    pub fn predict_proba(&self, features: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let fitted = self.fitted()?;
        if features.ncols() != fitted.weights.len() {
            return Err(ModelError::InvalidInput(format!(
                "model was fitted on {} features but input has {}",
                fitted.weights.len(),
                features.ncols()
            )));
        }

        let linear = features.dot(&fitted.weights) + fitted.intercept;
        Ok(linear.mapv(sigmoid))
    }

    /// Predicted class labels at the 0.5 probability threshold.
    pub fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let probabilities = self.predict_proba(features)?;
        Ok(probabilities.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    /// Fitted feature weights, aligned with the training column order.
    pub fn coefficients(&self) -> Result<&Array1<f64>, ModelError> {
        Ok(&self.fitted()?.weights)
    }

    pub fn intercept(&self) -> Result<f64, ModelError> {
        Ok(self.fitted()?.intercept)
    }

    /// Gradient-descent iterations actually run.
    pub fn iterations(&self) -> Result<usize, ModelError> {
        Ok(self.fitted()?.iterations)
    }

    /// Mean log-loss on the training data at the final iteration.
    pub fn final_loss(&self) -> Result<f64, ModelError> {
        Ok(self.fitted()?.final_loss)
    }

    fn fitted(&self) -> Result<&FittedModel, ModelError> {
        match &self.state {
            ModelState::Fitted(fitted) => Ok(fitted),
            ModelState::Unfit => Err(ModelError::NotFitted),
        }
    }
}

/// Numerically stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let exp_z = z.exp();
        exp_z / (1.0 + exp_z)
    }
}

/// Mean binary cross-entropy with clamped probabilities.
fn log_loss(targets: &Array1<f64>, predictions: &Array1<f64>) -> f64 {
    let eps = 1e-15;
    let n = targets.len() as f64;

    -targets
        .iter()
        .zip(predictions.iter())
        .map(|(&y, &p)| {
            let p_clamped = p.clamp(eps, 1.0 - eps);
            y * p_clamped.ln() + (1.0 - y) * (1.0 - p_clamped).ln()
        })
        .sum::<f64>()
        / n
}

/// Convert a fully numeric table into a dense row-major matrix, preserving
/// column order. Nulls become 0.0, which on preprocessor output is the
/// column mean.
pub fn dataframe_to_matrix(df: &DataFrame) -> Result<Array2<f64>, ModelError> {
    let n_rows = df.height();
    let n_cols = df.width();

    let mut column_values: Vec<Vec<f64>> = Vec::with_capacity(n_cols);
    for column in df.get_columns() {
        let float_col = column.cast(&DataType::Float64)?;
        let ca = float_col.f64()?;
        column_values.push(ca.iter().map(|v| v.unwrap_or(0.0)).collect());
    }

    Ok(Array2::from_shape_fn((n_rows, n_cols), |(row, col)| {
        column_values[col][row]
    }))
}

/// Extract a target column as a float vector.
pub fn target_vector(df: &DataFrame, target: &str) -> Result<Array1<f64>, ModelError> {
    let column = df
        .column(target)
        .map_err(|_| ModelError::InvalidInput(format!("target column '{}' not found", target)))?;
    let float_col = column.cast(&DataType::Float64)?;
    let ca = float_col.f64()?;

    Ok(Array1::from(
        ca.iter().map(|v| v.unwrap_or(0.0)).collect::<Vec<f64>>(),
    ))
}
