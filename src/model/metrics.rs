//! Evaluation metrics for the binary default classifier

use ndarray::Array1;

use crate::model::logistic::ModelError;

/// Counts of each prediction outcome at the 0.5 threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(targets: &Array1<f64>, predictions: &Array1<f64>) -> Self {
        let mut matrix = Self {
            true_positives: 0,
            true_negatives: 0,
            false_positives: 0,
            false_negatives: 0,
        };

        for (&target, &prediction) in targets.iter().zip(predictions.iter()) {
            match (target >= 0.5, prediction >= 0.5) {
                (true, true) => matrix.true_positives += 1,
                (false, false) => matrix.true_negatives += 1,
                (false, true) => matrix.false_positives += 1,
                (true, false) => matrix.false_negatives += 1,
            }
        }

        matrix
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Fraction of rows classified correctly.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.true_positives + self.true_negatives) as f64 / total as f64
    }
}

/// Fraction of correct labels at the 0.5 threshold.
pub fn accuracy(targets: &Array1<f64>, predictions: &Array1<f64>) -> Result<f64, ModelError> {
    if targets.is_empty() {
        return Err(ModelError::InvalidInput(
            "cannot compute accuracy of an empty prediction set".to_string(),
        ));
    }
    if targets.len() != predictions.len() {
        return Err(ModelError::InvalidInput(format!(
            "target count {} does not match prediction count {}",
            targets.len(),
            predictions.len()
        )));
    }

    Ok(ConfusionMatrix::from_predictions(targets, predictions).accuracy())
}

/// Area under the ROC curve from predicted probabilities.
///
/// Rows sharing a score are consumed as one tie group before the trapezoid
/// step, so tied scores contribute diagonal segments instead of inflating
/// the curve. Requires both classes to be present.
pub fn roc_auc(targets: &Array1<f64>, scores: &Array1<f64>) -> Result<f64, ModelError> {
    if targets.len() != scores.len() {
        return Err(ModelError::InvalidInput(format!(
            "target count {} does not match score count {}",
            targets.len(),
            scores.len()
        )));
    }

    let mut pairs: Vec<(f64, bool)> = scores
        .iter()
        .zip(targets.iter())
        .map(|(&score, &target)| (score, target >= 0.5))
        .collect();
    pairs.sort_by(|a, b| b.0.total_cmp(&a.0));

    let n_positive = pairs.iter().filter(|(_, positive)| *positive).count();
    let n_negative = pairs.len() - n_positive;
    if n_positive == 0 || n_negative == 0 {
        return Err(ModelError::InvalidInput(
            "ROC AUC needs both classes in the evaluation set".to_string(),
        ));
    }

    let mut auc = 0.0;
    let mut true_positives = 0.0;
    let mut false_positives = 0.0;
    let mut prev_tp = 0.0;
    let mut prev_fp = 0.0;

    let mut i = 0;
    while i < pairs.len() {
        let score = pairs[i].0;
        while i < pairs.len() && pairs[i].0 == score {
            if pairs[i].1 {
                true_positives += 1.0;
            } else {
                false_positives += 1.0;
            }
            i += 1;
        }

        auc += (false_positives - prev_fp) * (true_positives + prev_tp) / 2.0;
        prev_tp = true_positives;
        prev_fp = false_positives;
    }

    Ok(auc / (n_positive as f64 * n_negative as f64))
}
