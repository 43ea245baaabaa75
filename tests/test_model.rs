//! Integration tests for model training and evaluation on pipeline output

use crisk::model::*;
use crisk::pipeline::*;
use ndarray::{Array1, Array2};

/// Generate a portfolio, split it, and preprocess both partitions into
/// training and evaluation matrices.
fn pipeline_matrices(
    rows: usize,
    seed: u64,
) -> (Array2<f64>, Array1<f64>, Array2<f64>, Array1<f64>) {
    let df = generate_applications(rows, seed).unwrap();
    let (train_df, test_df) = stratified_split(&df, TARGET_COLUMN, 0.25, seed).unwrap();

    let mut preprocessor = CreditRiskPreprocessor::new();
    let train_features = preprocessor.fit_transform(&train_df).unwrap();
    let test_features = preprocessor.transform(&test_df).unwrap();

    (
        dataframe_to_matrix(&train_features).unwrap(),
        target_vector(&train_df, TARGET_COLUMN).unwrap(),
        dataframe_to_matrix(&test_features).unwrap(),
        target_vector(&test_df, TARGET_COLUMN).unwrap(),
    )
}

#[test]
fn test_training_beats_chance_on_generated_portfolio() {
    let (x_train, y_train, x_test, y_test) = pipeline_matrices(400, 42);

    let mut model = LogisticRegression::new(TrainingConfig::default());
    model.fit(&x_train, &y_train).unwrap();

    let probabilities = model.predict_proba(&x_test).unwrap();
    let predictions = model.predict(&x_test).unwrap();

    assert!(probabilities.iter().all(|&p| (0.0..=1.0).contains(&p)));

    let test_accuracy = accuracy(&y_test, &predictions).unwrap();
    let test_auc = roc_auc(&y_test, &probabilities).unwrap();
    assert!(
        test_accuracy > 0.5,
        "expected better-than-chance accuracy, got {}",
        test_accuracy
    );
    assert!(test_auc > 0.6, "expected informative ranking, got AUC {}", test_auc);
}

#[test]
fn test_loss_drops_below_uninformed_baseline() {
    let (x_train, y_train, _, _) = pipeline_matrices(400, 42);

    let mut model = LogisticRegression::new(TrainingConfig::default());
    model.fit(&x_train, &y_train).unwrap();

    // All-zero weights predict 0.5 everywhere, which costs ln 2.
    assert!(model.final_loss().unwrap() < 0.69);
    assert!(model.iterations().unwrap() >= 1);
}

#[test]
fn test_coefficient_signs_follow_portfolio_story() {
    let (x_train, y_train, _, _) = pipeline_matrices(600, 7);

    let mut model = LogisticRegression::new(TrainingConfig::default());
    model.fit(&x_train, &y_train).unwrap();

    // Feature order is the preprocessor's, so Income, LoanAmount, and
    // CreditHistory come first. Larger loans raise default risk while a
    // longer credit history lowers it.
    let coefficients = model.coefficients().unwrap();
    assert!(
        coefficients[1] > 0.0,
        "LoanAmount weight was {}",
        coefficients[1]
    );
    assert!(
        coefficients[2] < 0.0,
        "CreditHistory weight was {}",
        coefficients[2]
    );
}

#[test]
fn test_training_is_deterministic() {
    let (x_train, y_train, _, _) = pipeline_matrices(300, 11);

    let mut first = LogisticRegression::new(TrainingConfig::default());
    first.fit(&x_train, &y_train).unwrap();
    let mut second = LogisticRegression::new(TrainingConfig::default());
    second.fit(&x_train, &y_train).unwrap();

    assert_eq!(first.coefficients().unwrap(), second.coefficients().unwrap());
    assert_eq!(first.intercept().unwrap(), second.intercept().unwrap());
    assert_eq!(first.iterations().unwrap(), second.iterations().unwrap());
}

#[test]
fn test_regularization_shrinks_pipeline_weights() {
    let (x_train, y_train, _, _) = pipeline_matrices(300, 5);

    let mut plain = LogisticRegression::new(TrainingConfig::default());
    plain.fit(&x_train, &y_train).unwrap();
    let mut ridged = LogisticRegression::new(TrainingConfig {
        l2_penalty: 50.0,
        ..TrainingConfig::default()
    });
    ridged.fit(&x_train, &y_train).unwrap();

    let plain_norm: f64 = plain.coefficients().unwrap().iter().map(|w| w * w).sum();
    let ridged_norm: f64 = ridged.coefficients().unwrap().iter().map(|w| w * w).sum();
    assert!(
        ridged_norm < plain_norm,
        "L2 norm did not shrink: {} vs {}",
        ridged_norm,
        plain_norm
    );
}

#[test]
fn test_feature_count_mismatch_at_predict() {
    let (x_train, y_train, _, _) = pipeline_matrices(200, 3);

    let mut model = LogisticRegression::new(TrainingConfig::default());
    model.fit(&x_train, &y_train).unwrap();

    let narrow = Array2::<f64>::zeros((4, 2));
    assert!(matches!(
        model.predict_proba(&narrow),
        Err(ModelError::InvalidInput(_))
    ));
}
