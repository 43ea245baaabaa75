//! End-to-end integration tests for the training pipeline

use crisk::model::*;
use crisk::pipeline::*;
use crisk::report::*;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_full_training_run_exports_working_artifact() {
    let df = generate_applications(300, 42).unwrap();
    let (train_df, test_df) = stratified_split(&df, TARGET_COLUMN, 0.2, 42).unwrap();
    assert_eq!(train_df.height() + test_df.height(), 300);

    let mut preprocessor = CreditRiskPreprocessor::new();
    let train_features = preprocessor.fit_transform(&train_df).unwrap();
    let test_features = preprocessor.transform(&test_df).unwrap();

    // Three standardized numerics plus two three-level indicator blocks.
    assert_eq!(train_features.width(), 9);
    assert_eq!(test_features.width(), 9);

    let x_train = dataframe_to_matrix(&train_features).unwrap();
    let y_train = target_vector(&train_df, TARGET_COLUMN).unwrap();
    let mut model = LogisticRegression::new(TrainingConfig::default());
    model.fit(&x_train, &y_train).unwrap();

    let x_test = dataframe_to_matrix(&test_features).unwrap();
    let y_test = target_vector(&test_df, TARGET_COLUMN).unwrap();
    let probabilities = model.predict_proba(&x_test).unwrap();
    let predictions = model.predict(&x_test).unwrap();
    let performance = Performance {
        accuracy: accuracy(&y_test, &predictions).unwrap(),
        roc_auc: roc_auc(&y_test, &probabilities).unwrap(),
    };

    let artifact = ModelArtifact::from_training(
        preprocessor.feature_names().unwrap(),
        model.coefficients().unwrap(),
        model.intercept().unwrap(),
        preprocessor.get_scaling_params().unwrap(),
        performance,
    )
    .unwrap()
    .with_metadata(train_df.height(), test_df.height());

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("models").join("model_coefficients.json");
    export_artifact(&artifact, &path).unwrap();

    // The exported file round-trips and scores raw applications.
    let loaded = load_artifact(&path).unwrap();
    assert_eq!(loaded, artifact);

    let scorer = RiskScorer::from_artifact(&loaded);
    let scores = scorer.score(&test_df).unwrap();
    assert_eq!(scores.len(), test_df.height());
    assert!(scores.iter().all(|&p| (0.0..=1.0).contains(&p)));
}

#[test]
fn test_csv_and_parquet_loading_agree() {
    let mut df = create_full_applications();

    let (_csv_dir, csv_path) = create_temp_csv(&mut df.clone());
    let (_parquet_dir, parquet_path) = create_temp_parquet(&mut df);

    let (df_csv, rows_csv, cols_csv, _) = load_applications(&csv_path, 100).unwrap();
    let (df_parquet, rows_parquet, cols_parquet, _) =
        load_applications(&parquet_path, 100).unwrap();

    assert_eq!(rows_csv, rows_parquet);
    assert_eq!(cols_csv, cols_parquet);
    assert_eq!(df_csv.get_column_names(), df_parquet.get_column_names());
    assert!(df_csv.equals(&df_parquet));
}

#[test]
fn test_loader_rejects_unknown_extension() {
    let err = load_applications(std::path::Path::new("applications.txt"), 100).unwrap_err();
    assert!(err.to_string().contains("Unsupported file format"));
}

#[test]
fn test_save_table_roundtrips_both_formats() {
    let df = create_full_applications();
    let temp_dir = TempDir::new().unwrap();

    for name in ["out.csv", "out.parquet"] {
        let path = temp_dir.path().join(name);
        save_table(&mut df.clone(), &path).unwrap();

        let (loaded, rows, cols, _) = load_applications(&path, 100).unwrap();
        assert_eq!(rows, df.height());
        assert_eq!(cols, df.width());
        assert!(loaded.equals(&df), "roundtrip through {} changed the table", name);
    }
}

#[test]
fn test_save_table_rejects_unknown_extension() {
    let mut df = create_full_applications();
    let temp_dir = TempDir::new().unwrap();

    let err = save_table(&mut df, &temp_dir.path().join("out.xlsx")).unwrap_err();
    assert!(err.to_string().contains("Unsupported output format"));
}

#[test]
fn test_stratified_split_on_loaded_table() {
    let mut df = create_full_applications();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);
    let (df, _, _, _) = load_applications(&csv_path, 100).unwrap();

    // Six defaults and six non-defaults; a third of each class is held out.
    let (train_df, test_df) = stratified_split(&df, TARGET_COLUMN, 1.0 / 3.0, 42).unwrap();
    assert_shape(&train_df, 8, 6);
    assert_shape(&test_df, 4, 6);
    assert_close(default_rate(&train_df, TARGET_COLUMN).unwrap(), 0.5, 1e-12);
    assert_close(default_rate(&test_df, TARGET_COLUMN).unwrap(), 0.5, 1e-12);
    assert_has_columns(&test_df, &["Income", "Default"]);
}

#[test]
fn test_preprocessor_on_loaded_csv() {
    let mut df = create_minimal_applications();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);
    let (df, _, _, _) = load_applications(&csv_path, 100).unwrap();

    let mut preprocessor = CreditRiskPreprocessor::new();
    let features = preprocessor.fit_transform(&df).unwrap();

    assert_shape(&features, 2, 7);
    assert_close(cell_f64(&features, "Income", 1), 0.707_106_781_186_547_5, 1e-9);
}
