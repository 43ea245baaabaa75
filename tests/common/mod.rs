//! Shared test utilities and fixture generators

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Two applications with hand-checkable statistics.
///
/// Income has mean 60000 and sample std 14142.14, LoanAmount 120000 and
/// 28284.27, CreditHistory 10 and 7.07, so every numeric column
/// standardizes to -0.7071 / 0.7071. The category levels cover two of the
/// three WorkExperience values and two of the three HomeOwnership values.
pub fn create_minimal_applications() -> DataFrame {
    df! {
        "Income" => [50_000.0f64, 70_000.0],
        "LoanAmount" => [100_000.0f64, 140_000.0],
        "CreditHistory" => [5.0f64, 15.0],
        "WorkExperience" => ["0-2 years", "5+ years"],
        "HomeOwnership" => ["Rent", "Own"],
    }
    .unwrap()
}

/// Twelve applications covering every category level, with six defaults
/// and six non-defaults so stratified splitting has room on both sides.
pub fn create_full_applications() -> DataFrame {
    df! {
        "Income" => [42_000.0f64, 55_000.0, 61_000.0, 48_000.0, 75_000.0, 83_000.0,
                     39_000.0, 67_000.0, 52_000.0, 91_000.0, 58_000.0, 71_000.0],
        "LoanAmount" => [120_000.0f64, 90_000.0, 150_000.0, 200_000.0, 110_000.0, 95_000.0,
                         175_000.0, 130_000.0, 160_000.0, 105_000.0, 140_000.0, 125_000.0],
        "CreditHistory" => [2.0f64, 7.0, 12.0, 1.0, 18.0, 24.0, 3.0, 9.0, 6.0, 27.0, 11.0, 15.0],
        "WorkExperience" => ["0-2 years", "2-5 years", "5+ years", "0-2 years", "5+ years", "5+ years",
                             "0-2 years", "2-5 years", "2-5 years", "5+ years", "0-2 years", "5+ years"],
        "HomeOwnership" => ["Rent", "Mortgage", "Own", "Rent", "Own", "Own",
                            "Rent", "Mortgage", "Rent", "Own", "Mortgage", "Own"],
        "Default" => [1i64, 1, 0, 1, 0, 0, 1, 0, 1, 0, 1, 0],
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("applications.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("applications.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(
        rows, expected_rows,
        "Row count mismatch: expected {}, got {}",
        expected_rows, rows
    );
    assert_eq!(
        cols, expected_cols,
        "Column count mismatch: expected {}, got {}",
        expected_cols, cols
    );
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Assert two floats agree within a tolerance
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "Value {} not within {} of expected {}",
        actual,
        tolerance,
        expected
    );
}

/// Read one f64 cell out of a DataFrame
pub fn cell_f64(df: &DataFrame, column: &str, row: usize) -> f64 {
    df.column(column)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .get(row)
        .unwrap()
}
