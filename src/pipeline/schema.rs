//! Application table schema - column names and category labels

use polars::prelude::*;

/// Numeric feature columns, in the order they appear in the processed table.
pub const NUMERIC_COLUMNS: [&str; 3] = ["Income", "LoanAmount", "CreditHistory"];

/// Categorical feature columns, in the order their indicator blocks appear
/// in the processed table.
pub const CATEGORICAL_COLUMNS: [&str; 2] = ["WorkExperience", "HomeOwnership"];

/// Binary target column: 1 when the applicant defaulted.
pub const TARGET_COLUMN: &str = "Default";

/// Work-experience buckets produced by the synthetic generator.
pub const WORK_EXPERIENCE_LABELS: [&str; 3] = ["0-2 years", "2-5 years", "5+ years"];

/// Home-ownership labels produced by the synthetic generator.
pub const HOME_OWNERSHIP_LABELS: [&str; 3] = ["Rent", "Mortgage", "Own"];

/// All feature columns (numeric then categorical), excluding the target.
pub fn feature_columns() -> Vec<&'static str> {
    NUMERIC_COLUMNS
        .iter()
        .chain(CATEGORICAL_COLUMNS.iter())
        .copied()
        .collect()
}

/// Names of required feature columns absent from the table, in schema order.
pub fn missing_feature_columns(df: &DataFrame) -> Vec<String> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    feature_columns()
        .into_iter()
        .filter(|name| !present.iter().any(|p| p == name))
        .map(|name| name.to_string())
        .collect()
}
