//! Fit/transform preprocessing for credit application tables
//!
//! Converts a raw application table (mixed numeric and categorical columns)
//! into a purely numeric feature table for the linear model: numeric columns
//! are standardized with statistics learned from the training rows, and
//! categorical columns are expanded into one indicator column per observed
//! category. The statistics captured at fit time are reused verbatim for
//! every later `transform` call, so the encoding applied at scoring time is
//! exactly the encoding the model was trained on.

use polars::prelude::*;
use rayon::prelude::*;
use thiserror::Error;

use super::schema::{missing_feature_columns, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};

/// Errors produced by preprocessing operations
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// A required feature column is absent from the input table.
    #[error("missing required column '{0}' in input table")]
    MissingColumn(String),

    /// A fitted-state operation was invoked before `fit_transform`.
    #[error("preprocessor is not fitted; call fit_transform on training data first")]
    NotFitted,

    /// A numeric column has no variance, so standardization would divide by zero.
    #[error("numeric column '{0}' has zero variance and cannot be standardized")]
    DegenerateColumn(String),

    /// An underlying polars operation failed.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Standardization statistics for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnScaling {
    pub column: String,
    pub mean: f64,
    pub std: f64,
}

/// Statistics captured by a successful fit.
#[derive(Debug, Clone)]
struct FittedStats {
    /// Per numeric column, in schema order.
    scaling: Vec<ColumnScaling>,
    /// Per categorical column, the lexicographically sorted categories
    /// observed during fit.
    categories: Vec<(String, Vec<String>)>,
    /// Ordered output column names; positional contract with the model.
    feature_names: Vec<String>,
}

/// The two-state preprocessor lifecycle. All fitted statistics live inside
/// the `Fitted` variant, so an unfitted instance cannot hold stale state.
#[derive(Debug, Clone, Default)]
enum FitState {
    #[default]
    Unfit,
    Fitted(FittedStats),
}

/// Learns and applies a deterministic numeric encoding for application
/// tables.
///
/// The preprocessor starts unfitted. `fit_transform` computes per-column
/// statistics from a training table, encodes that table, and stores the
/// statistics; `transform` then applies the stored statistics to any later
/// batch. Re-fitting is allowed and discards all prior state.
#[derive(Debug, Clone, Default)]
pub struct CreditRiskPreprocessor {
    state: FitState,
}

impl CreditRiskPreprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `fit_transform` has completed successfully.
    pub fn is_fitted(&self) -> bool {
        matches!(self.state, FitState::Fitted(_))
    }

    /// Fit the preprocessor on a training table and return its encoding.
    ///
    /// # Arguments
    /// * `df` - Training table containing at least the schema's numeric and
    ///   categorical feature columns. Columns outside the schema (such as
    ///   the target) are ignored.
    ///
    /// # Behavior
    /// - Computes mean and standard deviation (sample std, ddof = 1) per
    ///   numeric column and standardizes it as `(x - mean) / std`.
    /// - Enumerates the distinct categories observed per categorical column
    ///   in lexicographic order and emits one `{column}_{category}`
    ///   indicator column per category. The sorted order is part of the
    ///   output contract: it fixes indicator column positions regardless of
    ///   input row order.
    /// - Output columns are the standardized numeric columns in schema
    ///   order followed by the indicator blocks in schema order; this
    ///   ordered list becomes the feature name list.
    ///
    /// # Errors
    /// * `MissingColumn` - a required feature column is absent
    /// * `DegenerateColumn` - a numeric column has zero variance (or fewer
    ///   than two non-null values, which leaves the std undefined)
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame, PreprocessError> {
        check_schema(df)?;

        let scaling = NUMERIC_COLUMNS
            .iter()
            .map(|&name| {
                let values = numeric_values(df, name)?;
                column_scaling(name, &values)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let categories = CATEGORICAL_COLUMNS
            .iter()
            .map(|&name| Ok((name.to_string(), distinct_categories(df, name)?)))
            .collect::<Result<Vec<_>, PreprocessError>>()?;

        let mut feature_names: Vec<String> =
            scaling.iter().map(|s| s.column.clone()).collect();
        for (column, observed) in &categories {
            for category in observed {
                feature_names.push(format!("{}_{}", column, category));
            }
        }

        let fitted = FittedStats {
            scaling,
            categories,
            feature_names,
        };
        let encoded = encode(df, &fitted)?;
        self.state = FitState::Fitted(fitted);
        Ok(encoded)
    }

    /// Encode a table using the statistics stored at fit time.
    ///
    /// The output contains exactly the feature name list columns, in fit
    /// order, regardless of which categories appear in this batch:
    /// categories never seen at fit time contribute nothing (their rows get
    /// all-zero indicators), and fit-time categories absent from the batch
    /// produce all-zero columns. Unknown categories are deliberately not an
    /// error, so scoring tolerates category drift.
    ///
    /// # Errors
    /// * `NotFitted` - `fit_transform` has not been called
    /// * `MissingColumn` - a required feature column is absent
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame, PreprocessError> {
        let fitted = self.fitted()?;
        check_schema(df)?;
        encode(df, fitted)
    }

    /// The stored per-numeric-column scaling statistics, in the order the
    /// numeric columns appear in the feature name list.
    pub fn get_scaling_params(&self) -> Result<&[ColumnScaling], PreprocessError> {
        Ok(&self.fitted()?.scaling)
    }

    /// The ordered output column names established at fit time.
    pub fn feature_names(&self) -> Result<&[String], PreprocessError> {
        Ok(&self.fitted()?.feature_names)
    }

    fn fitted(&self) -> Result<&FittedStats, PreprocessError> {
        match &self.state {
            FitState::Fitted(stats) => Ok(stats),
            FitState::Unfit => Err(PreprocessError::NotFitted),
        }
    }
}

fn check_schema(df: &DataFrame) -> Result<(), PreprocessError> {
    match missing_feature_columns(df).into_iter().next() {
        Some(column) => Err(PreprocessError::MissingColumn(column)),
        None => Ok(()),
    }
}

/// Compute mean and sample standard deviation for one numeric column.
fn column_scaling(name: &str, values: &[Option<f64>]) -> Result<ColumnScaling, PreprocessError> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.len() < 2 {
        return Err(PreprocessError::DegenerateColumn(name.to_string()));
    }

    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std = variance.sqrt();

    if std == 0.0 || !std.is_finite() {
        return Err(PreprocessError::DegenerateColumn(name.to_string()));
    }

    Ok(ColumnScaling {
        column: name.to_string(),
        mean,
        std,
    })
}

/// Distinct non-null categories of a column, lexicographically sorted.
fn distinct_categories(df: &DataFrame, name: &str) -> Result<Vec<String>, PreprocessError> {
    let mut observed: Vec<String> = category_labels(df, name)?.into_iter().flatten().collect();
    observed.sort();
    observed.dedup();
    Ok(observed)
}

/// Build the full encoded table for `df` from fitted statistics.
fn encode(df: &DataFrame, fitted: &FittedStats) -> Result<DataFrame, PreprocessError> {
    let mut columns: Vec<Column> = fitted
        .scaling
        .par_iter()
        .map(|scaling| standardize_column(df, scaling))
        .collect::<Result<Vec<_>, _>>()?;

    for (name, observed) in &fitted.categories {
        let labels = category_labels(df, name)?;
        let mut indicators: Vec<Column> = observed
            .par_iter()
            .map(|category| indicator_column(name, category, &labels))
            .collect();
        columns.append(&mut indicators);
    }

    Ok(DataFrame::new(columns)?)
}

fn standardize_column(df: &DataFrame, scaling: &ColumnScaling) -> Result<Column, PreprocessError> {
    let values = numeric_values(df, &scaling.column)?;
    let standardized: Vec<f64> = values
        .iter()
        .map(|value| match value {
            Some(x) => (x - scaling.mean) / scaling.std,
            // A null lands on the column mean after scaling.
            None => 0.0,
        })
        .collect();
    Ok(Column::new(scaling.column.as_str().into(), standardized))
}

/// One 0/1 indicator column for a single fit-time category.
fn indicator_column(column: &str, category: &str, labels: &[Option<String>]) -> Column {
    let indicators: Vec<f64> = labels
        .iter()
        .map(|label| match label {
            Some(value) if value == category => 1.0,
            _ => 0.0,
        })
        .collect();
    Column::new(format!("{}_{}", column, category).into(), indicators)
}

fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, PreprocessError> {
    let column = df
        .column(name)
        .map_err(|_| PreprocessError::MissingColumn(name.to_string()))?;
    let float_col = column.cast(&DataType::Float64)?;
    Ok(float_col.f64()?.iter().collect())
}

fn category_labels(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, PreprocessError> {
    let column = df
        .column(name)
        .map_err(|_| PreprocessError::MissingColumn(name.to_string()))?;
    let string_col = column.cast(&DataType::String)?;
    Ok(string_col
        .str()?
        .iter()
        .map(|value| value.map(|s| s.to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_fit_df() -> DataFrame {
        df! {
            "Income" => [50_000.0f64, 70_000.0],
            "LoanAmount" => [100_000.0f64, 140_000.0],
            "CreditHistory" => [5.0f64, 15.0],
            "WorkExperience" => ["0-2 years", "5+ years"],
            "HomeOwnership" => ["Rent", "Own"],
        }
        .unwrap()
    }

    #[test]
    fn test_column_scaling_known_values() {
        let values = vec![Some(50_000.0), Some(70_000.0)];
        let scaling = column_scaling("Income", &values).unwrap();

        assert_eq!(scaling.column, "Income");
        assert!((scaling.mean - 60_000.0).abs() < 1e-9);
        // sample std of {50000, 70000} = sqrt(2 * 10000^2 / 1)
        assert!((scaling.std - 14_142.135623730951).abs() < 1e-6);
    }

    #[test]
    fn test_column_scaling_skips_nulls() {
        let values = vec![Some(1.0), None, Some(3.0)];
        let scaling = column_scaling("Income", &values).unwrap();
        assert!((scaling.mean - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_column_scaling_constant_is_degenerate() {
        let values = vec![Some(5.0), Some(5.0), Some(5.0)];
        let result = column_scaling("CreditHistory", &values);
        assert!(matches!(
            result,
            Err(PreprocessError::DegenerateColumn(ref c)) if c == "CreditHistory"
        ));
    }

    #[test]
    fn test_column_scaling_single_value_is_degenerate() {
        let values = vec![Some(5.0)];
        assert!(matches!(
            column_scaling("Income", &values),
            Err(PreprocessError::DegenerateColumn(_))
        ));
    }

    #[test]
    fn test_distinct_categories_sorted_and_deduplicated() {
        let df = df! {
            "HomeOwnership" => ["Rent", "Own", "Rent", "Mortgage", "Own"],
        }
        .unwrap();

        let observed = distinct_categories(&df, "HomeOwnership").unwrap();
        assert_eq!(observed, vec!["Mortgage", "Own", "Rent"]);
    }

    #[test]
    fn test_distinct_categories_ignore_nulls() {
        let labels = Series::new(
            "WorkExperience".into(),
            &[Some("0-2 years"), None, Some("5+ years")],
        );
        let df = DataFrame::new(vec![labels.into()]).unwrap();

        let observed = distinct_categories(&df, "WorkExperience").unwrap();
        assert_eq!(observed, vec!["0-2 years", "5+ years"]);
    }

    #[test]
    fn test_check_schema_reports_first_missing_column() {
        let df = df! {
            "LoanAmount" => [1.0],
            "CreditHistory" => [2.0],
        }
        .unwrap();

        let result = check_schema(&df);
        assert!(matches!(
            result,
            Err(PreprocessError::MissingColumn(ref c)) if c == "Income"
        ));
    }

    #[test]
    fn test_fit_transform_sets_fitted_state() {
        let df = create_fit_df();
        let mut preprocessor = CreditRiskPreprocessor::new();

        assert!(!preprocessor.is_fitted());
        preprocessor.fit_transform(&df).unwrap();
        assert!(preprocessor.is_fitted());
    }

    #[test]
    fn test_indicator_column_matches_only_exact_label() {
        let labels = vec![
            Some("Rent".to_string()),
            Some("Own".to_string()),
            None,
            Some("Rental".to_string()),
        ];
        let column = indicator_column("HomeOwnership", "Rent", &labels);

        let values: Vec<f64> = column.f64().unwrap().iter().flatten().collect();
        assert_eq!(values, vec![1.0, 0.0, 0.0, 0.0]);
        assert_eq!(column.name().as_str(), "HomeOwnership_Rent");
    }
}
