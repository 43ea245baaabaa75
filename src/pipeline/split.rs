//! Stratified train/test splitting

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Split a table into train and test partitions, stratified on a binary
/// target column.
///
/// Rows are bucketed per target class, shuffled with the given seed, and
/// `test_fraction` of each class (rounded) is assigned to the test set.
/// Every class contributes at least one row to both partitions, and each
/// partition keeps the original row order of the input table.
///
/// # Errors
/// Fails when the target column is missing or contains nulls, when the
/// table has fewer than two classes, when any class has fewer than two
/// rows, or when `test_fraction` is outside (0, 1).
pub fn stratified_split(
    df: &DataFrame,
    target: &str,
    test_fraction: f64,
    seed: u64,
) -> Result<(DataFrame, DataFrame)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        bail!(
            "Test fraction must be strictly between 0 and 1, got {}",
            test_fraction
        );
    }

    let column = df
        .column(target)
        .with_context(|| format!("Target column '{}' not found", target))?;
    let int_col = column
        .cast(&DataType::Int64)
        .with_context(|| format!("Target column '{}' must be numeric", target))?;
    let ca = int_col.i64()?;

    let mut class_indices: HashMap<i64, Vec<usize>> = HashMap::new();
    for (idx, value) in ca.iter().enumerate() {
        match value {
            Some(class) => class_indices.entry(class).or_default().push(idx),
            None => bail!("Target column '{}' contains a null at row {}", target, idx),
        }
    }

    if class_indices.len() < 2 {
        bail!(
            "Target column '{}' must contain at least two classes for a stratified split",
            target
        );
    }

    // Deterministic class order; HashMap iteration order is not.
    let mut classes: Vec<(i64, Vec<usize>)> = class_indices.into_iter().collect();
    classes.sort_unstable_by_key(|(class, _)| *class);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut is_test = vec![false; df.height()];

    for (class, mut indices) in classes {
        if indices.len() < 2 {
            bail!(
                "Class {} of target '{}' has fewer than 2 rows; cannot split it",
                class,
                target
            );
        }

        indices.shuffle(&mut rng);
        let requested = (indices.len() as f64 * test_fraction).round() as usize;
        let take = requested.clamp(1, indices.len() - 1);
        for &idx in indices.iter().take(take) {
            is_test[idx] = true;
        }
    }

    let train_mask: Vec<bool> = is_test.iter().map(|flag| !flag).collect();
    let train = df.filter(&BooleanChunked::from_slice("train".into(), &train_mask))?;
    let test = df.filter(&BooleanChunked::from_slice("test".into(), &is_test))?;

    Ok((train, test))
}
