//! Synthetic loan application generator
//!
//! Produces seeded, reproducible application tables whose default behavior
//! follows a simple economic story: defaults become more likely as the
//! loan-to-income ratio grows and less likely with longer credit history.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use super::schema::{HOME_OWNERSHIP_LABELS, TARGET_COLUMN, WORK_EXPERIENCE_LABELS};

/// Generate `rows` synthetic loan applications with a binary default target.
///
/// # Arguments
/// * `rows` - Number of applications to generate
/// * `seed` - RNG seed; the same seed always produces the same table
///
/// # Behavior
/// - `Income` ~ Normal(60 000, 20 000)
/// - `LoanAmount` ~ Normal(150 000, 50 000)
/// - `CreditHistory` ~ Uniform(0, 30) years
/// - `WorkExperience` and `HomeOwnership` drawn uniformly from their labels
/// - The default probability is
///   `sigmoid(2 * LoanAmount/Income - CreditHistory/10 - 1)`, and the
///   `Default` column samples that probability per row.
pub fn generate_applications(rows: usize, seed: u64) -> Result<DataFrame> {
    if rows == 0 {
        bail!("Cannot generate an empty application table (rows must be > 0)");
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let income_dist = Normal::new(60_000.0, 20_000.0).context("Invalid income distribution")?;
    let loan_dist = Normal::new(150_000.0, 50_000.0).context("Invalid loan distribution")?;

    let incomes: Vec<f64> = (0..rows).map(|_| income_dist.sample(&mut rng)).collect();
    let loan_amounts: Vec<f64> = (0..rows).map(|_| loan_dist.sample(&mut rng)).collect();
    let credit_history: Vec<f64> = (0..rows).map(|_| rng.gen_range(0.0..30.0)).collect();
    let work_experience: Vec<&str> = (0..rows)
        .map(|_| WORK_EXPERIENCE_LABELS[rng.gen_range(0..WORK_EXPERIENCE_LABELS.len())])
        .collect();
    let home_ownership: Vec<&str> = (0..rows)
        .map(|_| HOME_OWNERSHIP_LABELS[rng.gen_range(0..HOME_OWNERSHIP_LABELS.len())])
        .collect();

    let defaults: Vec<i64> = (0..rows)
        .map(|i| {
            let loan_to_income = loan_amounts[i] / incomes[i];
            let z = 2.0 * loan_to_income - credit_history[i] / 10.0 - 1.0;
            let probability = 1.0 / (1.0 + (-z).exp());
            i64::from(rng.gen::<f64>() < probability)
        })
        .collect();

    let df = df! {
        "Income" => incomes,
        "LoanAmount" => loan_amounts,
        "CreditHistory" => credit_history,
        "WorkExperience" => work_experience,
        "HomeOwnership" => home_ownership,
        TARGET_COLUMN => defaults,
    }?;

    Ok(df)
}

/// Fraction of rows in `df` whose target column equals 1.
pub fn default_rate(df: &DataFrame, target: &str) -> Result<f64> {
    if df.height() == 0 {
        bail!("Cannot compute a default rate over an empty table");
    }

    let column = df
        .column(target)
        .with_context(|| format!("Target column '{}' not found", target))?;
    let ca = column.cast(&DataType::Float64)?;
    let defaults: f64 = ca.f64()?.iter().flatten().sum();

    Ok(defaults / df.height() as f64)
}
