//! Batch scoring of application tables against an exported model artifact

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use polars::prelude::*;

use crate::model::{RiskBand, RiskScorer};
use crate::pipeline::schema::{feature_columns, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};
use crate::pipeline::{load_applications, save_table};
use crate::report::load_artifact;
use crate::utils::create_spinner;

/// Run batch scoring: load an artifact, score every row of the input
/// table, print a banded preview, and optionally write the scored table.
///
/// # Arguments
/// * `input` - Path to the applications file (CSV or Parquet)
/// * `model_path` - Path to the model artifact JSON
/// * `output` - Optional output path for the scored table
/// * `infer_schema_length` - Number of rows to use for schema inference
/// * `display_limit` - Maximum number of scored rows to print
pub fn run_score(
    input: &Path,
    model_path: &Path,
    output: Option<&Path>,
    infer_schema_length: usize,
    display_limit: usize,
) -> Result<()> {
    println!("\n {} Scoring applications", style("◆").cyan().bold());
    println!("   Input: {}", style(input.display()).dim());
    println!("   Model: {}", style(model_path.display()).dim());
    println!();

    let artifact = load_artifact(model_path)?;
    if let Some(metadata) = &artifact.metadata {
        println!(
            "   Artifact from crisk {} exported {}",
            style(&metadata.crisk_version).yellow(),
            style(&metadata.timestamp).dim()
        );
        println!();
    }

    let spinner = create_spinner("Loading applications...");
    let (df, rows, cols, _) = load_applications(input, infer_schema_length)?;
    spinner.finish_with_message(format!(
        "{} Loaded {} rows × {} columns",
        style("✓").green(),
        rows,
        cols
    ));

    let scorer = RiskScorer::from_artifact(&artifact);
    let scores = scorer
        .score(&df)
        .context("Failed to score applications")?;

    let limit = display_limit.min(df.height());
    if limit > 0 {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);

        let mut header: Vec<Cell> = feature_columns()
            .iter()
            .map(|column| Cell::new(column).add_attribute(Attribute::Bold))
            .collect();
        header.push(Cell::new("P(default)").add_attribute(Attribute::Bold));
        header.push(Cell::new("Risk").add_attribute(Attribute::Bold));
        table.set_header(header);

        let mut numeric = Vec::new();
        for column in NUMERIC_COLUMNS {
            numeric.push(df.column(column)?.cast(&DataType::Float64)?);
        }
        let mut labels = Vec::new();
        for column in CATEGORICAL_COLUMNS {
            labels.push(df.column(column)?.cast(&DataType::String)?);
        }

        for row in 0..limit {
            let mut cells = Vec::new();
            for column in &numeric {
                cells.push(match column.f64()?.get(row) {
                    Some(value) => Cell::new(format!("{:.1}", value)),
                    None => Cell::new("-"),
                });
            }
            for column in &labels {
                cells.push(match column.str()?.get(row) {
                    Some(label) => Cell::new(label),
                    None => Cell::new("-"),
                });
            }

            let band = RiskBand::from_probability(scores[row]);
            cells.push(Cell::new(format!("{:.3}", scores[row])).fg(band_color(band)));
            cells.push(
                Cell::new(band.label())
                    .fg(band_color(band))
                    .add_attribute(Attribute::Bold),
            );
            table.add_row(cells);
        }

        println!();
        for line in table.to_string().lines() {
            println!("    {}", line);
        }
        if df.height() > limit {
            println!(
                "    {}",
                style(format!("({} more rows not shown)", df.height() - limit)).dim()
            );
        }
    }

    let mut low = 0usize;
    let mut medium = 0usize;
    let mut high = 0usize;
    for &score in &scores {
        match RiskBand::from_probability(score) {
            RiskBand::Low => low += 1,
            RiskBand::Medium => medium += 1,
            RiskBand::High => high += 1,
        }
    }

    println!();
    println!("   {} Risk bands:", style("✧").cyan());
    println!("      Low:    {}", style(low).green());
    println!("      Medium: {}", style(medium).yellow());
    println!("      High:   {}", style(high).red());

    if let Some(output_path) = output {
        let mut scored = df.clone();
        scored.with_column(Column::new(
            "default_probability".into(),
            scores.clone(),
        ))?;
        let bands: Vec<&str> = scores
            .iter()
            .map(|&score| RiskBand::from_probability(score).label())
            .collect();
        scored.with_column(Column::new("risk_band".into(), bands))?;
        save_table(&mut scored, output_path)?;

        println!();
        println!(
            "   {} Scored table written to {}",
            style("💾").cyan(),
            style(output_path.display()).dim()
        );
    }

    println!();
    println!(" {} Scoring complete!", style("✓").green().bold());

    Ok(())
}

fn band_color(band: RiskBand) -> Color {
    match band {
        RiskBand::Low => Color::Green,
        RiskBand::Medium => Color::Yellow,
        RiskBand::High => Color::Red,
    }
}
