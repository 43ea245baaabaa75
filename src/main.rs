//! Crisk: Credit Risk Scoring CLI Tool
//!
//! A command-line demonstration of an end-to-end credit scoring pipeline:
//! synthetic portfolio generation, leak-free preprocessing, logistic
//! regression training, evaluation, and model export.

mod cli;
mod model;
mod pipeline;
mod report;
mod utils;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use cli::{Cli, Commands};
use model::{
    accuracy, dataframe_to_matrix, roc_auc, target_vector, ConfusionMatrix, LogisticRegression,
};
use pipeline::{
    default_rate, generate_applications, load_applications, missing_feature_columns,
    stratified_split, CreditRiskPreprocessor, TARGET_COLUMN,
};
use report::{export_artifact, ModelArtifact, Performance, TrainingSummary};
use utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Score {
                input,
                model,
                output,
                infer_schema_length,
                display_limit,
            } => cli::score::run_score(
                input,
                model,
                output.as_deref(),
                *infer_schema_length,
                *display_limit,
            ),
        };
    }

    let run_start = Instant::now();

    if !cli.quiet {
        // Print styled banner
        print_banner(env!("CARGO_PKG_VERSION"));

        // Print configuration card
        let source = match &cli.input {
            Some(input) => input.display().to_string(),
            None => format!("synthetic ({} rows)", cli.rows),
        };
        print_config(
            &source,
            TARGET_COLUMN,
            &cli.output,
            cli.test_fraction,
            cli.seed,
            cli.learning_rate,
            cli.max_iterations,
        );
    }

    // Step 1: Obtain application data (file input or synthetic portfolio)
    print_step_header(1, "Application Data");

    let step_start = Instant::now();
    let df = match &cli.input {
        Some(input) => {
            let spinner = create_spinner("Loading applications...");
            let (df, rows, cols, memory_mb) = load_applications(input, cli.infer_schema_length)?;
            finish_with_success(&spinner, "Applications loaded");

            println!("\n    {} Dataset Statistics:", style("✧").cyan());
            println!("      Rows: {}", rows);
            println!("      Columns: {}", cols);
            println!("      Estimated memory: {:.2} MB", memory_mb);
            df
        }
        None => {
            print_info("No input file provided, generating a synthetic portfolio");
            let spinner = create_spinner("Generating applications...");
            let df = generate_applications(cli.rows, cli.seed)?;
            finish_with_success(&spinner, &format!("Generated {} applications", df.height()));
            df
        }
    };

    // Verify the schema before any fitting happens
    let missing = missing_feature_columns(&df);
    if !missing.is_empty() {
        anyhow::bail!("Input is missing required feature columns: {:?}", missing);
    }
    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    if !column_names.contains(&TARGET_COLUMN.to_string()) {
        anyhow::bail!(
            "Target column '{}' not found in dataset. Available columns: {:?}",
            TARGET_COLUMN,
            column_names
        );
    }

    let portfolio_rate = default_rate(&df, TARGET_COLUMN)?;
    println!(
        "      Default rate: {}",
        style(format!("{:.1}%", portfolio_rate * 100.0)).yellow()
    );

    let mut summary = TrainingSummary::new(df.height());
    print_step_time(step_start.elapsed());

    // Step 2: Stratified train/test split
    print_step_header(2, "Train/Test Split");

    let step_start = Instant::now();
    let (train_df, test_df) = stratified_split(&df, TARGET_COLUMN, cli.test_fraction, cli.seed)?;
    let train_rate = default_rate(&train_df, TARGET_COLUMN)?;
    let test_rate = default_rate(&test_df, TARGET_COLUMN)?;
    print_success("Split applications with stratified sampling");
    println!(
        "      Train: {} rows ({:.1}% default)",
        style(train_df.height()).yellow().bold(),
        train_rate * 100.0
    );
    println!(
        "      Test:  {} rows ({:.1}% default)",
        style(test_df.height()).yellow().bold(),
        test_rate * 100.0
    );
    summary.record_split(train_df.height(), test_df.height(), train_rate, test_rate);
    print_step_time(step_start.elapsed());

    // Step 3: Fit the preprocessor on the training partition only, then
    // apply the frozen parameters to the held-out partition
    print_step_header(3, "Feature Preprocessing");

    let step_start = Instant::now();
    let spinner = create_spinner("Standardizing and encoding features...");
    let mut preprocessor = CreditRiskPreprocessor::new();
    let train_features = preprocessor.fit_transform(&train_df)?;
    let test_features = preprocessor.transform(&test_df)?;
    finish_with_success(&spinner, "Features standardized and encoded");

    let feature_names = preprocessor.feature_names()?.to_vec();
    print_count("model features", feature_names.len(), None);
    for name in &feature_names {
        println!("        {} {}", style("•").dim(), name);
    }
    summary.record_features(feature_names.len());
    print_step_time(step_start.elapsed());

    // Step 4: Train the classifier
    print_step_header(4, "Model Training");

    let step_start = Instant::now();
    let x_train = dataframe_to_matrix(&train_features)?;
    let y_train = target_vector(&train_df, TARGET_COLUMN)?;

    let spinner = create_spinner("Running gradient descent...");
    let mut model = LogisticRegression::new(cli.training_config());
    model.fit(&x_train, &y_train)?;
    finish_with_success(&spinner, "Training complete");

    let iterations = model.iterations()?;
    let final_loss = model.final_loss()?;
    println!(
        "      Iterations: {}",
        style(iterations).yellow().bold()
    );
    println!(
        "      Final log-loss: {}",
        style(format!("{:.4}", final_loss)).yellow().bold()
    );
    summary.record_training(iterations, final_loss);
    print_step_time(step_start.elapsed());

    // Step 5: Evaluate on the held-out partition
    print_step_header(5, "Evaluation");

    let step_start = Instant::now();
    let x_test = dataframe_to_matrix(&test_features)?;
    let y_test = target_vector(&test_df, TARGET_COLUMN)?;
    let probabilities = model.predict_proba(&x_test)?;
    let predictions = model.predict(&x_test)?;

    let test_accuracy = accuracy(&y_test, &predictions)?;
    let test_auc = roc_auc(&y_test, &probabilities)?;
    let confusion = ConfusionMatrix::from_predictions(&y_test, &predictions);
    print_success("Evaluated on held-out applications");
    println!(
        "      Confusion: {} TP  {} TN  {} FP  {} FN",
        style(confusion.true_positives).green(),
        style(confusion.true_negatives).green(),
        style(confusion.false_positives).red(),
        style(confusion.false_negatives).red()
    );
    println!(
        "      Accuracy: {}",
        style(format!("{:.1}%", test_accuracy * 100.0)).yellow().bold()
    );
    println!(
        "      ROC AUC:  {}",
        style(format!("{:.3}", test_auc)).yellow().bold()
    );
    summary.record_evaluation(test_accuracy, test_auc);
    print_step_time(step_start.elapsed());

    // Step 6: Export the model artifact
    print_step_header(6, "Export Model");

    let step_start = Instant::now();
    let artifact = ModelArtifact::from_training(
        &feature_names,
        model.coefficients()?,
        model.intercept()?,
        preprocessor.get_scaling_params()?,
        Performance {
            accuracy: test_accuracy,
            roc_auc: test_auc,
        },
    )?
    .with_metadata(train_df.height(), test_df.height());

    let spinner = create_spinner("Writing model artifact...");
    export_artifact(&artifact, &cli.output)?;
    finish_with_success(&spinner, &format!("Saved to {}", cli.output.display()));
    print_step_time(step_start.elapsed());

    summary.record_total_time(run_start.elapsed());

    // Display summary
    if !cli.quiet {
        summary.display();
    }

    // Final completion message
    print_completion();

    Ok(())
}
