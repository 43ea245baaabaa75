//! Training run summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Summary of a complete training run
#[derive(Debug, Default)]
pub struct TrainingSummary {
    pub total_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train_default_rate: f64,
    pub test_default_rate: f64,
    pub feature_count: usize,
    pub iterations: usize,
    pub final_loss: f64,
    pub accuracy: f64,
    pub roc_auc: f64,
    pub total_time: Duration,
}

impl TrainingSummary {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            ..Default::default()
        }
    }

    pub fn record_split(
        &mut self,
        train_rows: usize,
        test_rows: usize,
        train_default_rate: f64,
        test_default_rate: f64,
    ) {
        self.train_rows = train_rows;
        self.test_rows = test_rows;
        self.train_default_rate = train_default_rate;
        self.test_default_rate = test_default_rate;
    }

    pub fn record_features(&mut self, feature_count: usize) {
        self.feature_count = feature_count;
    }

    pub fn record_training(&mut self, iterations: usize, final_loss: f64) {
        self.iterations = iterations;
        self.final_loss = final_loss;
    }

    pub fn record_evaluation(&mut self, accuracy: f64, roc_auc: f64) {
        self.accuracy = accuracy;
        self.roc_auc = roc_auc;
    }

    pub fn record_total_time(&mut self, total_time: Duration) {
        self.total_time = total_time;
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("TRAINING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📊 Applications"),
            Cell::new(self.total_rows),
        ]);

        table.add_row(vec![
            Cell::new("🎓 Training Rows"),
            Cell::new(format!(
                "{} ({:.1}% default)",
                self.train_rows,
                self.train_default_rate * 100.0
            )),
        ]);

        table.add_row(vec![
            Cell::new("🧪 Test Rows"),
            Cell::new(format!(
                "{} ({:.1}% default)",
                self.test_rows,
                self.test_default_rate * 100.0
            )),
        ]);

        table.add_row(vec![
            Cell::new("🧮 Features"),
            Cell::new(self.feature_count),
        ]);

        table.add_row(vec![
            Cell::new("🔁 GD Iterations"),
            Cell::new(self.iterations),
        ]);

        table.add_row(vec![
            Cell::new("📉 Final Log-Loss"),
            Cell::new(format!("{:.4}", self.final_loss)),
        ]);

        table.add_row(vec![
            Cell::new("🎯 Test Accuracy"),
            Cell::new(format!("{:.1}%", self.accuracy * 100.0))
                .fg(metric_color(self.accuracy))
                .add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📈 Test ROC AUC"),
            Cell::new(format!("{:.3}", self.roc_auc))
                .fg(metric_color(self.roc_auc))
                .add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("⏱️  Total Time"),
            Cell::new(format!("{:.2}s", self.total_time.as_secs_f64())),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

fn metric_color(value: f64) -> Color {
    if value > 0.75 {
        Color::Green
    } else if value > 0.6 {
        Color::Yellow
    } else {
        Color::Red
    }
}
