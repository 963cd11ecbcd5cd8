//! Flag statistical outliers in a batch of health observations
//!
//! Usage: cargo run --bin detect_anomalies -- --input patients.csv \
//!            --features Heart_Rate_BPM,Systolic_BP

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use cardiac_risk::anomaly::{annotate_batch, detect_batch, AnomalyLabel, DetectorConfig};
use cardiac_risk::data::Dataset;

#[derive(Parser, Debug)]
#[command(author, version, about = "Detect anomalous rows in tabular health metrics")]
struct Args {
    /// CSV of observations to score
    #[arg(short, long)]
    input: String,

    /// Comma-separated feature columns (at least 2)
    #[arg(short, long)]
    features: String,

    /// Expected fraction of anomalous rows
    #[arg(short, long, default_value = "0.05")]
    contamination: f64,

    /// Number of isolation trees
    #[arg(short, long, default_value = "100")]
    trees: usize,

    /// Random seed for reproducible runs
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Write the labelled table to this CSV path
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    println!("{}", "=== Anomaly Detection ===".bold());
    println!();

    let features: Vec<String> = args
        .features
        .split(',')
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();

    println!("Scoring {} over {:?}...\n", args.input.cyan(), features);
    let table = Dataset::from_csv_path(&args.input)?;

    let config = DetectorConfig {
        contamination: args.contamination,
        n_trees: args.trees,
        seed: args.seed,
    };
    let report = detect_batch(&table, &features, &config)?;

    if report.dropped > 0 {
        log::warn!(
            "dropped {} rows with missing values in the chosen features",
            report.dropped
        );
    }

    let flagged = report.n_anomalies();
    println!("Rows scored:  {}", report.labels.len());
    println!(
        "Rows flagged: {} ({:.1}%)",
        flagged.to_string().red().bold(),
        flagged as f64 / report.labels.len().max(1) as f64 * 100.0
    );

    // Top flagged rows by score
    let mut flagged_rows: Vec<(usize, f64)> = report
        .kept_rows
        .iter()
        .zip(&report.scores)
        .zip(&report.labels)
        .filter(|(_, label)| **label == AnomalyLabel::Anomaly)
        .map(|((row, score), _)| (*row, *score))
        .collect();
    flagged_rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    if !flagged_rows.is_empty() {
        println!("\n{}", "=== Most Anomalous Rows ===".bold());
        for (row, score) in flagged_rows.iter().take(10) {
            println!("  row {:>5}  score {:.3}", row, score);
        }
    }

    if let Some(path) = &args.output {
        let annotated = annotate_batch(&table, &features, &config)?;
        annotated.to_csv_path(path)?;
        println!("\nLabelled table written to {}", path.cyan());
    }

    Ok(())
}
