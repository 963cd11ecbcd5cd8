//! Fit and apply the clustering-based cardiac risk classifier
//!
//! Usage: cargo run --bin classify_risk -- --reference clustered_data.csv

use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;

use cardiac_risk::data::Dataset;
use cardiac_risk::risk::{ClusterAssignment, RiskClassifier, RiskLabel, DEFAULT_PROFILE};

#[derive(Parser, Debug)]
#[command(author, version, about = "Classify cardiac risk from tabular health metrics")]
struct Args {
    /// Reference CSV to fit the classifier on
    #[arg(short, long)]
    reference: Option<String>,

    /// Load a previously saved model artifact instead of fitting
    #[arg(short, long)]
    model: Option<String>,

    /// CSV of observations to classify (defaults to the reference table)
    #[arg(short, long)]
    input: Option<String>,

    /// Comma-separated feature columns used for clustering
    #[arg(short, long)]
    features: Option<String>,

    /// Number of risk groups (2 or 3)
    #[arg(short, long, default_value = "3")]
    clusters: usize,

    /// Random seed for reproducible fits
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Write the classified table to this CSV path
    #[arg(short, long)]
    output: Option<String>,

    /// Save the fitted model artifact to this path
    #[arg(long)]
    save_model: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    println!("{}", "=== Cardiac Risk Classification ===".bold());
    println!();

    let model = match (&args.model, &args.reference) {
        (Some(path), _) => {
            println!("Loading model from {}...", path.cyan());
            RiskClassifier::load(path)?
        }
        (None, Some(path)) => {
            println!("Fitting on reference data from {}...", path.cyan());
            let reference = Dataset::from_csv_path(path)?;
            let profile = parse_features(args.features.as_deref());
            RiskClassifier::fit(&reference, &profile, args.clusters, args.seed)?
        }
        (None, None) => bail!("either --model or --reference is required"),
    };

    log::info!(
        "model ready: {} clusters over {:?}, fitted {}",
        model.k(),
        model.profile(),
        model.fitted_at
    );

    let input_path = args
        .input
        .as_ref()
        .or(args.reference.as_ref())
        .cloned();
    let Some(input_path) = input_path else {
        bail!("nothing to classify: provide --input when loading a saved model");
    };

    println!("Classifying {}...\n", input_path.cyan());
    let table = Dataset::from_csv_path(&input_path)?;
    let assignments = model.classify(&table)?;

    print_distribution(&assignments);

    if let Some(path) = &args.output {
        let annotated = model.annotate(&table)?;
        annotated.to_csv_path(path)?;
        println!("\nClassified table written to {}", path.cyan());
    }

    if let Some(path) = &args.save_model {
        model.save(path)?;
        println!("Model artifact saved to {}", path.cyan());
    }

    Ok(())
}

fn parse_features(arg: Option<&str>) -> Vec<String> {
    match arg {
        Some(list) => list
            .split(',')
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect(),
        None => DEFAULT_PROFILE.iter().map(|f| f.to_string()).collect(),
    }
}

fn print_distribution(assignments: &[ClusterAssignment]) {
    let total = assignments.len().max(1) as f64;

    println!("{}", "=== Risk Distribution ===".bold());
    for label in [RiskLabel::Low, RiskLabel::Moderate, RiskLabel::High] {
        let count = assignments.iter().filter(|a| a.label == label).count();
        if count == 0 && label == RiskLabel::Moderate {
            continue; // Two-cluster fits have no Moderate group
        }

        let dot = match label {
            RiskLabel::Low => "●".green(),
            RiskLabel::Moderate => "●".yellow(),
            RiskLabel::High => "●".red(),
        };

        let bar_len = (count as f64 / total * 40.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {} {:14} {:>5} ({:>5.1}%) {}",
            dot,
            label.as_str(),
            count,
            count as f64 / total * 100.0,
            bar
        );
    }
}
