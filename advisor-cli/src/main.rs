//! Advisor CLI — run the decision pipeline from the command line.
//!
//! Commands:
//! - `advise` — full pipeline run: prompt + feature/macro snapshots in,
//!   decision record out (summary to stdout, JSON to the output directory)
//! - `intent` — parse a prompt and print the structured intent
//! - `regime` — classify a macro snapshot and print the regime state

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use advisor_core::config::AdvisorConfig;
use advisor_core::domain::{AssetFeatureSet, MacroSnapshot};
use advisor_core::enrich::DecisionRecord;
use advisor_core::fingerprint::fingerprint;
use advisor_core::pipeline::{Pipeline, PipelineInput};
use advisor_core::{intent, regime};

#[derive(Parser)]
#[command(
    name = "advisor",
    about = "Advisor CLI — adaptive quantitative decision pipeline"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and emit a decision record.
    Advise {
        /// Free-text investment intent, e.g. "quero alto retorno em 30 dias".
        #[arg(long)]
        prompt: String,

        /// JSON file with the asset feature sets (array).
        #[arg(long)]
        features: PathBuf,

        /// JSON file with the macro indicator readings. Missing indicators
        /// are scored neutral and recorded in the output.
        #[arg(long)]
        macro_snapshot: Option<PathBuf>,

        /// TOML config overriding the default risk-gate parameters.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Evaluation date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Output directory for the record JSON.
        #[arg(long, default_value = "records")]
        output_dir: PathBuf,

        /// Print the full record JSON to stdout instead of the summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Parse a prompt and print the structured intent as JSON.
    Intent {
        /// Free-text investment intent.
        prompt: String,
    },
    /// Classify a macro snapshot and print the regime state as JSON.
    Regime {
        /// JSON file with the macro indicator readings.
        #[arg(long)]
        macro_snapshot: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Advise {
            prompt,
            features,
            macro_snapshot,
            config,
            date,
            output_dir,
            json,
        } => run_advise(
            prompt,
            &features,
            macro_snapshot.as_deref(),
            config.as_deref(),
            date.as_deref(),
            &output_dir,
            json,
        ),
        Commands::Intent { prompt } => run_intent(&prompt),
        Commands::Regime { macro_snapshot } => run_regime(&macro_snapshot),
    }
}

fn run_advise(
    prompt: String,
    features_path: &Path,
    macro_path: Option<&Path>,
    config_path: Option<&Path>,
    date: Option<&str>,
    output_dir: &Path,
    json: bool,
) -> Result<()> {
    let evaluation_date = date
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("invalid --date, expected YYYY-MM-DD")?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let features = load_features(features_path)?;
    let macro_snapshot = match macro_path {
        Some(path) => load_snapshot(path)?,
        None => MacroSnapshot::new(),
    };
    let config = match config_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            AdvisorConfig::from_toml(&raw)?
        }
        None => AdvisorConfig::default(),
    };

    let pipeline = Pipeline::new(config);
    let record = pipeline.run(&PipelineInput {
        evaluation_date,
        prompt,
        features,
        macro_snapshot,
    })?;

    let id = fingerprint(&record);

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_summary(&record, &id);
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let out_path = output_dir.join(format!("{}.json", &id[..16]));
    std::fs::write(&out_path, serde_json::to_string_pretty(&record)?)?;
    if !json {
        println!("Record saved to: {}", out_path.display());
    }

    Ok(())
}

fn run_intent(prompt: &str) -> Result<()> {
    let parsed = intent::parse(prompt)?;
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}

fn run_regime(macro_path: &Path) -> Result<()> {
    let snapshot = load_snapshot(macro_path)?;
    let state = regime::classify(&snapshot);
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn load_features(path: &Path) -> Result<Vec<AssetFeatureSet>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("malformed feature file {}", path.display()))
}

fn load_snapshot(path: &Path) -> Result<MacroSnapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("malformed macro snapshot {}", path.display()))
}

fn print_summary(record: &DecisionRecord, id: &str) {
    println!();
    println!("=== Decision Record ===");
    println!("Date:           {}", record.evaluation_date);
    println!("Fingerprint:    {}", &id[..16]);
    println!(
        "Intent:         {:?} / {:?} / {:?} (confidence {:.2})",
        record.intent.objective,
        record.intent.horizon,
        record.intent.risk_tolerance,
        record.intent.confidence
    );
    println!(
        "Regime:         {} (score {:+.1})",
        record.regime.label, record.regime.score
    );
    println!("Decision:       {:?}", record.decision);
    println!();
    println!("--- Risk ---");
    for comparison in &record.risk_summary {
        let flag = if comparison.within_limit { "ok" } else { "BREACH" };
        println!(
            "{:<24} {:>7.2}% vs limit {:>6.2}%  [{flag}]",
            comparison.metric,
            comparison.computed * 100.0,
            comparison.limit * 100.0
        );
    }
    for reason in &record.reasons {
        println!("REJECT: {reason}");
    }
    for warning in &record.risk.warnings {
        println!("WARNING: {warning}");
    }

    if let Some(allocation) = &record.allocation {
        println!();
        println!("--- Allocation ---");
        println!(
            "{:<8} {:<12} {:>8} {:>8}  {}",
            "Ticker", "Sector", "Weight", "Score", "Rationale"
        );
        for row in &allocation.rows {
            println!(
                "{:<8} {:<12} {:>7.2}% {:>8.3}  {}",
                row.ticker,
                row.sector,
                row.weight * 100.0,
                row.composite_score,
                row.rationale
            );
        }
        println!(
            "{:<8} {:<12} {:>7.2}%",
            "CASH",
            "-",
            allocation.cash_weight * 100.0
        );
    }

    if !record.macro_substitutions.is_empty() {
        println!();
        for indicator in &record.macro_substitutions {
            println!("WARNING: {indicator} reading missing, scored neutral");
        }
    }
    if record.historical_context.short_history_count > 0 {
        println!(
            "WARNING: {} asset(s) scored neutrally for short history",
            record.historical_context.short_history_count
        );
    }
    println!();
    println!(
        "Confidence:     {:.2}",
        record.recommendation_confidence
    );
    println!();
}
