//! Hobart CLI binary.
//!
//! Scores a universe snapshot file and inspects the scoring model.

mod input;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use hobart::{EngineConfig, ScoringEngine, ScoringRun};
use hobart_data::GicsSector;
use hobart_factors::{Factor, ScoringModel, count_by_factor, model_metrics};
use hobart_output::{ExportFormat, Exporter};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: composite factor scoring for equity universes", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every security in a snapshot file
    Score {
        /// Snapshot file (.csv or .json)
        input: PathBuf,

        /// Scoring model JSON (defaults to the built-in model)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Engine configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Minimum number of factors with data for a security to be scored
        #[arg(long)]
        min_factors: Option<usize>,

        /// Scoring date (YYYY-MM-DD); read from the input when omitted
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Output format (csv, json or pretty-json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Write scores to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the skipped list to this file
        #[arg(long)]
        skipped: Option<PathBuf>,

        /// Write a JSON run report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the run summary to stderr
        #[arg(long)]
        summary: bool,
    },

    /// Show, validate or export a scoring model
    Model {
        /// Validate a model file instead of the built-in model
        #[arg(long)]
        validate: Option<PathBuf>,

        /// Write the model as JSON to this file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// List the metrics of the built-in model
    Metrics {
        /// Only list metrics of this factor
        #[arg(long)]
        factor: Option<String>,
    },

    /// List GICS sectors
    Sectors,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Score {
            input,
            model,
            config,
            min_factors,
            date,
            format,
            output,
            skipped,
            report,
            summary,
        } => {
            let options = ScoreOptions {
                format: format.parse()?,
                output,
                skipped,
                report,
                summary,
            };
            let engine = build_engine(model.as_deref(), config.as_deref(), min_factors)?;
            score(&engine, &input, date, &options)?;
        }
        Commands::Model { validate, export } => {
            show_model(validate.as_deref(), export.as_deref())?;
        }
        Commands::Metrics { factor } => {
            list_metrics(factor.as_deref())?;
        }
        Commands::Sectors => list_all_sectors(),
    }

    Ok(())
}

struct ScoreOptions {
    format: ExportFormat,
    output: Option<PathBuf>,
    skipped: Option<PathBuf>,
    report: Option<PathBuf>,
    summary: bool,
}

fn build_engine(
    model: Option<&Path>,
    config: Option<&Path>,
    min_factors: Option<usize>,
) -> Result<ScoringEngine, Box<dyn std::error::Error>> {
    let model = match model {
        Some(path) => ScoringModel::from_json_file(path)?,
        None => ScoringModel::default_model(),
    };

    let mut config = match config {
        Some(path) => EngineConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    if let Some(n) = min_factors {
        config = config.with_min_factor_count(n);
    }

    Ok(ScoringEngine::new(model, config)?)
}

fn score(
    engine: &ScoringEngine,
    input: &Path,
    date: Option<NaiveDate>,
    options: &ScoreOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Loading {}...", input.display()));

    let snapshot = match input::load_snapshot(input, date) {
        Ok(s) => s,
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    pb.set_message(format!(
        "Scoring {} securities against {} metrics...",
        snapshot.len(),
        engine.model().metric_count()
    ));

    let run = match engine.run(&snapshot) {
        Ok(run) => {
            pb.finish_with_message(format!(
                "Scored {} securities ({} skipped)",
                run.records.len(),
                run.skipped.len()
            ));
            run
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    write_outputs(&run, options)
}

fn write_outputs(
    run: &ScoringRun,
    options: &ScoreOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    match &options.output {
        Some(path) => {
            run.records.export_to_file(path, options.format)?;
            tracing::info!(path = %path.display(), "wrote scores");
        }
        None => print!("{}", run.records.export_to_string(options.format)?),
    }

    if let Some(path) = &options.skipped {
        run.skipped.export_to_file(path, skipped_format(path))?;
        tracing::info!(
            path = %path.display(),
            count = run.skipped.len(),
            "wrote skipped list"
        );
    }

    if let Some(path) = &options.report {
        run.report()?.write_to(path)?;
        tracing::info!(path = %path.display(), "wrote report");
    }

    if options.summary {
        eprintln!("\n{}", run.summary());
    }

    Ok(())
}

/// Skipped lists follow their own file's extension, CSV unless it says JSON.
fn skipped_format(path: &Path) -> ExportFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::PrettyJson,
        _ => ExportFormat::Csv,
    }
}

fn show_model(
    validate: Option<&Path>,
    export: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let model = match validate {
        Some(path) => {
            let model = ScoringModel::from_json_file(path)?;
            println!("{}: valid", path.display());
            model
        }
        None => ScoringModel::default_model(),
    };

    println!("Model: {} (version {})", model.name, model.version);
    println!(
        "Minimum sector peers: {}, single-value rank: {}",
        model.min_sector_peers, model.degenerate_rank
    );
    println!("{} metrics\n", model.metric_count());

    for factor in &model.factors {
        println!("{:<12} weight {:.2}", factor.factor.to_string(), factor.weight);
        for sub in &factor.sub_components {
            println!(
                "  {:<28} weight {:.2}  ({} metrics)",
                sub.name,
                sub.weight,
                sub.metrics.len()
            );
        }
    }

    if let Some(path) = export {
        std::fs::write(path, model.to_json()?)?;
        println!("\nModel written to {}", path.display());
    }

    Ok(())
}

fn list_metrics(factor: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match factor {
        Some(name) => {
            Some(Factor::parse(name).ok_or_else(|| format!("Unknown factor: {}", name))?)
        }
        None => None,
    };

    let model = ScoringModel::default_model();
    let metrics = model_metrics(&model);

    println!(
        "{:<32} {:<12} {:<28} {:<18} {:<22} {:>6}",
        "Metric", "Factor", "Sub-component", "Direction", "Basis", "Weight"
    );
    println!("{}", "-".repeat(123));

    for info in metrics
        .iter()
        .filter(|m| filter.is_none_or(|f| m.factor == f))
    {
        println!(
            "{:<32} {:<12} {:<28} {:<18} {:<22} {:>6.2}",
            info.name,
            info.factor.to_string(),
            info.sub_component,
            info.direction.to_string(),
            info.basis.to_string(),
            info.weight
        );
    }

    if filter.is_none() {
        println!();
        let counts = count_by_factor();
        for factor in Factor::all() {
            let count = counts.get(&factor).copied().unwrap_or(0);
            println!("{:<12} {} metrics", factor.to_string(), count);
        }
    }

    Ok(())
}

fn list_all_sectors() {
    println!("GICS Sectors:");
    println!("=============\n");

    for sector in GicsSector::all() {
        println!("{:2} - {}", sector.code(), sector.name());
    }
}
