use affordability_engine::app::batch;
use affordability_engine::utils::{logger, validation::Validate};
use affordability_engine::{AffordabilityCalculator, EngineConfig};
use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, BufWriter};

#[derive(Parser)]
#[command(name = "batch-affordability")]
#[command(about = "Evaluate many purchase scenarios from a CSV file")]
struct Args {
    /// CSV with one scenario per row and input keys (price, rent, rate, ...) as headers
    #[arg(short, long)]
    input: String,

    /// Where to write the result CSV; stdout when omitted
    #[arg(short, long)]
    output: Option<String>,

    /// Path to TOML engine configuration
    #[arg(short, long)]
    config: Option<String>,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let format = if args.json_logs {
        logger::LogFormat::Json
    } else {
        logger::LogFormat::Compact
    };
    logger::init_logger(args.verbose, format);

    let config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            EngineConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?
        }
        None => EngineConfig::default(),
    };
    config.validate().context("invalid engine configuration")?;

    let calculator = AffordabilityCalculator::new(config);
    let input = File::open(&args.input)
        .with_context(|| format!("failed to open scenarios '{}'", args.input))?;

    let summary = match &args.output {
        Some(path) => {
            let output =
                File::create(path).with_context(|| format!("failed to create '{}'", path))?;
            batch::run_csv(&calculator, BufReader::new(input), BufWriter::new(output))?
        }
        None => batch::run_csv(&calculator, BufReader::new(input), std::io::stdout().lock())?,
    };

    eprintln!(
        "✅ {} scenarios evaluated, {} invalid",
        summary.valid + summary.invalid,
        summary.invalid
    );
    Ok(())
}
