use affordability_engine::core::{Outcome, ResultObserver};
use affordability_engine::utils::error::{AffordError, ErrorSeverity};
use affordability_engine::utils::{logger, validation::Validate};
use affordability_engine::{
    AffordabilityCalculator, CalculatorSession, CliConfig, EngineConfig, LocalStorage, Report,
};
use clap::Parser;

/// Prints every outcome it receives, as text or JSON.
struct ReportPrinter {
    config: EngineConfig,
    json: bool,
}

impl ResultObserver for ReportPrinter {
    fn on_result(&mut self, outcome: &Outcome) {
        let report = Report::build(outcome, &self.config);
        if self.json {
            match serde_json::to_string_pretty(&report).map_err(AffordError::from) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    tracing::error!("❌ {} (Category: {:?})", e, e.category());
                    eprintln!("❌ {}", e.user_friendly_message());
                }
            }
        } else {
            print!("{}", report);
        }
    }
}

fn exit_code(error: &AffordError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High | ErrorSeverity::Critical => 1,
    }
}

fn fail(error: AffordError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        error,
        error.category(),
        error.severity()
    );
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 {}", error.recovery_suggestion());
    std::process::exit(exit_code(&error));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        fail(e);
    }

    let engine_config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            EngineConfig::from_file(path).unwrap_or_else(|e| fail(e))
        }
        None => EngineConfig::default(),
    };
    if let Err(e) = engine_config.validate() {
        fail(e);
    }

    let calculator = AffordabilityCalculator::new(engine_config.clone());
    let mut session = CalculatorSession::from_config(calculator, LocalStorage::new("."), &cli);
    session.subscribe(Box::new(ReportPrinter {
        config: engine_config,
        json: cli.json,
    }));

    // stored values first, command line flags on top
    let outcome = session
        .start_with(&cli.overrides())
        .await
        .unwrap_or_else(|e| fail(e));
    if let Err(invalid) = outcome {
        fail(AffordError::InvalidInput(invalid.clone()));
    }

    Ok(())
}
