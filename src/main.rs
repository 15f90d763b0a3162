use clap::Parser;
use expiry_tracker::app::commands::{parse_command, Command, HELP};
use expiry_tracker::core::ConfigProvider;
use expiry_tracker::utils::error::{ErrorSeverity, TrackerError};
use expiry_tracker::utils::{logger, validation::Validate};
use expiry_tracker::{
    load_catalog, CliConfig, FileReportExporter, FormContext, FormEngine, LocalStorage,
};
use tokio::io::{AsyncBufReadExt, BufReader};

fn exit_code(e: &TrackerError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(stage: &str, e: &TrackerError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(exit_code(e).max(1));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // The log level may come from the config file, so resolve it first.
    let config = cli.resolve();
    let log_level = config.as_ref().ok().and_then(|c| c.log_level());
    logger::init_with_level(cli.verbose, log_level);

    let config = match config {
        Ok(config) => config,
        Err(e) => fail("Failed to load configuration", &e),
    };
    for field in cli.overridden_fields() {
        tracing::info!("🔧 {} overridden from the command line", field);
    }
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        fail("Configuration validation failed", &e);
    }

    let catalog_storage = LocalStorage::new(".".to_string());
    let catalog = match load_catalog(
        &catalog_storage,
        config.catalog_path(),
        &config.catalog_columns(),
    )
    .await
    {
        Ok(catalog) => catalog,
        Err(e) => fail("Catalog load failed", &e),
    };

    let ctx = FormContext::new(catalog, config.variant()).with_report_title(config.report_title());
    let storage = LocalStorage::new(config.output_path().to_string());
    let exporter = FileReportExporter::new(storage, config.clone());
    let mut engine = FormEngine::new(ctx, exporter);

    tracing::info!("🚀 Expiry tracker ready ({} form)", config.variant());
    println!("{}", engine.view());
    println!("Type 'help' for the list of commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("❌ {}", message);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Show => println!("{}", engine.view()),
            Command::Form(action) => match engine.dispatch(action).await {
                Ok(view) => println!("{}", view),
                Err(e) => {
                    // Export failures end the interaction, not the session.
                    eprintln!("❌ {}", e.user_friendly_message());
                    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
                }
            },
        }
    }

    tracing::info!(
        "Session ended with {} products entered",
        engine.state().products.len()
    );
    Ok(())
}
