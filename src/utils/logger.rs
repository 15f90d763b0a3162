use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the CLI subscriber. `RUST_LOG` wins over everything; otherwise
/// `verbose` selects debug, then the configured `log_level`, then info.
pub fn init_with_level(verbose: bool, log_level: Option<&str>) {
    let default_directive = match (verbose, log_level) {
        (true, _) => "expiry_tracker=debug,info".to_string(),
        (false, Some(level)) => format!("expiry_tracker={}", level.to_ascii_lowercase()),
        (false, None) => "expiry_tracker=info".to_string(),
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // Logs go to stderr so the interactive view on stdout stays readable.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
