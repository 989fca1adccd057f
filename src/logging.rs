use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console logging for the client core.
///
/// Enables console output for all tracing macros (info!, warn!, error!,
/// debug!, etc.) used throughout the crate.
///
/// # Configuration
///
/// - **Log Level**: Controlled by `LOG_LEVEL` environment variable (default: "info")
/// - **Filtering**: Noisy dependencies filtered to warn level for cleaner output
/// - **Format**: Compact format with ANSI colors (auto-detected)
pub fn init_logging() {
    // Determine log level from environment variable
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    // Create environment filter with default log level and suppressed noisy deps
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={},hyper=warn,reqwest=warn,h2=warn",
            env!("CARGO_PKG_NAME"),
            log_level
        ))
    });

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(console_layer).init();
}
