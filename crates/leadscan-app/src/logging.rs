use leadscan_config::logging::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Logs go to stderr so they never
/// interleave with the presenter on stdout.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.filter))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}
