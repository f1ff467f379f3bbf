use tracing_subscriber::EnvFilter;
use tvlaunch_core::config::GeneralConfig;

/// Install the global fmt subscriber. `RUST_LOG` wins over the configured filter.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(config: &GeneralConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
