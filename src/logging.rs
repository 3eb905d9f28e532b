use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Installs the stderr subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "logging initialised");
    Ok(())
}
