use crate::{CatalogError, Result};
use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber for the embedding service
///
/// `RUST_LOG` wins over `level` when set. Fails instead of panicking if a
/// global subscriber is already installed.
pub fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("meme_catalog={}", level)))
        .map_err(|e| CatalogError::Config(format!("Invalid log level '{}': {}", level, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| CatalogError::Config(format!("Failed to initialize tracing: {}", e)))
}
