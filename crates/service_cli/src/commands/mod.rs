//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands write their
//! values to any `std::io::Write`, one per line.

pub mod check;
pub mod draw;
pub mod walk;

use quantum_core::{BufferedStream, RawSource, Sampler};
use tracing::info;

use crate::config::QuantumConfig;
use crate::Result;

/// Sampler type shared by all commands
pub type CliSampler = Sampler<BufferedStream<RawSource>>;

/// Build the configured source, stream and sampler
pub fn build_sampler(config: &QuantumConfig) -> Result<CliSampler> {
    let source = RawSource::from_settings(&config.source_settings())?;
    info!(
        source = %config.source,
        fallback = config.fallback,
        batch_length = config.batch_length,
        "raw source ready"
    );
    let stream = BufferedStream::new(source, config.batch_length)?;
    Ok(Sampler::with_policy(stream, config.rejection_policy()))
}
