//! # Raw Batch Producers
//!
//! A producer hands out fixed-size batches of [`RawSample`] values. Two
//! concrete producers exist:
//!
//! - [`AnuSource`]: the authentic quantum source (ANU QRNG JSON API)
//! - [`PseudoSource`]: a seeded `StdRng` simulation
//!
//! [`RawSource`] selects between them from configuration, and
//! [`FallbackSource`] is the opt-in policy that switches to the pseudo source
//! when the authentic one fails. Nothing falls back implicitly.
//!
//! Any `FnMut(usize) -> Result<Vec<RawSample>, SourceError>` closure is also a
//! producer, which keeps test doubles trivial:
//!
//! ```rust
//! use quantum_core::source::{RawBatchProducer, RawSample};
//! use quantum_core::SourceError;
//!
//! let mut counter = |len: usize| -> Result<Vec<RawSample>, SourceError> {
//!     Ok((0..len as u16).collect())
//! };
//! let batch = counter.produce(4).unwrap();
//! assert_eq!(batch.as_slice(), &[0, 1, 2, 3]);
//! ```

mod anu;
mod fallback;
mod pseudo;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{QuantumError, SourceError};

pub use anu::{parse_response, AnuSource, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, MAX_REQUEST_LENGTH};
pub use fallback::FallbackSource;
pub use pseudo::PseudoSource;

/// One raw value from a source, uniform over `[0, 65535]` inclusive.
pub type RawSample = u16;

/// Largest raw value.
pub const RAW_MAX: RawSample = u16::MAX;

/// An immutable batch of raw samples as delivered by one producer call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Batch(Box<[RawSample]>);

impl Batch {
    /// Number of samples in the batch.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a batch with no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sample at `index`, if present.
    #[inline]
    pub fn get(&self, index: usize) -> Option<RawSample> {
        self.0.get(index).copied()
    }

    /// Borrow the samples.
    #[inline]
    pub fn as_slice(&self) -> &[RawSample] {
        &self.0
    }
}

impl From<Vec<RawSample>> for Batch {
    fn from(samples: Vec<RawSample>) -> Self {
        Self(samples.into_boxed_slice())
    }
}

/// Supplier of fixed-size raw batches.
///
/// `produce(length)` must return exactly `length` samples or an error.
/// Implementations own any retry or timeout policy; consumers never retry.
pub trait RawBatchProducer {
    /// Fetch a fresh batch of `length` samples.
    fn produce(&mut self, length: usize) -> Result<Batch, SourceError>;

    /// Short name used in log output.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> RawBatchProducer for F
where
    F: FnMut(usize) -> Result<Vec<RawSample>, SourceError>,
{
    fn produce(&mut self, length: usize) -> Result<Batch, SourceError> {
        self(length).map(Batch::from)
    }
}

/// Which raw source a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// ANU quantum random numbers over HTTPS.
    Authentic,
    /// Seeded pseudo-random simulation.
    #[default]
    Pseudo,
}

impl FromStr for SourceKind {
    type Err = QuantumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "authentic" | "quantum" | "anu" => Ok(SourceKind::Authentic),
            "pseudo" | "prng" => Ok(SourceKind::Pseudo),
            _ => Err(QuantumError::InvalidArgument(format!(
                "unknown source kind '{}': expected authentic or pseudo",
                s
            ))),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Authentic => write!(f, "authentic"),
            SourceKind::Pseudo => write!(f, "pseudo"),
        }
    }
}

/// Settings needed to build a [`RawSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    /// Which source to use.
    pub kind: SourceKind,
    /// Base URL of the QRNG JSON API.
    pub api_url: String,
    /// Per-request timeout for the authentic source.
    pub timeout: Duration,
    /// Seed for the pseudo source; entropy-seeded when `None`.
    pub seed: Option<u64>,
    /// Fall back to the pseudo source when the authentic one fails.
    pub fallback: bool,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            kind: SourceKind::Pseudo,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            seed: None,
            fallback: true,
        }
    }
}

/// Configuration-selected raw source.
pub enum RawSource {
    /// Authentic quantum source only; failures surface to the caller.
    Authentic(AnuSource),
    /// Pseudo-random simulation.
    Pseudo(PseudoSource),
    /// Authentic source with explicit pseudo fallback.
    Fallback(FallbackSource<AnuSource, PseudoSource>),
}

impl RawSource {
    /// Build the source described by `settings`.
    pub fn from_settings(settings: &SourceSettings) -> Result<Self, SourceError> {
        let pseudo = || match settings.seed {
            Some(seed) => PseudoSource::from_seed(seed),
            None => PseudoSource::from_entropy(),
        };

        Ok(match settings.kind {
            SourceKind::Pseudo => RawSource::Pseudo(pseudo()),
            SourceKind::Authentic => {
                let anu = AnuSource::new(settings.api_url.clone(), settings.timeout)?;
                if settings.fallback {
                    RawSource::Fallback(FallbackSource::new(anu, pseudo()))
                } else {
                    RawSource::Authentic(anu)
                }
            }
        })
    }

    /// The kind this source was built for.
    pub fn kind(&self) -> SourceKind {
        match self {
            RawSource::Pseudo(_) => SourceKind::Pseudo,
            RawSource::Authentic(_) | RawSource::Fallback(_) => SourceKind::Authentic,
        }
    }

    /// Batches served by the pseudo fallback instead of the authentic source.
    pub fn fallbacks(&self) -> u64 {
        match self {
            RawSource::Fallback(source) => source.fallbacks(),
            RawSource::Authentic(_) | RawSource::Pseudo(_) => 0,
        }
    }
}

impl RawBatchProducer for RawSource {
    fn produce(&mut self, length: usize) -> Result<Batch, SourceError> {
        match self {
            RawSource::Authentic(source) => source.produce(length),
            RawSource::Pseudo(source) => source.produce(length),
            RawSource::Fallback(source) => source.produce(length),
        }
    }

    fn name(&self) -> &str {
        match self {
            RawSource::Authentic(source) => source.name(),
            RawSource::Pseudo(source) => source.name(),
            RawSource::Fallback(source) => source.name(),
        }
    }
}
