//! Pseudo-random raw source for simulations and offline runs.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

use super::{Batch, RawBatchProducer, RawSample, RAW_MAX};
use crate::error::SourceError;

/// Seeded `StdRng` producing raw samples uniform over `[0, 65535]`.
///
/// Never fails, so it is the natural stand-in for the authentic source.
///
/// # Examples
///
/// ```rust
/// use quantum_core::source::{PseudoSource, RawBatchProducer};
///
/// let mut a = PseudoSource::from_seed(12345);
/// let mut b = PseudoSource::from_seed(12345);
/// assert_eq!(a.produce(8).unwrap(), b.produce(8).unwrap());
/// ```
pub struct PseudoSource {
    inner: StdRng,
    range: Uniform<RawSample>,
    seed: Option<u64>,
}

impl PseudoSource {
    /// Reproducible source initialised from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            range: Uniform::new_inclusive(0, RAW_MAX),
            seed: Some(seed),
        }
    }

    /// Source seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
            range: Uniform::new_inclusive(0, RAW_MAX),
            seed: None,
        }
    }

    /// Seed used at construction, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl RawBatchProducer for PseudoSource {
    fn produce(&mut self, length: usize) -> Result<Batch, SourceError> {
        let samples: Vec<RawSample> = self
            .range
            .sample_iter(&mut self.inner)
            .take(length)
            .collect();
        Ok(Batch::from(samples))
    }

    fn name(&self) -> &str {
        "pseudo"
    }
}
