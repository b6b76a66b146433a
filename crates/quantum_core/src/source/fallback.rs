//! Opt-in "authentic with pseudo fallback" policy.

use tracing::warn;

use super::{Batch, RawBatchProducer};
use crate::error::SourceError;

/// Serves batches from `primary`, switching to `fallback` for any batch the
/// primary cannot deliver.
///
/// Every switch is logged at `warn` and counted; the primary is tried again
/// on the next batch. A failure of the fallback itself is returned as is.
/// [`name`](RawBatchProducer::name) reports whichever producer served the
/// most recent batch.
pub struct FallbackSource<P, F> {
    primary: P,
    fallback: F,
    fallbacks: u64,
    last_error: Option<SourceError>,
    on_fallback: bool,
}

impl<P, F> FallbackSource<P, F>
where
    P: RawBatchProducer,
    F: RawBatchProducer,
{
    /// Wrap `primary`, falling back to `fallback`.
    pub fn new(primary: P, fallback: F) -> Self {
        Self {
            primary,
            fallback,
            fallbacks: 0,
            last_error: None,
            on_fallback: false,
        }
    }

    /// Number of batches served by the fallback.
    pub fn fallbacks(&self) -> u64 {
        self.fallbacks
    }

    /// Most recent primary failure, if any.
    pub fn last_error(&self) -> Option<&SourceError> {
        self.last_error.as_ref()
    }
}

impl<P, F> RawBatchProducer for FallbackSource<P, F>
where
    P: RawBatchProducer,
    F: RawBatchProducer,
{
    fn produce(&mut self, length: usize) -> Result<Batch, SourceError> {
        let failure = match self.primary.produce(length) {
            Ok(batch) if batch.len() == length => {
                self.on_fallback = false;
                return Ok(batch);
            }
            Ok(batch) => SourceError::ShortBatch {
                expected: length,
                got: batch.len(),
            },
            Err(e) => e,
        };

        self.fallbacks += 1;
        warn!(
            primary = self.primary.name(),
            fallback = self.fallback.name(),
            error = %failure,
            fallbacks = self.fallbacks,
            "authentic source failed, switching to pseudo simulation"
        );
        self.last_error = Some(failure);
        self.on_fallback = true;
        self.fallback.produce(length)
    }

    fn name(&self) -> &str {
        if self.on_fallback {
            self.fallback.name()
        } else {
            self.primary.name()
        }
    }
}
