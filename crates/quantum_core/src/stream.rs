//! Lazily refilling pull stream over a raw batch producer.
//!
//! [`BufferedStream`] hides batching from consumers: every call to
//! [`BufferedStream::next_sample`] returns one raw value, and the producer is
//! only invoked when the current batch has been read to its end.

use tracing::debug;

use crate::error::{QuantumError, Result, SourceError};
use crate::source::{Batch, RawBatchProducer, RawSample};

/// Anything that can hand out raw samples one at a time.
///
/// Transforms in [`crate::sampler`] are written against this trait so that they
/// do not care how samples are batched or where they come from.
pub trait RawSupply {
    /// Pull the next raw sample.
    fn next_raw(&mut self) -> Result<RawSample>;
}

impl<S: RawSupply + ?Sized> RawSupply for &mut S {
    fn next_raw(&mut self) -> Result<RawSample> {
        (**self).next_raw()
    }
}

/// Infinite pull interface over a batch producer.
///
/// Owns exactly one [`Batch`] and a read position with
/// `0 <= position <= batch.len()`. When `position == batch.len()` the cursor
/// is exhausted and the next pull asks the producer for a fresh batch.
/// Nothing is fetched at construction.
///
/// Producer failures propagate unchanged and leave the cursor exhausted, so a
/// later pull asks the producer again. The stream itself never retries.
///
/// # Examples
///
/// ```rust
/// use quantum_core::source::PseudoSource;
/// use quantum_core::BufferedStream;
///
/// let mut stream = BufferedStream::new(PseudoSource::from_seed(7), 4).unwrap();
/// assert_eq!(stream.refills(), 0);
///
/// for _ in 0..5 {
///     stream.next_sample().unwrap();
/// }
/// assert_eq!(stream.refills(), 2);
/// ```
pub struct BufferedStream<P> {
    producer: P,
    batch_length: usize,
    batch: Batch,
    position: usize,
    refills: u64,
}

impl<P: RawBatchProducer> BufferedStream<P> {
    /// Wrap `producer`, requesting `batch_length` samples per refill.
    ///
    /// # Errors
    ///
    /// `QuantumError::InvalidArgument` if `batch_length` is zero.
    pub fn new(producer: P, batch_length: usize) -> Result<Self> {
        if batch_length == 0 {
            return Err(QuantumError::InvalidArgument(
                "batch length must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            producer,
            batch_length,
            batch: Batch::default(),
            position: 0,
            refills: 0,
        })
    }

    /// Return the next raw sample, refilling first if the batch is exhausted.
    pub fn next_sample(&mut self) -> Result<RawSample> {
        if self.is_exhausted() {
            self.refill()?;
        }
        let sample = self.batch.as_slice()[self.position];
        self.position += 1;
        Ok(sample)
    }

    fn refill(&mut self) -> Result<()> {
        let batch = self.producer.produce(self.batch_length)?;
        if batch.len() != self.batch_length {
            return Err(SourceError::ShortBatch {
                expected: self.batch_length,
                got: batch.len(),
            }
            .into());
        }
        self.batch = batch;
        self.position = 0;
        self.refills += 1;
        debug!(
            source = self.producer.name(),
            batch_length = self.batch_length,
            refills = self.refills,
            "raw batch refilled"
        );
        Ok(())
    }

    /// `true` when the next pull will call the producer.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.position == self.batch.len()
    }

    /// Samples left in the current batch.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.batch.len() - self.position
    }

    /// Configured batch length.
    #[inline]
    pub fn batch_length(&self) -> usize {
        self.batch_length
    }

    /// Number of successful producer calls so far.
    #[inline]
    pub fn refills(&self) -> u64 {
        self.refills
    }

    /// Borrow the producer.
    pub fn producer(&self) -> &P {
        &self.producer
    }

    /// Unwrap the producer, discarding any buffered samples.
    pub fn into_producer(self) -> P {
        self.producer
    }
}

impl<P: RawBatchProducer> RawSupply for BufferedStream<P> {
    fn next_raw(&mut self) -> Result<RawSample> {
        self.next_sample()
    }
}

impl<P: RawBatchProducer> Iterator for BufferedStream<P> {
    type Item = Result<RawSample>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_sample())
    }
}
