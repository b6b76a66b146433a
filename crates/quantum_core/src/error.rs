//! Error types for structured error handling.
//!
//! This module provides:
//! - `SourceError`: a raw batch producer could not deliver a batch
//! - `QuantumError`: errors surfaced by streams and samplers

use thiserror::Error;

/// Raw batch producer failures.
///
/// Raised by a [`RawBatchProducer`](crate::source::RawBatchProducer) and
/// carried unchanged through streams and samplers.
///
/// # Examples
///
/// ```
/// use quantum_core::SourceError;
///
/// let err = SourceError::ShortBatch { expected: 1024, got: 3 };
/// assert_eq!(format!("{}", err), "Short batch: expected 1024 samples, got 3");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Connection, TLS or timeout failure while fetching.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Remote service answered with a non-success HTTP status.
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// Response body could not be decoded.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Remote service reported `success: false`.
    #[error("Source rejected request: {0}")]
    Rejected(String),

    /// Producer returned a batch of the wrong length.
    #[error("Short batch: expected {expected} samples, got {got}")]
    ShortBatch {
        /// Requested batch length
        expected: usize,
        /// Length actually delivered
        got: usize,
    },
}

/// Stream and sampler errors.
///
/// # Variants
///
/// - `Producer`: the raw source failed (no retry, no substitution)
/// - `InvalidArgument`: configuration or argument rejected up front, including
///   a pick of more items than can be supplied
/// - `RejectionExhausted`: a capped rejection loop gave up
///
/// # Examples
///
/// ```
/// use quantum_core::QuantumError;
///
/// let err = QuantumError::RejectionExhausted { attempts: 5 };
/// assert!(format!("{}", err).contains("5"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantumError {
    /// Raw batch producer failure.
    #[error("Producer failure: {0}")]
    Producer(#[from] SourceError),

    /// Invalid argument (e.g. zero batch length).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configured rejection cap reached before an acceptance.
    #[error("Rejection sampling exhausted after {attempts} consecutive rejections")]
    RejectionExhausted {
        /// Consecutive rejected candidates
        attempts: u64,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QuantumError>;
