//! # quantum_core: Buffered Random Streams and Distribution Transforms
//!
//! Turns batches of raw 16-bit samples (from the ANU quantum random number
//! service, or a seeded pseudo generator) into a one-value-at-a-time pull
//! interface, and shapes those values into derived distributions.
//!
//! ## Data Flow
//!
//! ```text
//! RawBatchProducer ──► BufferedStream ──► Sampler / transform ──► caller
//!   (batches of u16)     (cursor + refill)   (bool, int, real, normal, ...)
//! ```
//!
//! ## Modules
//!
//! - [`source`]: raw batch producers (`AnuSource`, `PseudoSource`, `FallbackSource`)
//! - [`stream`]: [`BufferedStream`], the lazily refilling cursor
//! - [`transform`]: pure raw-to-value mappings
//! - [`sampler`]: stateful draws, including rejection-sampled ones
//! - [`stats`]: goodness-of-fit checks used to validate a source
//! - [`walk`]: digit-angle walk geometry
//!
//! ## Usage Example
//!
//! ```rust
//! use quantum_core::source::PseudoSource;
//! use quantum_core::{BufferedStream, Sampler};
//!
//! let stream = BufferedStream::new(PseudoSource::from_seed(42), 1024).unwrap();
//! let mut sampler = Sampler::new(stream);
//!
//! let digit = sampler.bounded_integer(9).unwrap();
//! assert!(digit <= 9);
//!
//! let z = sampler.gaussian(0.0, 1.0).unwrap();
//! assert!(z.is_finite());
//! ```
//!
//! ## Threading
//!
//! Everything here is synchronous and single-owner. A stream may block while
//! its producer performs network I/O; callers wanting latency hiding should
//! prefetch on their own worker.

#![warn(missing_docs)]

pub mod error;
pub mod sampler;
pub mod source;
pub mod stats;
pub mod stream;
pub mod transform;
pub mod walk;

pub use error::{QuantumError, Result, SourceError};
pub use sampler::{RejectionPolicy, Sampler};
pub use source::{Batch, RawBatchProducer, RawSample, RawSource, SourceKind};
pub use stream::{BufferedStream, RawSupply};
