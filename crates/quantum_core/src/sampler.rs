//! Stateful draws over a raw supply.
//!
//! [`Sampler`] owns a [`RawSupply`] and turns it into booleans, bounded
//! integers, reals, arbitrarily large integers, selections and Gaussian
//! variates. Two operations are rejection samplers:
//!
//! - [`Sampler::random_indexed`]: redraws a same-length decimal integer until
//!   it does not exceed the bound
//! - [`Sampler::gaussian`]: Kinderman–Monahan ratio of uniforms
//!
//! Both loop until acceptance by default. A [`RejectionPolicy`] can cap the
//! number of consecutive rejections, and the sampler always counts draws and
//! rejections so a stalled loop is observable.

use num_bigint::BigUint;
use tracing::warn;

use crate::error::{QuantumError, Result};
use crate::source::RawSample;
use crate::stream::RawSupply;
use crate::transform::{
    kinderman_monahan, to_boolean, to_bounded_integer, to_uniform_real,
};

/// Bound on consecutive rejections in a rejection-sampling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RejectionPolicy {
    /// Give up after this many consecutive rejections. `None` loops forever.
    pub max_consecutive: Option<u64>,
}

impl RejectionPolicy {
    /// Loop until acceptance.
    pub const fn unbounded() -> Self {
        Self {
            max_consecutive: None,
        }
    }

    /// Fail with `RejectionExhausted` after `max` consecutive rejections.
    ///
    /// A cap of 0 behaves like 1: the first rejection fails.
    pub const fn capped(max: u64) -> Self {
        Self {
            max_consecutive: Some(max),
        }
    }
}

/// Distribution-shaped draws over a raw supply.
///
/// # Examples
///
/// ```rust
/// use quantum_core::source::PseudoSource;
/// use quantum_core::{BufferedStream, Sampler};
///
/// let stream = BufferedStream::new(PseudoSource::from_seed(3), 256).unwrap();
/// let mut sampler = Sampler::new(stream);
///
/// let deck: Vec<u8> = (1..=52).collect();
/// let shuffled = sampler.shuffle(&deck).unwrap();
/// assert_eq!(shuffled.len(), 52);
///
/// let z = sampler.gaussians(10, 100.0, 15.0).unwrap();
/// assert_eq!(z.len(), 10);
/// ```
pub struct Sampler<S> {
    supply: S,
    policy: RejectionPolicy,
    draws: u64,
    rejections: u64,
}

impl<S: RawSupply> Sampler<S> {
    /// Sampler with an unbounded rejection policy.
    pub fn new(supply: S) -> Self {
        Self::with_policy(supply, RejectionPolicy::unbounded())
    }

    /// Sampler with an explicit rejection policy.
    pub fn with_policy(supply: S, policy: RejectionPolicy) -> Self {
        Self {
            supply,
            policy,
            draws: 0,
            rejections: 0,
        }
    }

    /// Active rejection policy.
    pub fn policy(&self) -> RejectionPolicy {
        self.policy
    }

    /// Raw samples consumed so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Rejected candidates so far, across all rejection loops.
    pub fn rejections(&self) -> u64 {
        self.rejections
    }

    /// Borrow the underlying supply.
    pub fn supply(&self) -> &S {
        &self.supply
    }

    /// Unwrap the underlying supply.
    pub fn into_supply(self) -> S {
        self.supply
    }

    /// Pull one raw sample.
    pub fn raw(&mut self) -> Result<RawSample> {
        let raw = self.supply.next_raw()?;
        self.draws += 1;
        Ok(raw)
    }

    fn reject(&mut self, consecutive: &mut u64) -> Result<()> {
        self.rejections += 1;
        *consecutive += 1;
        match self.policy.max_consecutive {
            Some(max) if *consecutive >= max => {
                warn!(
                    attempts = *consecutive,
                    draws = self.draws,
                    "rejection sampling gave up"
                );
                Err(QuantumError::RejectionExhausted {
                    attempts: *consecutive,
                })
            }
            _ => Ok(()),
        }
    }

    /// Fair coin from the parity of one raw sample.
    pub fn boolean(&mut self) -> Result<bool> {
        Ok(to_boolean(self.raw()?))
    }

    /// `length` fair coins.
    pub fn booleans(&mut self, length: usize) -> Result<Vec<bool>> {
        (0..length).map(|_| self.boolean()).collect()
    }

    /// Real in `[0, endpoint)`.
    pub fn uniform_real(&mut self, endpoint: f64) -> Result<f64> {
        Ok(to_uniform_real(self.raw()?, endpoint))
    }

    /// `length` reals in `[0, endpoint)`.
    pub fn reals(&mut self, length: usize, endpoint: f64) -> Result<Vec<f64>> {
        (0..length).map(|_| self.uniform_real(endpoint)).collect()
    }

    /// Integer in `0..=upper`.
    pub fn bounded_integer(&mut self, upper: u16) -> Result<u16> {
        Ok(to_bounded_integer(self.raw()?, upper))
    }

    /// `length` integers in `0..=upper`.
    pub fn integers(&mut self, length: usize, upper: u16) -> Result<Vec<u16>> {
        (0..length).map(|_| self.bounded_integer(upper)).collect()
    }

    /// Concatenate `digits` random decimal digits into one integer.
    ///
    /// Leading zero digits still consume a draw but do not contribute to the
    /// value, so the result may have fewer significant digits than requested.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `digits` is zero.
    pub fn large_integer(&mut self, digits: usize) -> Result<BigUint> {
        if digits == 0 {
            return Err(QuantumError::InvalidArgument(
                "digit count must be at least 1".to_string(),
            ));
        }
        let mut value = BigUint::default();
        for _ in 0..digits {
            let digit = self.bounded_integer(9)?;
            value = value * 10u32 + u32::from(digit);
        }
        Ok(value)
    }

    /// Uniform integer in `0..=end`, for `end` of any size.
    ///
    /// Draws integers with as many decimal digits as `end` and rejects those
    /// above it.
    pub fn random_indexed(&mut self, end: &BigUint) -> Result<BigUint> {
        let digits = end.to_str_radix(10).len();
        let mut consecutive = 0;
        loop {
            let candidate = self.large_integer(digits)?;
            if &candidate <= end {
                return Ok(candidate);
            }
            self.reject(&mut consecutive)?;
        }
    }

    fn index_below(&mut self, length: usize) -> Result<usize> {
        let end = BigUint::from(length - 1);
        let index = self.random_indexed(&end)?;
        usize::try_from(&index).map_err(|_| {
            QuantumError::InvalidArgument(format!("index {} does not fit in usize", index))
        })
    }

    /// Select `count` items.
    ///
    /// Without replacement each pick is removed from a private pool, so no
    /// item is chosen twice; `items` itself is never touched.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when more items are requested than can be supplied.
    pub fn pick<T: Clone>(&mut self, items: &[T], count: usize, replacement: bool) -> Result<Vec<T>> {
        let available = items.len();
        if (!replacement && count > available) || (count > 0 && available == 0) {
            return Err(QuantumError::InvalidArgument(format!(
                "requested {} items but only {} available",
                count, available
            )));
        }

        let mut picked = Vec::with_capacity(count);
        if replacement {
            for _ in 0..count {
                let index = self.index_below(available)?;
                picked.push(items[index].clone());
            }
        } else {
            let mut pool: Vec<T> = items.to_vec();
            for _ in 0..count {
                let index = self.index_below(pool.len())?;
                picked.push(pool.remove(index));
            }
        }
        Ok(picked)
    }

    /// Random permutation of `items`.
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Result<Vec<T>> {
        self.pick(items, items.len(), false)
    }

    /// One normal variate with the given mean and standard deviation.
    pub fn gaussian(&mut self, mean: f64, sdev: f64) -> Result<f64> {
        let mut consecutive = 0;
        loop {
            let u1 = self.raw()?;
            let u2 = self.raw()?;
            if let Some(z) = kinderman_monahan(u1, u2) {
                return Ok(mean + z * sdev);
            }
            self.reject(&mut consecutive)?;
        }
    }

    /// Exactly `length` accepted normal variates.
    pub fn gaussians(&mut self, length: usize, mean: f64, sdev: f64) -> Result<Vec<f64>> {
        (0..length).map(|_| self.gaussian(mean, sdev)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::source::{PseudoSource, RAW_MAX};
    use crate::stream::BufferedStream;
    use std::collections::VecDeque;

    /// Supply replaying a fixed script of raw samples.
    struct Scripted(VecDeque<RawSample>);

    impl Scripted {
        fn new(raws: &[RawSample]) -> Self {
            Self(raws.iter().copied().collect())
        }
    }

    impl RawSupply for Scripted {
        fn next_raw(&mut self) -> Result<RawSample> {
            self.0
                .pop_front()
                .ok_or_else(|| SourceError::Transport("script exhausted".to_string()).into())
        }
    }

    /// Raw value that maps to decimal digit `d`.
    fn digit(d: u16) -> RawSample {
        d * 6554
    }

    fn pseudo_sampler(seed: u64) -> Sampler<BufferedStream<PseudoSource>> {
        Sampler::new(BufferedStream::new(PseudoSource::from_seed(seed), 1024).unwrap())
    }

    #[test]
    fn test_digit_helper_maps_to_digits() {
        for d in 0..=9 {
            assert_eq!(to_bounded_integer(digit(d), 9), d);
        }
    }

    #[test]
    fn test_boolean_follows_parity() {
        let mut sampler = Sampler::new(Scripted::new(&[2, 3, 0, RAW_MAX]));
        assert_eq!(sampler.booleans(4).unwrap(), vec![false, true, false, true]);
        assert_eq!(sampler.draws(), 4);
    }

    #[test]
    fn test_large_integer_drops_leading_zeros() {
        let script = [digit(0), digit(0), digit(3), digit(1), digit(4)];
        let mut sampler = Sampler::new(Scripted::new(&script));
        assert_eq!(sampler.large_integer(5).unwrap(), BigUint::from(314u32));
        assert_eq!(sampler.draws(), 5);
    }

    #[test]
    fn test_large_integer_zero_digits_is_invalid() {
        let mut sampler = Sampler::new(Scripted::new(&[]));
        assert!(matches!(
            sampler.large_integer(0),
            Err(QuantumError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_large_integer_beyond_u64() {
        let mut sampler = pseudo_sampler(11);
        let value = sampler.large_integer(40).unwrap();
        assert!(value.to_str_radix(10).len() <= 40);
        assert_eq!(sampler.draws(), 40);
    }

    #[test]
    fn test_random_indexed_rejects_until_in_range() {
        // end = 25: draws 99 (reject), 30 (reject), 07 (accept).
        let script = [
            digit(9),
            digit(9),
            digit(3),
            digit(0),
            digit(0),
            digit(7),
        ];
        let mut sampler = Sampler::new(Scripted::new(&script));
        let value = sampler.random_indexed(&BigUint::from(25u32)).unwrap();
        assert_eq!(value, BigUint::from(7u32));
        assert_eq!(sampler.rejections(), 2);
    }

    #[test]
    fn test_rejection_cap_is_reported() {
        let script = [digit(9), digit(9), digit(8), digit(8), digit(0), digit(1)];
        let mut sampler =
            Sampler::with_policy(Scripted::new(&script), RejectionPolicy::capped(2));
        assert_eq!(
            sampler.random_indexed(&BigUint::from(25u32)),
            Err(QuantumError::RejectionExhausted { attempts: 2 })
        );
        assert_eq!(sampler.rejections(), 2);
    }

    #[test]
    fn test_random_indexed_huge_bound() {
        let end: BigUint = "123456789012345678901234567890".parse().unwrap();
        let mut sampler = pseudo_sampler(5);
        for _ in 0..20 {
            assert!(sampler.random_indexed(&end).unwrap() <= end);
        }
    }

    #[test]
    fn test_pick_without_replacement_is_permutation() {
        let items: Vec<u32> = (0..30).collect();
        let original = items.clone();
        let mut sampler = pseudo_sampler(21);

        let mut picked = sampler.pick(&items, items.len(), false).unwrap();
        assert_eq!(items, original);
        picked.sort_unstable();
        assert_eq!(picked, original);
    }

    #[test]
    fn test_pick_too_many_without_replacement() {
        let mut sampler = pseudo_sampler(1);
        match sampler.pick(&[1, 2, 3], 4, false) {
            Err(QuantumError::InvalidArgument(msg)) => {
                assert_eq!(msg, "requested 4 items but only 3 available")
            }
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
        assert_eq!(sampler.draws(), 0);
        assert_eq!(sampler.pick(&[1, 2, 3], 3, false).unwrap().len(), 3);
    }

    #[test]
    fn test_pick_with_replacement_may_exceed_length() {
        let mut sampler = pseudo_sampler(8);
        let picked = sampler.pick(&['x', 'y'], 10, true).unwrap();
        assert_eq!(picked.len(), 10);
        assert!(picked.iter().all(|c| *c == 'x' || *c == 'y'));

        let empty: [char; 0] = [];
        assert!(matches!(
            sampler.pick(&empty, 1, true),
            Err(QuantumError::InvalidArgument(_))
        ));
        assert_eq!(sampler.pick(&empty, 0, true).unwrap(), Vec::<char>::new());
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        let mut sampler = pseudo_sampler(2);
        assert!(sampler.shuffle::<u8>(&[]).unwrap().is_empty());
        assert_eq!(sampler.shuffle(&["only"]).unwrap(), vec!["only"]);
    }

    #[test]
    fn test_gaussian_discards_rejected_pairs() {
        // (0, 0) is rejected; (32768, 32768) is accepted with z close to 0.
        let mut sampler = Sampler::new(Scripted::new(&[0, 0, 32768, 32768]));
        let value = sampler.gaussian(10.0, 2.0).unwrap();
        assert!((value - 10.0).abs() < 1e-6);
        assert_eq!(sampler.draws(), 4);
        assert_eq!(sampler.rejections(), 1);
    }

    #[test]
    fn test_gaussians_returns_exact_length() {
        let mut sampler = pseudo_sampler(13);
        let values = sampler.gaussians(500, 0.0, 1.0).unwrap();
        assert_eq!(values.len(), 500);
        assert!(values.iter().all(|v| v.is_finite()));
        assert!(sampler.draws() >= 1000);
    }

    #[test]
    fn test_producer_failure_surfaces_from_sampler() {
        let mut sampler = Sampler::new(Scripted::new(&[digit(1)]));
        assert!(matches!(
            sampler.large_integer(2),
            Err(QuantumError::Producer(SourceError::Transport(_)))
        ));
    }
}
