//! Goodness-of-fit checks for validating a raw source.
//!
//! Two checks are provided, both evaluated against tabulated thresholds:
//!
//! - Pearson's chi-square test of decimal digits against a uniform
//!   distribution over 10 bins (9 degrees of freedom)
//! - sample mean and standard deviation of Gaussian draws against the
//!   requested parameters
//!
//! A failed check does not imply a broken source: at the 99% level one run in
//! a hundred fails by chance. Repeat before drawing conclusions.

use std::fmt;

/// Upper-tail chi-square critical value, 9 degrees of freedom, 90%.
pub const CHI_SQUARE_9DF_90: f64 = 14.68;
/// Upper-tail chi-square critical value, 9 degrees of freedom, 95%.
pub const CHI_SQUARE_9DF_95: f64 = 16.919;
/// Upper-tail chi-square critical value, 9 degrees of freedom, 99%.
pub const CHI_SQUARE_9DF_99: f64 = 21.666;

/// Two-sided normal quantile at 90%.
pub const Z_90: f64 = 1.645;
/// Two-sided normal quantile at 95%.
pub const Z_95: f64 = 1.960;
/// Two-sided normal quantile at 99%.
pub const Z_99: f64 = 2.575;

/// Allowed absolute deviation of the sample standard deviation.
pub const SDEV_TOLERANCE: f64 = 0.05;

/// Count how often each value in `0..bins` occurs; larger values are ignored.
pub fn histogram<I>(values: I, bins: usize) -> Vec<u64>
where
    I: IntoIterator,
    I::Item: Into<u64>,
{
    let mut counts = vec![0u64; bins];
    for value in values {
        let index = value.into();
        if let Some(slot) = usize::try_from(index).ok().and_then(|i| counts.get_mut(i)) {
            *slot += 1;
        }
    }
    counts
}

/// Pearson's chi-square statistic of `observed` against equal expectation.
///
/// # Examples
///
/// ```
/// use quantum_core::stats::chi_square_uniform;
///
/// assert_eq!(chi_square_uniform(&[10, 10, 10, 10]), 0.0);
/// assert_eq!(chi_square_uniform(&[20, 0]), 20.0);
/// ```
pub fn chi_square_uniform(observed: &[u64]) -> f64 {
    if observed.is_empty() {
        return 0.0;
    }
    let total: u64 = observed.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let expected = total as f64 / observed.len() as f64;
    observed
        .iter()
        .map(|&o| {
            let d = o as f64 - expected;
            d * d / expected
        })
        .sum()
}

/// Outcome of a chi-square uniformity check, worst level first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChiSquareVerdict {
    /// Below the 90% critical value.
    Pass,
    /// Above the 90% critical value only.
    Warning90,
    /// Above the 95% critical value.
    Fail95,
    /// Above the 99% critical value.
    Fail99,
}

impl ChiSquareVerdict {
    /// Classify a 9-degree-of-freedom statistic.
    pub fn from_statistic(chisq: f64) -> Self {
        if chisq > CHI_SQUARE_9DF_99 {
            ChiSquareVerdict::Fail99
        } else if chisq > CHI_SQUARE_9DF_95 {
            ChiSquareVerdict::Fail95
        } else if chisq > CHI_SQUARE_9DF_90 {
            ChiSquareVerdict::Warning90
        } else {
            ChiSquareVerdict::Pass
        }
    }

    /// `true` unless the 99% critical value was exceeded.
    pub fn is_acceptable(&self) -> bool {
        !matches!(self, ChiSquareVerdict::Fail99)
    }
}

impl fmt::Display for ChiSquareVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChiSquareVerdict::Pass => write!(f, "PASS"),
            ChiSquareVerdict::Warning90 => write!(f, "WARNING: chi-square at 90% significance"),
            ChiSquareVerdict::Fail95 => write!(f, "FAIL: chi-square at 95% significance"),
            ChiSquareVerdict::Fail99 => write!(f, "FAIL: chi-square at 99% significance"),
        }
    }
}

/// Sample mean and population standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation (divides by `n`).
    pub std_dev: f64,
    /// Number of observations.
    pub count: usize,
}

impl Moments {
    /// Compute moments; `None` for an empty sample.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std_dev: variance.sqrt(),
            count: values.len(),
        })
    }
}

/// Outcome of the Gaussian parameter check, worst level first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaussianVerdict {
    /// Mean and standard deviation within every tolerance.
    Pass,
    /// Mean outside the 90% band only.
    MeanWarning90,
    /// Standard deviation more than [`SDEV_TOLERANCE`] away.
    SdevWarning,
    /// Mean outside the 95% band.
    MeanFail95,
    /// Mean outside the 99% band.
    MeanFail99,
}

impl GaussianVerdict {
    /// Check `moments` against the requested `mean` and `sdev`.
    ///
    /// The standard deviation tolerance is relative to `sdev`.
    pub fn evaluate(moments: &Moments, mean: f64, sdev: f64) -> Self {
        let standard_error = sdev / (moments.count as f64).sqrt();
        let offset = (moments.mean - mean).abs();

        if offset > Z_99 * standard_error {
            GaussianVerdict::MeanFail99
        } else if offset > Z_95 * standard_error {
            GaussianVerdict::MeanFail95
        } else if (moments.std_dev - sdev).abs() > SDEV_TOLERANCE * sdev {
            GaussianVerdict::SdevWarning
        } else if offset > Z_90 * standard_error {
            GaussianVerdict::MeanWarning90
        } else {
            GaussianVerdict::Pass
        }
    }

    /// `true` unless the mean left the 99% band or the deviation is off.
    pub fn is_acceptable(&self) -> bool {
        !matches!(
            self,
            GaussianVerdict::MeanFail99 | GaussianVerdict::SdevWarning
        )
    }
}

impl fmt::Display for GaussianVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GaussianVerdict::Pass => write!(f, "PASS"),
            GaussianVerdict::MeanWarning90 => write!(f, "WARNING: dubious mean at 90% significance"),
            GaussianVerdict::SdevWarning => write!(f, "WARNING: sdev exceeded 5% tolerance"),
            GaussianVerdict::MeanFail95 => write!(f, "FAIL: dubious mean at 95% significance"),
            GaussianVerdict::MeanFail99 => write!(f, "FAIL: dubious mean at 99% significance"),
        }
    }
}
