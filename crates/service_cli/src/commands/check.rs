//! Check command: statistical self-test of the configured source
//!
//! Draws `observations` digits and Gaussian variates, then reports the
//! chi-square uniformity verdict and the Gaussian parameter verdict.

use std::io::Write;

use quantum_core::stats::{
    chi_square_uniform, histogram, ChiSquareVerdict, GaussianVerdict, Moments,
};
use quantum_core::{BufferedStream, RawSource, Sampler};
use tracing::{info, warn};

use crate::{CliError, Result};

/// Verdicts from one check run
#[derive(Debug, Clone, Copy)]
pub struct CheckReport {
    pub chi_square: f64,
    pub digits: ChiSquareVerdict,
    pub moments: Moments,
    pub gaussian: GaussianVerdict,
    pub fallbacks: u64,
}

impl CheckReport {
    /// Whether both verdicts are acceptable
    pub fn is_acceptable(&self) -> bool {
        self.digits.is_acceptable() && self.gaussian.is_acceptable()
    }
}

/// Run the uniformity and Gaussian checks, writing a summary to `out`
pub fn run<W: Write>(
    sampler: &mut Sampler<BufferedStream<RawSource>>,
    observations: usize,
    out: &mut W,
) -> Result<CheckReport> {
    if observations == 0 {
        return Err(CliError::InvalidArgument(
            "observations must be positive".to_string(),
        ));
    }

    info!(observations, "running statistical check");

    let digits = sampler.integers(observations, 9)?;
    let counts = histogram(digits, 10);
    let chi_square = chi_square_uniform(&counts);
    let digit_verdict = ChiSquareVerdict::from_statistic(chi_square);

    let gaussians = sampler.gaussians(observations, 0.0, 1.0)?;
    let moments = Moments::of(&gaussians).ok_or_else(|| {
        CliError::InvalidArgument("no Gaussian observations drawn".to_string())
    })?;
    let gaussian_verdict = GaussianVerdict::evaluate(&moments, 0.0, 1.0);

    let fallbacks = sampler.supply().producer().fallbacks();
    if fallbacks > 0 {
        warn!(fallbacks, "authentic source failed, now pseudo simulation");
    }

    writeln!(out, "source: {}", sampler.supply().producer().kind())?;
    writeln!(out, "observations: {}", observations)?;
    writeln!(out, "digit counts: {:?}", counts)?;
    writeln!(out, "chi-square (9 df): {:.3}  {}", chi_square, digit_verdict)?;
    writeln!(
        out,
        "gaussian mean: {:.5}  sdev: {:.5}  {}",
        moments.mean, moments.std_dev, gaussian_verdict
    )?;
    writeln!(
        out,
        "draws: {}  rejections: {}  fallbacks: {}",
        sampler.draws(),
        sampler.rejections(),
        fallbacks
    )?;

    Ok(CheckReport {
        chi_square,
        digits: digit_verdict,
        moments,
        gaussian: gaussian_verdict,
        fallbacks,
    })
}
