//! Statistical validation of the transforms over a pseudo source.
//!
//! These are statistical, not exact, properties: any single run can fail by
//! chance at the stated significance. Each check therefore runs several
//! independent trials and requires a clear majority to pass.

use quantum_core::source::PseudoSource;
use quantum_core::stats::{
    chi_square_uniform, histogram, ChiSquareVerdict, GaussianVerdict, Moments, CHI_SQUARE_9DF_99,
    SDEV_TOLERANCE, Z_99,
};
use quantum_core::{BufferedStream, Sampler};

const N: usize = 2040;
const TRIALS: u64 = 7;
const REQUIRED: usize = 5;

fn sampler(seed: u64) -> Sampler<BufferedStream<PseudoSource>> {
    Sampler::new(BufferedStream::new(PseudoSource::from_seed(seed), 1024).unwrap())
}

#[test]
fn test_digits_pass_chi_square_in_most_trials() {
    let passes = (0..TRIALS)
        .filter(|&seed| {
            let digits = sampler(1000 + seed).integers(N, 9).unwrap();
            let chisq = chi_square_uniform(&histogram(digits, 10));
            chisq <= CHI_SQUARE_9DF_99
        })
        .count();
    assert!(passes >= REQUIRED, "only {}/{} trials passed", passes, TRIALS);
}

#[test]
fn test_gaussian_parameters_in_most_trials() {
    let sqrt_n = (N as f64).sqrt();
    let passes = (0..TRIALS)
        .filter(|&seed| {
            let values = sampler(2000 + seed).gaussians(N, 0.0, 1.0).unwrap();
            let m = Moments::of(&values).unwrap();
            m.mean.abs() <= Z_99 / sqrt_n && (m.std_dev - 1.0).abs() <= SDEV_TOLERANCE
        })
        .count();
    assert!(passes >= REQUIRED, "only {}/{} trials passed", passes, TRIALS);
}

#[test]
fn test_verdicts_agree_with_thresholds() {
    let digits = sampler(3000).integers(N, 9).unwrap();
    let chisq = chi_square_uniform(&histogram(digits, 10));
    let verdict = ChiSquareVerdict::from_statistic(chisq);
    assert_eq!(verdict.is_acceptable(), chisq <= CHI_SQUARE_9DF_99);

    let values = sampler(3001).gaussians(N, 5.0, 2.0).unwrap();
    let m = Moments::of(&values).unwrap();
    let verdict = GaussianVerdict::evaluate(&m, 5.0, 2.0);
    if verdict == GaussianVerdict::Pass {
        assert!((m.mean - 5.0).abs() <= 1.645 * 2.0 / (N as f64).sqrt());
    }
}

#[test]
fn test_booleans_are_balanced() {
    let passes = (0..TRIALS)
        .filter(|&seed| {
            let bits = sampler(4000 + seed).booleans(N).unwrap();
            let ones = bits.iter().filter(|&&b| b).count() as u64;
            let chisq = chi_square_uniform(&[ones, N as u64 - ones]);
            // 1 degree of freedom, 99%.
            chisq <= 6.635
        })
        .count();
    assert!(passes >= REQUIRED, "only {}/{} trials passed", passes, TRIALS);
}

#[test]
fn test_gaussian_acceptance_rate_near_theory() {
    let mut s = sampler(5000);
    s.gaussians(10_000, 0.0, 1.0).unwrap();
    let candidates = s.draws() / 2;
    let rate = 10_000.0 / candidates as f64;
    assert!((0.70..0.76).contains(&rate), "acceptance rate {:.4}", rate);
    assert_eq!(s.rejections(), candidates - 10_000);
}

#[test]
fn test_shuffle_positions_are_uniform() {
    // Position of item 0 after shuffling 10 items, over many shuffles.
    let items: Vec<u8> = (0..10).collect();
    let mut s = sampler(6000);
    let mut positions = [0u64; 10];
    for _ in 0..N {
        let shuffled = s.shuffle(&items).unwrap();
        let pos = shuffled.iter().position(|&x| x == 0).unwrap();
        positions[pos] += 1;
    }
    // Single fixed-seed run at 99.9% (27.877) to keep flakiness negligible.
    assert!(chi_square_uniform(&positions) <= 27.877);
}
