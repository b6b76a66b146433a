//! Draw commands: raw, bits, reals, ints, seed, gauss, index, pick, shuffle

use std::io::Write;

use num_bigint::BigUint;
use quantum_core::{RawSupply, Sampler};
use tracing::debug;

use crate::{CliError, Result};

/// Raw samples in [0, 65535]
pub fn raw<S: RawSupply, W: Write>(sampler: &mut Sampler<S>, count: usize, out: &mut W) -> Result<()> {
    for _ in 0..count {
        writeln!(out, "{}", sampler.raw()?)?;
    }
    Ok(())
}

/// Coin flips printed as 0/1
pub fn bits<S: RawSupply, W: Write>(sampler: &mut Sampler<S>, count: usize, out: &mut W) -> Result<()> {
    for bit in sampler.booleans(count)? {
        writeln!(out, "{}", u8::from(bit))?;
    }
    Ok(())
}

/// Reals in [0, endpoint)
pub fn reals<S: RawSupply, W: Write>(
    sampler: &mut Sampler<S>,
    count: usize,
    endpoint: f64,
    out: &mut W,
) -> Result<()> {
    if !(endpoint.is_finite() && endpoint > 0.0) {
        return Err(CliError::InvalidArgument(format!(
            "endpoint must be a positive number, got {}",
            endpoint
        )));
    }
    for value in sampler.reals(count, endpoint)? {
        writeln!(out, "{}", value)?;
    }
    Ok(())
}

/// Integers in [0, max]
pub fn ints<S: RawSupply, W: Write>(
    sampler: &mut Sampler<S>,
    count: usize,
    max: u16,
    out: &mut W,
) -> Result<()> {
    for value in sampler.integers(count, max)? {
        writeln!(out, "{}", value)?;
    }
    Ok(())
}

/// One integer built from `digits` random decimal digits
pub fn seed<S: RawSupply, W: Write>(sampler: &mut Sampler<S>, digits: usize, out: &mut W) -> Result<()> {
    let value = sampler.large_integer(digits)?;
    writeln!(out, "{}", value)?;
    Ok(())
}

/// Normal variates
pub fn gauss<S: RawSupply, W: Write>(
    sampler: &mut Sampler<S>,
    count: usize,
    mean: f64,
    sdev: f64,
    out: &mut W,
) -> Result<()> {
    for value in sampler.gaussians(count, mean, sdev)? {
        writeln!(out, "{}", value)?;
    }
    debug!(
        draws = sampler.draws(),
        rejections = sampler.rejections(),
        "gaussian draws complete"
    );
    Ok(())
}

/// `count` uniform integers in [0, end] for a decimal `end` of any size
pub fn index<S: RawSupply, W: Write>(
    sampler: &mut Sampler<S>,
    end: &str,
    count: usize,
    out: &mut W,
) -> Result<()> {
    let end: BigUint = end
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidArgument(format!("'{}' is not a non-negative integer", end)))?;
    for _ in 0..count {
        writeln!(out, "{}", sampler.random_indexed(&end)?)?;
    }
    Ok(())
}

/// Select `count` items, with or without replacement
pub fn pick<S: RawSupply, W: Write>(
    sampler: &mut Sampler<S>,
    items: &[String],
    count: usize,
    replace: bool,
    out: &mut W,
) -> Result<()> {
    for item in sampler.pick(items, count, replace)? {
        writeln!(out, "{}", item)?;
    }
    Ok(())
}

/// Random permutation of the items
pub fn shuffle<S: RawSupply, W: Write>(sampler: &mut Sampler<S>, items: &[String], out: &mut W) -> Result<()> {
    for item in sampler.shuffle(items)? {
        writeln!(out, "{}", item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{lines, seeded_sampler};
    use quantum_core::QuantumError;

    #[test]
    fn test_raw_and_bits_line_counts() {
        let mut sampler = seeded_sampler(1);
        let mut out = Vec::new();
        raw(&mut sampler, 100, &mut out).unwrap();
        let values = lines(&out);
        assert_eq!(values.len(), 100);
        assert!(values.iter().all(|v| v.parse::<u16>().is_ok()));

        let mut out = Vec::new();
        bits(&mut sampler, 50, &mut out).unwrap();
        assert!(lines(&out).iter().all(|v| v == "0" || v == "1"));
    }

    #[test]
    fn test_reals_range_and_bad_endpoint() {
        let mut sampler = seeded_sampler(2);
        let mut out = Vec::new();
        reals(&mut sampler, 200, 5.0, &mut out).unwrap();
        for line in lines(&out) {
            let v: f64 = line.parse().unwrap();
            assert!((0.0..5.0).contains(&v));
        }

        assert!(matches!(
            reals(&mut sampler, 1, -1.0, &mut Vec::new()),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_ints_within_max() {
        let mut sampler = seeded_sampler(3);
        let mut out = Vec::new();
        ints(&mut sampler, 500, 6, &mut out).unwrap();
        assert!(lines(&out).iter().all(|v| v.parse::<u16>().unwrap() <= 6));
    }

    #[test]
    fn test_seed_has_at_most_requested_digits() {
        let mut sampler = seeded_sampler(4);
        let mut out = Vec::new();
        seed(&mut sampler, 19, &mut out).unwrap();
        let value = &lines(&out)[0];
        assert!(value.len() <= 19);
        assert!(value.chars().all(|c| c.is_ascii_digit()));

        assert!(matches!(
            seed(&mut sampler, 0, &mut Vec::new()),
            Err(CliError::Quantum(QuantumError::InvalidArgument(_)))
        ));
    }

    #[test]
    fn test_gauss_writes_exact_count() {
        let mut sampler = seeded_sampler(5);
        let mut out = Vec::new();
        gauss(&mut sampler, 25, 10.0, 0.5, &mut out).unwrap();
        assert_eq!(lines(&out).len(), 25);
    }

    #[test]
    fn test_index_parses_big_bounds() {
        let mut sampler = seeded_sampler(6);
        let mut out = Vec::new();
        index(&mut sampler, "100000000000000000000000", 3, &mut out).unwrap();
        let bound: BigUint = "100000000000000000000000".parse().unwrap();
        for line in lines(&out) {
            assert!(line.parse::<BigUint>().unwrap() <= bound);
        }

        assert!(matches!(
            index(&mut sampler, "-3", 1, &mut Vec::new()),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_pick_and_shuffle() {
        let items: Vec<String> = ["red", "green", "blue"].iter().map(|s| s.to_string()).collect();
        let mut sampler = seeded_sampler(7);

        let mut out = Vec::new();
        shuffle(&mut sampler, &items, &mut out).unwrap();
        let mut shuffled = lines(&out);
        shuffled.sort();
        let mut expected = items.clone();
        expected.sort();
        assert_eq!(shuffled, expected);

        assert!(matches!(
            pick(&mut sampler, &items, 4, false, &mut Vec::new()),
            Err(CliError::Quantum(QuantumError::InvalidArgument(_)))
        ));

        let mut out = Vec::new();
        pick(&mut sampler, &items, 6, true, &mut out).unwrap();
        assert_eq!(lines(&out).len(), 6);
    }
}
