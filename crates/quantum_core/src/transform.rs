//! Pure raw-to-value mappings.
//!
//! Each function maps one or two [`RawSample`] values to a derived value and
//! has no state. Looping transforms (rejection sampling, multi-digit integers)
//! live in [`crate::sampler`] on top of these.
//!
//! ## Rescaling
//!
//! - [`to_uniform_real`] divides by [`RAW_SPAN`] (65536), so the result lies
//!   in the half-open interval `[0, endpoint)`.
//! - [`to_bounded_integer`] rescales the closed raw range `[0, 65535]` onto
//!   `[0, upper + 1 - BOUNDARY_EPSILON]` and truncates, so the largest raw
//!   value lands exactly on `upper`.

use crate::source::{RawSample, RAW_MAX};

/// Number of distinct raw values.
pub const RAW_SPAN: f64 = 65536.0;

/// Endpoint used for uniform reals feeding the Gaussian transform.
pub const OPEN_UNIT_ENDPOINT: f64 = 0.999_999_999;

/// Gap kept below `upper + 1` when rescaling to a bounded integer.
pub const BOUNDARY_EPSILON: f64 = 1e-9;

/// Kinderman–Monahan constant, `4 * exp(-0.5) / sqrt(2)`.
pub const NV_MAGICCONST: f64 = 1.715_527_769_921_41;

/// Parity of a raw sample: odd is `true`, even is `false`.
///
/// # Examples
///
/// ```
/// use quantum_core::transform::to_boolean;
///
/// assert!(!to_boolean(40732));
/// assert!(to_boolean(7731));
/// ```
#[inline]
pub fn to_boolean(raw: RawSample) -> bool {
    raw % 2 == 1
}

/// Rescale a raw sample to a real in `[0, endpoint)`.
///
/// # Examples
///
/// ```
/// use quantum_core::transform::to_uniform_real;
///
/// assert_eq!(to_uniform_real(0, 1.0), 0.0);
/// assert!(to_uniform_real(65535, 1.0) < 1.0);
/// ```
#[inline]
pub fn to_uniform_real(raw: RawSample, endpoint: f64) -> f64 {
    f64::from(raw) * (endpoint / RAW_SPAN)
}

/// Map a raw sample onto the integers `0..=upper`.
///
/// # Examples
///
/// ```
/// use quantum_core::transform::to_bounded_integer;
///
/// assert_eq!(to_bounded_integer(0, 9), 0);
/// assert_eq!(to_bounded_integer(65535, 9), 9);
/// ```
#[inline]
pub fn to_bounded_integer(raw: RawSample, upper: u16) -> u16 {
    let endpoint = f64::from(upper) + (1.0 - BOUNDARY_EPSILON);
    let scaled = f64::from(raw) * (endpoint / f64::from(RAW_MAX));
    scaled as u16
}

/// One Kinderman–Monahan ratio-of-uniforms trial.
///
/// `u1_raw` and `u2_raw` must be independent draws. Returns the standard
/// normal candidate `z` when accepted, `None` when rejected.
///
/// Reference: A. J. Kinderman and J. F. Monahan, "Computer generation of
/// random variables using the ratio of uniform deviates", ACM TOMS 3 (1977).
///
/// # Examples
///
/// ```
/// use quantum_core::transform::kinderman_monahan;
///
/// // u1 near 1/2 gives z near 0, which is always accepted.
/// assert!(kinderman_monahan(32768, 32768).is_some());
/// // u1 = 0 with u2 = 1 gives |z| > 0 against -ln(1) = 0: rejected.
/// assert!(kinderman_monahan(0, 0).is_none());
/// ```
#[inline]
pub fn kinderman_monahan(u1_raw: RawSample, u2_raw: RawSample) -> Option<f64> {
    let u1 = to_uniform_real(u1_raw, OPEN_UNIT_ENDPOINT);
    let u2 = 1.0 - to_uniform_real(u2_raw, OPEN_UNIT_ENDPOINT);
    let z = NV_MAGICCONST * (u1 - 0.5) / u2;
    let zz = z * z / 4.0;
    if zz <= -u2.ln() {
        Some(z)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_magic_constant_matches_definition() {
        let derived = 4.0 * (-0.5f64).exp() / 2.0f64.sqrt();
        assert_relative_eq!(NV_MAGICCONST, derived, epsilon = 1e-13);
    }

    #[test]
    fn test_boolean_is_parity_over_whole_range() {
        for raw in 0..=RAW_MAX {
            assert_eq!(u16::from(to_boolean(raw)), raw % 2);
        }
    }

    #[test]
    fn test_uniform_real_endpoints() {
        assert_eq!(to_uniform_real(0, 1.0), 0.0);

        let top = to_uniform_real(RAW_MAX, 1.0);
        assert!(top < 1.0);
        assert_relative_eq!(top, 0.999985, epsilon = 1e-6);

        assert_relative_eq!(to_uniform_real(32768, 2.0), 1.0);
    }

    #[test]
    fn test_bounded_integer_upper_boundary() {
        assert_eq!(to_bounded_integer(RAW_MAX, 9), 9);
        assert_eq!(to_bounded_integer(RAW_MAX, 1), 1);
        assert_eq!(to_bounded_integer(RAW_MAX, 0), 0);
        assert_eq!(to_bounded_integer(RAW_MAX, 100), 100);
        assert_eq!(to_bounded_integer(RAW_MAX, u16::MAX), u16::MAX);
    }

    #[test]
    fn test_bounded_integer_digits_cover_every_bin() {
        let mut counts = [0u32; 10];
        for raw in 0..=RAW_MAX {
            let d = to_bounded_integer(raw, 9);
            assert!(d <= 9, "raw {} mapped to {}", raw, d);
            counts[d as usize] += 1;
        }
        // 65536 raw values over 10 bins: every bin gets 6553 or 6554.
        for (digit, &count) in counts.iter().enumerate() {
            assert!(
                (6553..=6554).contains(&count),
                "digit {} has {} raw preimages",
                digit,
                count
            );
        }
    }

    #[test]
    fn test_bounded_integer_full_range_is_identity() {
        for raw in [0, 1, 2, 1000, 32767, 32768, 65534, 65535] {
            assert_eq!(to_bounded_integer(raw, u16::MAX), raw);
        }
    }

    #[test]
    fn test_kinderman_monahan_acceptance_rate() {
        // Exhaustive over a coarse grid of raw pairs.
        let mut accepted = 0usize;
        let mut total = 0usize;
        for u1 in (0..=RAW_MAX).step_by(257) {
            for u2 in (0..=RAW_MAX).step_by(257) {
                total += 1;
                if kinderman_monahan(u1, u2).is_some() {
                    accepted += 1;
                }
            }
        }
        let rate = accepted as f64 / total as f64;
        assert!(
            (0.70..0.76).contains(&rate),
            "acceptance rate {:.4} outside expected band",
            rate
        );
    }

    #[test]
    fn test_kinderman_monahan_near_zero() {
        let z = kinderman_monahan(32768, RAW_MAX).unwrap();
        assert_relative_eq!(z, 0.0, epsilon = 1e-3);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_uniform_real_in_half_open_interval(raw in any::<u16>(), endpoint in 0.001f64..1000.0) {
            let v = to_uniform_real(raw, endpoint);
            prop_assert!(v >= 0.0 && v < endpoint, "value {} endpoint {}", v, endpoint);
        }

        #[test]
        fn prop_bounded_integer_within_bounds(raw in any::<u16>(), upper in any::<u16>()) {
            prop_assert!(to_bounded_integer(raw, upper) <= upper);
        }

        #[test]
        fn prop_bounded_integer_is_monotone(raw in 0u16..RAW_MAX, upper in any::<u16>()) {
            prop_assert!(to_bounded_integer(raw, upper) <= to_bounded_integer(raw + 1, upper));
        }

        #[test]
        fn prop_accepted_gaussian_is_finite(u1 in any::<u16>(), u2 in any::<u16>()) {
            if let Some(z) = kinderman_monahan(u1, u2) {
                prop_assert!(z.is_finite());
                // |z| <= C / (2 * u2) with u2 >= 1 - 0.999999999 * 65535/65536.
                prop_assert!(z.abs() < 60_000.0);
            }
        }
    }
}
