// SPDX-License-Identifier: MIT

//! Hann window precomputation for smoothing the occupancy-error ring.

use std::f64::consts::PI;

/// A Hann window of length `n`: `0.5 * (1 - cos(2*pi*i/(n-1)))`.
///
/// `n` must be at least 2; a window of length 1 would divide by zero.
pub fn hann(n: usize) -> Vec<f64> {
    assert!(n >= 2, "Hann window requires at least 2 samples");
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / (n - 1) as f64).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_near_zero() {
        let w = hann(512);
        assert!(w[0].abs() < 1e-9);
        assert!(w[511].abs() < 1e-9);
    }

    #[test]
    fn midpoint_is_near_one() {
        let w = hann(513);
        assert!((w[256] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn length_matches_request() {
        assert_eq!(hann(512).len(), 512);
    }

    #[test]
    #[should_panic]
    fn rejects_length_one() {
        hann(1);
    }
}
