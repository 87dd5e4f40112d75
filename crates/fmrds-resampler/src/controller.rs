// SPDX-License-Identifier: MIT

//! The smoothed PI controller over capture-buffer occupancy error.
//!
//! This module holds only the numeric core (ring buffer, smoothing,
//! integral, quantization, clamp) so it can be tested without a capture
//! device. [`crate::engine::ResamplerEngine`] drives it with the occupancy
//! error measured each callback.

use crate::window;

/// Tunable constants for the controller, matching the resampler's declared
/// defaults.
#[derive(Debug, Clone, Copy)]
pub struct PiControllerConfig {
    /// Ring length for the smoothing window. Fixed at 512 by default.
    pub smooth_size: usize,
    /// Nominal output/input rate ratio.
    pub static_resample_factor: f64,
    /// Below this smoothed-offset magnitude, the proportional term is
    /// clamped to zero to avoid chasing jitter.
    pub pclamp: f64,
    /// Quantization step count for the output ratio.
    pub controlquant: f64,
    /// Proportional gain divisor (`K1`).
    pub catch_factor: f64,
    /// Integral gain divisor (`K2`).
    pub catch_factor2: f64,
}

impl Default for PiControllerConfig {
    fn default() -> Self {
        Self {
            smooth_size: 512,
            static_resample_factor: 1.0,
            pclamp: 15.0,
            controlquant: 10000.0,
            catch_factor: 100_000.0,
            catch_factor2: 10_000.0,
        }
    }
}

/// The smoothed PI controller state, mutated once per audio callback.
#[derive(Debug, Clone)]
pub struct PiController {
    config: PiControllerConfig,
    offset_array: Vec<f64>,
    window: Vec<f64>,
    offset_index: usize,
    offset_integral: f64,
    resample_mean: f64,
}

impl PiController {
    pub fn new(config: PiControllerConfig) -> Self {
        let offset_array = vec![0.0; config.smooth_size];
        let window = window::hann(config.smooth_size);
        Self {
            resample_mean: config.static_resample_factor,
            config,
            offset_array,
            window,
            offset_index: 0,
            offset_integral: 0.0,
        }
    }

    pub fn resample_mean(&self) -> f64 {
        self.resample_mean
    }

    pub fn offset_integral(&self) -> f64 {
        self.offset_integral
    }

    /// Called by the engine after a drift-recovery skip or rewind: clears
    /// the smoothing ring and reseeds the integral term from the current
    /// resample mean so the controller doesn't re-chase the just-corrected
    /// error.
    pub fn reset_after_drift_correction(&mut self) {
        self.offset_array.iter_mut().for_each(|v| *v = 0.0);
        self.offset_integral = -(self.resample_mean - self.config.static_resample_factor)
            * self.config.catch_factor
            * self.config.catch_factor2;
    }

    /// Steps 3..=10 of the per-callback algorithm: push `offset` into the
    /// ring, smooth it with the Hann window, update the integral, and
    /// return the quantized, clamped resampling ratio for this cycle.
    pub fn step(&mut self, offset: f64) -> f64 {
        let n = self.config.smooth_size;
        self.offset_array[self.offset_index % n] = offset;
        self.offset_index += 1;

        let mut smooth_offset = 0.0;
        for i in 0..n {
            let idx = (self.offset_index - 1 + i) % n;
            smooth_offset += self.window[i] * self.offset_array[idx];
        }
        smooth_offset /= n as f64;

        self.offset_integral += smooth_offset;

        let p_term = if smooth_offset.abs() < self.config.pclamp {
            0.0
        } else {
            smooth_offset
        };

        let mut r = self.config.static_resample_factor
            - p_term / self.config.catch_factor
            - self.offset_integral / (self.config.catch_factor * self.config.catch_factor2);

        r = ((r - self.resample_mean) * self.config.controlquant).round() / self.config.controlquant
            + self.resample_mean;

        r = r.clamp(0.25, 4.0);

        self.resample_mean = 0.9999 * self.resample_mean + 0.0001 * r;
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_offset_converges_to_static_factor() {
        let config = PiControllerConfig {
            static_resample_factor: 1.0,
            ..Default::default()
        };
        let mut controller = PiController::new(config);
        let mut r = 0.0;
        for _ in 0..1000 {
            r = controller.step(0.0);
        }
        assert!((r - 1.0).abs() < 1e-6);
        assert!((controller.resample_mean() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ratio_is_always_clamped() {
        let mut controller = PiController::new(PiControllerConfig::default());
        for _ in 0..2000 {
            let r = controller.step(1_000_000.0);
            assert!((0.25..=4.0).contains(&r));
        }
    }

    #[test]
    fn negative_offset_lowers_the_ratio_below_one() {
        let mut controller = PiController::new(PiControllerConfig::default());
        let mut r = 1.0;
        for _ in 0..50 {
            r = controller.step(-1000.0);
        }
        assert!(r <= 1.0);
    }

    #[test]
    fn reset_after_drift_correction_clears_ring_and_reseeds_integral() {
        let mut controller = PiController::new(PiControllerConfig::default());
        for _ in 0..100 {
            controller.step(500.0);
        }
        assert_ne!(controller.offset_integral(), 0.0);

        controller.reset_after_drift_correction();
        assert!(controller.offset_array.iter().all(|&v| v == 0.0));
        let expected = -(controller.resample_mean() - controller.config.static_resample_factor)
            * controller.config.catch_factor
            * controller.config.catch_factor2;
        assert_eq!(controller.offset_integral(), expected);
    }

    #[test]
    fn small_offsets_are_clamped_to_zero_proportional_term() {
        // With pclamp=15 and an offset well under that after smoothing,
        // repeated small pushes should not move the ratio off the mean
        // by more than the quantization step.
        let mut controller = PiController::new(PiControllerConfig::default());
        let r = controller.step(1.0);
        assert!((r - 1.0).abs() < 1e-3);
    }
}
