// SPDX-License-Identifier: MIT

//! The per-callback resampling engine: drift recovery, occupancy
//! measurement, and the final interpolation pass that produces exactly
//! `nframes` output samples per channel.

use crate::capture::CaptureDevice;
use crate::controller::{PiController, PiControllerConfig};
use crate::error::ResamplerError;

const CHANNELS: usize = 2;
const MAX_READ_RETRIES: u32 = 8;

/// Configuration fixed at audio-graph startup.
#[derive(Debug, Clone, Copy)]
pub struct ResamplerConfig {
    pub target_delay: u32,
    pub max_diff: u32,
    pub controller: PiControllerConfig,
}

impl ResamplerConfig {
    /// `target_delay = num_periods*period_size/2 + jack_buffer/2`;
    /// `max_diff = num_periods*period_size - target_delay`.
    pub fn from_buffer_sizes(
        num_periods: u32,
        period_size: u32,
        jack_buffer: u32,
        static_resample_factor: f64,
    ) -> Self {
        let target_delay = num_periods * period_size / 2 + jack_buffer / 2;
        let max_diff = num_periods * period_size - target_delay;
        Self {
            target_delay,
            max_diff,
            controller: PiControllerConfig {
                static_resample_factor,
                ..Default::default()
            },
        }
    }
}

/// A snapshot of the engine's internal state, read by the supervisor thread
/// for periodic debug logging.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResamplerTelemetry {
    pub output_resampling_factor: f64,
    pub output_new_delay: i64,
    pub output_offset: f64,
    pub output_integral: f64,
    pub output_diff: i64,
    pub drift_recoveries: u64,
}

/// Owns the PI controller and drives one capture device through the
/// drift-recovery + resample algorithm each callback.
pub struct ResamplerEngine {
    config: ResamplerConfig,
    controller: PiController,
    telemetry: ResamplerTelemetry,
}

impl ResamplerEngine {
    pub fn new(config: ResamplerConfig) -> Self {
        Self {
            controller: PiController::new(config.controller),
            config,
            telemetry: ResamplerTelemetry::default(),
        }
    }

    pub fn telemetry(&self) -> ResamplerTelemetry {
        self.telemetry
    }

    /// Run one audio-graph callback: produce exactly `nframes` output
    /// samples per channel in `output` (one `Vec<f32>` per channel, each
    /// resized to `nframes`).
    pub fn process(
        &mut self,
        nframes: usize,
        device: &mut dyn CaptureDevice,
        output: &mut [Vec<f32>],
    ) -> Result<ResamplerTelemetry, ResamplerError> {
        if output.len() != CHANNELS {
            return Err(ResamplerError::ChannelMismatch {
                expected: CHANNELS,
                actual: output.len(),
            });
        }

        let mut delay = device.available() as i64;
        self.recover_drift(&mut delay, device)?;

        let offset = (delay - self.config.target_delay as i64) as f64;
        let r = self.controller.step(offset);

        let rlen = (nframes as f64 / r).ceil() as usize + 2;
        let input = self.read_with_retry(rlen, device)?;
        let input_frames_available = input.len() / CHANNELS;

        let mut last_used = 0usize;
        for (channel, out_channel) in output.iter_mut().enumerate() {
            out_channel.clear();
            out_channel.resize(nframes, 0.0);
            last_used = last_used.max(resample_channel(
                &input,
                channel,
                input_frames_available,
                r,
                out_channel,
            ));
        }

        if last_used < input_frames_available {
            device.rewind(input_frames_available - last_used)?;
        }

        self.telemetry = ResamplerTelemetry {
            output_resampling_factor: r,
            output_new_delay: delay,
            output_offset: offset,
            output_integral: self.controller.offset_integral(),
            output_diff: delay - self.config.target_delay as i64,
            drift_recoveries: self.telemetry.drift_recoveries,
        };
        Ok(self.telemetry)
    }

    fn recover_drift(
        &mut self,
        delay: &mut i64,
        device: &mut dyn CaptureDevice,
    ) -> Result<(), ResamplerError> {
        let target = self.config.target_delay as i64;
        let band = self.config.max_diff as i64;

        if *delay > target + band {
            let skip = (*delay - target) as usize;
            self.discard_frames(skip, device)?;
            *delay = target;
            self.controller.reset_after_drift_correction();
            self.telemetry.drift_recoveries += 1;
            tracing::debug!(skip, "resampler drift recovery: skipped ahead capture buffer");
        } else if *delay < target - band {
            let rewind = (target - *delay) as usize;
            device.rewind(rewind)?;
            *delay = target;
            self.controller.reset_after_drift_correction();
            self.telemetry.drift_recoveries += 1;
            tracing::debug!(rewind, "resampler drift recovery: rewound capture buffer behind");
        }
        Ok(())
    }

    fn discard_frames(
        &self,
        mut remaining: usize,
        device: &mut dyn CaptureDevice,
    ) -> Result<(), ResamplerError> {
        let mut attempts = 0;
        while remaining > 0 {
            match device.read(remaining) {
                Ok(frames) => {
                    let read = frames.len() / CHANNELS;
                    if read == 0 {
                        device.recover()?;
                    } else {
                        remaining = remaining.saturating_sub(read);
                    }
                }
                Err(_) if attempts < MAX_READ_RETRIES => {
                    device.recover()?;
                }
                Err(e) => return Err(e),
            }
            attempts += 1;
            if attempts > MAX_READ_RETRIES {
                return Err(ResamplerError::CaptureHardFailure {
                    attempts,
                    message: "drift recovery discard exceeded retry budget".into(),
                });
            }
        }
        Ok(())
    }

    fn read_with_retry(
        &self,
        frames: usize,
        device: &mut dyn CaptureDevice,
    ) -> Result<Vec<i16>, ResamplerError> {
        let mut attempts = 0;
        loop {
            match device.read(frames) {
                Ok(samples) if samples.len() / CHANNELS >= frames.saturating_sub(1) => {
                    return Ok(samples)
                }
                Ok(_) | Err(_) if attempts < MAX_READ_RETRIES => {
                    attempts += 1;
                    device.recover()?;
                }
                Ok(samples) => return Ok(samples),
                Err(e) => return Err(e),
            }
        }
    }
}

/// Linear-interpolation resample of one de-interleaved channel from
/// `input` (interleaved i16, `CHANNELS`-wide) into `out` (exactly
/// `out.len()` samples). Returns the number of input frames consumed.
fn resample_channel(
    input: &[i16],
    channel: usize,
    input_frames: usize,
    ratio: f64,
    out: &mut [f32],
) -> usize {
    let sample_at = |frame: usize| -> f32 {
        let frame = frame.min(input_frames.saturating_sub(1));
        input[frame * CHANNELS + channel] as f32 / 32767.0
    };

    let mut max_frame_used = 0usize;
    for (n, slot) in out.iter_mut().enumerate() {
        let input_pos = n as f64 / ratio;
        let idx = input_pos.floor() as usize;
        let frac = input_pos - idx as f64;
        let a = sample_at(idx);
        let b = sample_at(idx + 1);
        *slot = a + (b - a) * frac as f32;
        max_frame_used = max_frame_used.max(idx + 1);
    }
    max_frame_used.min(input_frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDevice {
        available: u32,
        samples: Vec<i16>,
        rewound: usize,
        recoveries: u32,
    }

    impl FixedDevice {
        fn new(available: u32, frames: usize) -> Self {
            let samples = (0..frames * CHANNELS)
                .map(|i| (i % 1000) as i16)
                .collect();
            Self {
                available,
                samples,
                rewound: 0,
                recoveries: 0,
            }
        }
    }

    impl CaptureDevice for FixedDevice {
        fn available(&self) -> u32 {
            self.available
        }

        fn read(&mut self, frames: usize) -> Result<Vec<i16>, ResamplerError> {
            let take = frames.min(self.samples.len() / CHANNELS);
            Ok(self.samples[..take * CHANNELS].to_vec())
        }

        fn rewind(&mut self, frames: usize) -> Result<(), ResamplerError> {
            self.rewound += frames;
            Ok(())
        }

        fn recover(&mut self) -> Result<(), ResamplerError> {
            self.recoveries += 1;
            Ok(())
        }
    }

    fn config() -> ResamplerConfig {
        ResamplerConfig::from_buffer_sizes(3, 1024, 512, 1.0)
    }

    #[test]
    fn produces_exactly_nframes_per_channel() {
        let mut engine = ResamplerEngine::new(config());
        let mut device = FixedDevice::new(config().target_delay, 4096);
        let mut output = vec![Vec::new(), Vec::new()];

        engine.process(1024, &mut device, &mut output).unwrap();

        assert_eq!(output[0].len(), 1024);
        assert_eq!(output[1].len(), 1024);
    }

    #[test]
    fn ratio_stays_within_clamp_range() {
        let mut engine = ResamplerEngine::new(config());
        let mut device = FixedDevice::new(config().target_delay, 4096);
        let mut output = vec![Vec::new(), Vec::new()];

        let telemetry = engine.process(1024, &mut device, &mut output).unwrap();
        assert!((0.25..=4.0).contains(&telemetry.output_resampling_factor));
    }

    #[test]
    fn excess_occupancy_triggers_drift_recovery() {
        let cfg = config();
        let mut engine = ResamplerEngine::new(cfg);
        let far_ahead = cfg.target_delay + cfg.max_diff + 10_000;
        let mut device = FixedDevice::new(far_ahead, 1 << 20);
        let mut output = vec![Vec::new(), Vec::new()];

        let telemetry = engine.process(1024, &mut device, &mut output).unwrap();
        assert_eq!(telemetry.drift_recoveries, 1);
    }

    #[test]
    fn deficient_occupancy_triggers_rewind_recovery() {
        let cfg = config();
        let mut engine = ResamplerEngine::new(cfg);
        let far_behind = cfg.target_delay.saturating_sub(cfg.max_diff + 10_000);
        let mut device = FixedDevice::new(far_behind, 4096);
        let mut output = vec![Vec::new(), Vec::new()];

        let telemetry = engine.process(1024, &mut device, &mut output).unwrap();
        assert_eq!(telemetry.drift_recoveries, 1);
        assert!(device.rewound > 0);
    }

    #[test]
    fn channel_count_mismatch_is_rejected() {
        let mut engine = ResamplerEngine::new(config());
        let mut device = FixedDevice::new(config().target_delay, 4096);
        let mut output = vec![Vec::new()];

        let err = engine.process(1024, &mut device, &mut output).unwrap_err();
        assert!(matches!(err, ResamplerError::ChannelMismatch { .. }));
    }

    #[test]
    fn unconsumed_input_is_rewound() {
        let mut engine = ResamplerEngine::new(config());
        let mut device = FixedDevice::new(config().target_delay, 1 << 16);
        let mut output = vec![Vec::new(), Vec::new()];

        engine.process(512, &mut device, &mut output).unwrap();
        assert!(device.rewound > 0, "residual input frames should be returned");
    }
}
