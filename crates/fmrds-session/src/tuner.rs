// SPDX-License-Identifier: MIT

//! Tuner state and the abstract tuner device boundary (spec.md §6).

use crate::error::SessionError;

/// The device's native frequency resolution: `1/divider` MHz per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyDivider {
    /// 1/16 MHz per unit (62.5 kHz steps).
    Sixteen,
    /// 1/16000 MHz per unit (62.5 Hz steps).
    SixteenThousand,
}

impl FrequencyDivider {
    pub fn units(self) -> u32 {
        match self {
            FrequencyDivider::Sixteen => 16,
            FrequencyDivider::SixteenThousand => 16_000,
        }
    }

    pub fn to_mhz(self, raw: u32) -> f32 {
        raw as f32 / self.units() as f32
    }

    pub fn from_mhz(self, mhz: f32) -> u32 {
        (mhz * self.units() as f32).round() as u32
    }
}

bitflags::bitflags! {
    /// Capability flags reported by `query_capabilities`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TunerCapabilities: u32 {
        const LOW = 1 << 0;
        const STEREO = 1 << 1;
        const RDS = 1 << 2;
        const SEEK_WRAP = 1 << 3;
    }
}

/// Static information queried once at startup.
#[derive(Debug, Clone)]
pub struct TunerInfo {
    pub name: String,
    pub stereo: bool,
    pub signal: u16,
    pub kind: u32,
    pub range_low: u32,
    pub range_high: u32,
    pub capabilities: TunerCapabilities,
}

/// The abstract tuner hardware boundary. A real backend (V4L2 ioctls on
/// Linux) lives behind a feature flag in `tools/fmradio`; tests use an
/// in-memory mock.
pub trait TunerDevice {
    fn query_tuner(&mut self) -> Result<TunerInfo, SessionError>;
    fn query_capabilities(&mut self) -> Result<TunerCapabilities, SessionError>;
    fn get_frequency(&mut self) -> Result<u32, SessionError>;
    fn set_frequency(&mut self, raw: u32) -> Result<(), SessionError>;
    fn seek(&mut self, upward: bool, wrap_around: bool) -> Result<u32, SessionError>;
    fn set_mute(&mut self, mute: bool) -> Result<(), SessionError>;
    fn set_volume(&mut self, normalized: f32) -> Result<(), SessionError>;
    /// Read the next raw RDS block, if one is ready without blocking.
    fn read_rds_block(&mut self) -> Result<Option<fmrds::RdsBlock>, SessionError>;

    /// The device's file descriptor, for callers that multiplex it with
    /// `poll(2)`. `None` for devices with no underlying fd (mocks, the
    /// null backend).
    fn raw_fd(&self) -> Option<std::os::unix::io::RawFd> {
        None
    }
}

/// Mutable per-session tuner state: current tuning position and the
/// inclusive range/resolution queried once from the device at startup.
#[derive(Debug, Clone, Copy)]
pub struct TunerState {
    pub current_frequency: f32,
    pub min_frequency: f32,
    pub max_frequency: f32,
    pub frequency_divider: FrequencyDivider,
}

impl TunerState {
    pub fn new(
        min_frequency: f32,
        max_frequency: f32,
        frequency_divider: FrequencyDivider,
    ) -> Self {
        Self {
            current_frequency: min_frequency,
            min_frequency,
            max_frequency,
            frequency_divider,
        }
    }

    /// Validate and stage a tune request; does not talk to the device.
    /// Callers apply it via `TunerDevice::set_frequency` on success.
    pub fn validate_tune(&self, target: f32) -> Result<(), SessionError> {
        if target < self.min_frequency || target > self.max_frequency {
            return Err(SessionError::RangeViolation {
                requested: target,
                min: self.min_frequency,
                max: self.max_frequency,
            });
        }
        Ok(())
    }

    /// Step the current frequency by `delta_mhz`, snapping to the opposite
    /// band edge on overshoot/undershoot.
    pub fn step(&mut self, delta_mhz: f32) -> f32 {
        let mut next = self.current_frequency + delta_mhz;
        if next > self.max_frequency {
            next = self.min_frequency;
        } else if next < self.min_frequency {
            next = self.max_frequency;
        }
        self.current_frequency = next;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_divider_round_trips() {
        let div = FrequencyDivider::Sixteen;
        let raw = div.from_mhz(88.5);
        assert!((div.to_mhz(raw) - 88.5).abs() < 0.05);
    }

    #[test]
    fn validate_tune_rejects_out_of_range() {
        let state = TunerState::new(87.5, 108.0, FrequencyDivider::Sixteen);
        assert!(state.validate_tune(200.0).is_err());
        assert!(state.validate_tune(95.0).is_ok());
    }

    #[test]
    fn step_wraps_at_band_edges() {
        let mut state = TunerState::new(87.5, 108.0, FrequencyDivider::Sixteen);
        state.current_frequency = 107.98;
        let next = state.step(0.05);
        assert!((next - 87.5).abs() < 1e-3);
    }

    #[test]
    fn step_wraps_downward_at_lower_edge() {
        let mut state = TunerState::new(87.5, 108.0, FrequencyDivider::Sixteen);
        state.current_frequency = 87.52;
        let next = state.step(-0.05);
        assert!((next - 108.0).abs() < 1e-3);
    }
}
