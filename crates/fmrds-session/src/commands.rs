// SPDX-License-Identifier: MIT

//! Keyboard commands read from the control channel: `n` (next known
//! station), `+`/`-` (step by 0.05 MHz, wrapping at the band edges).

use crate::error::SessionError;
use crate::session::Session;
use crate::tuner::TunerDevice;

const STEP_MHZ: f32 = 0.05;
const NEXT_KNOWN_TOLERANCE_MHZ: f32 = 0.09;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    NextKnownStation,
    StepUp,
    StepDown,
}

impl KeyCommand {
    /// Parse a single byte from the control channel. Unrecognized bytes
    /// (including newlines) yield `None` and are ignored by the caller.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'n' => Some(KeyCommand::NextKnownStation),
            b'+' => Some(KeyCommand::StepUp),
            b'-' => Some(KeyCommand::StepDown),
            _ => None,
        }
    }
}

/// Apply a parsed keyboard command against the session and tuner device.
/// Returns the new tuned frequency in MHz on success.
pub fn apply_command(
    session: &mut Session,
    device: &mut dyn TunerDevice,
    command: KeyCommand,
) -> Result<f32, SessionError> {
    let target = match command {
        KeyCommand::NextKnownStation => {
            let current = session.tuner.current_frequency;
            let min = session.tuner.min_frequency;
            session
                .registry
                .next_known(current, min)
                .map(|p| p.freq)
                .ok_or(SessionError::NoKnownStation)?
        }
        KeyCommand::StepUp => peek_step(&session.tuner, STEP_MHZ),
        KeyCommand::StepDown => peek_step(&session.tuner, -STEP_MHZ),
    };

    session.tuner.validate_tune(target)?;
    let raw = session.tuner.frequency_divider.from_mhz(target);
    device.set_frequency(raw)?;
    session.tuner.current_frequency = target;
    tracing::debug!(command = ?command, frequency = target, "keyboard command applied");
    Ok(target)
}

fn peek_step(tuner: &crate::tuner::TunerState, delta_mhz: f32) -> f32 {
    let mut copy = *tuner;
    copy.step(delta_mhz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuner::{FrequencyDivider, TunerCapabilities, TunerInfo, TunerState};

    struct MockDevice {
        last_set: Option<u32>,
    }

    impl TunerDevice for MockDevice {
        fn query_tuner(&mut self) -> Result<TunerInfo, SessionError> {
            unimplemented!()
        }
        fn query_capabilities(&mut self) -> Result<TunerCapabilities, SessionError> {
            unimplemented!()
        }
        fn get_frequency(&mut self) -> Result<u32, SessionError> {
            unimplemented!()
        }
        fn set_frequency(&mut self, raw: u32) -> Result<(), SessionError> {
            self.last_set = Some(raw);
            Ok(())
        }
        fn seek(&mut self, _upward: bool, _wrap_around: bool) -> Result<u32, SessionError> {
            unimplemented!()
        }
        fn set_mute(&mut self, _mute: bool) -> Result<(), SessionError> {
            unimplemented!()
        }
        fn set_volume(&mut self, _normalized: f32) -> Result<(), SessionError> {
            unimplemented!()
        }
        fn read_rds_block(&mut self) -> Result<Option<fmrds::RdsBlock>, SessionError> {
            unimplemented!()
        }
    }

    #[test]
    fn parses_known_bytes() {
        assert_eq!(KeyCommand::from_byte(b'n'), Some(KeyCommand::NextKnownStation));
        assert_eq!(KeyCommand::from_byte(b'+'), Some(KeyCommand::StepUp));
        assert_eq!(KeyCommand::from_byte(b'-'), Some(KeyCommand::StepDown));
        assert_eq!(KeyCommand::from_byte(b'\n'), None);
    }

    #[test]
    fn step_up_advances_and_tunes_device() {
        let mut session = Session::new(TunerState::new(87.5, 108.0, FrequencyDivider::Sixteen));
        let mut device = MockDevice { last_set: None };

        let new_freq = apply_command(&mut session, &mut device, KeyCommand::StepUp).unwrap();

        assert!((new_freq - 87.55).abs() < 1e-3);
        assert_eq!(session.tuner.current_frequency, new_freq);
        assert!(device.last_set.is_some());
    }

    #[test]
    fn next_known_station_errors_when_registry_empty() {
        let mut session = Session::new(TunerState::new(87.5, 108.0, FrequencyDivider::Sixteen));
        let mut device = MockDevice { last_set: None };

        let err = apply_command(&mut session, &mut device, KeyCommand::NextKnownStation)
            .unwrap_err();
        assert!(matches!(err, SessionError::NoKnownStation));
    }

    #[test]
    fn next_known_station_tunes_to_circular_neighbor() {
        let mut session = Session::new(TunerState::new(87.5, 108.0, FrequencyDivider::Sixteen));
        session.registry.lookup_or_insert(1).freq = 88.0;
        session.registry.lookup_or_insert(2).freq = 90.0;
        session.tuner.current_frequency = 88.0;
        let mut device = MockDevice { last_set: None };

        let new_freq =
            apply_command(&mut session, &mut device, KeyCommand::NextKnownStation).unwrap();
        assert_eq!(new_freq, 90.0);
    }
}
