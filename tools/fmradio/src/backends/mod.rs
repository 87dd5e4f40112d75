// SPDX-License-Identifier: MIT

//! Real hardware backends for the external-collaborator traits declared in
//! `fmrds-session` and `fmrds-resampler`. Each module is feature-gated so
//! the workspace builds (library crates plus in-memory mocks) without the
//! corresponding system library present.

#[cfg(feature = "linux-tuner")]
pub mod linux_tuner;

#[cfg(feature = "alsa-capture")]
pub mod alsa_capture;

#[cfg(feature = "jack-audio")]
pub mod jack_audio;

/// A capture device that always reports silence. Used when neither
/// `-j` nor `-o` select a real audio path, matching the original's
/// "RDS-only" run mode.
pub struct NullCapture;

impl fmrds_resampler::CaptureDevice for NullCapture {
    fn available(&self) -> u32 {
        0
    }
    fn read(&mut self, _frames: usize) -> Result<Vec<i16>, fmrds_resampler::ResamplerError> {
        Ok(Vec::new())
    }
    fn rewind(&mut self, _frames: usize) -> Result<(), fmrds_resampler::ResamplerError> {
        Ok(())
    }
    fn recover(&mut self) -> Result<(), fmrds_resampler::ResamplerError> {
        Ok(())
    }
}
