// SPDX-License-Identifier: MIT

//! The capture-device boundary the resampler pulls frames from.
//!
//! Kept as a trait so the engine's drift-recovery and per-callback logic can
//! be exercised in tests without a real ALSA/JACK backend; `tools/fmradio`
//! supplies the real implementation behind a feature flag.

use crate::error::ResamplerError;

/// An interleaved, signed 16-bit, two-channel PCM capture source.
pub trait CaptureDevice {
    /// Frames currently buffered and ready to read, without blocking.
    fn available(&self) -> u32;

    /// Read up to `frames` interleaved stereo frames. May return fewer than
    /// requested; callers retry on `WouldBlock`-style transient errors by
    /// calling again.
    fn read(&mut self, frames: usize) -> Result<Vec<i16>, ResamplerError>;

    /// Return `frames` previously-read frames to the device so a later
    /// callback re-reads them.
    fn rewind(&mut self, frames: usize) -> Result<(), ResamplerError>;

    /// Attempt to recover from an underrun or suspend state.
    fn recover(&mut self) -> Result<(), ResamplerError>;
}
