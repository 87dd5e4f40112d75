// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised by the resampling engine's per-callback processing.
#[derive(Debug, Error)]
pub enum ResamplerError {
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("capture device suspended and recovery failed: {0}")]
    RecoveryFailed(String),

    #[error("capture hard failure after {attempts} retries: {message}")]
    CaptureHardFailure { attempts: u32, message: String },

    #[error("output buffer has {actual} channels, expected {expected}")]
    ChannelMismatch { expected: usize, actual: usize },
}
