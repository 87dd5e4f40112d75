// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors surfaced by the session layer: tuner I/O, range checks, and
/// device-level failures that the input loop or audio supervisor must react
/// to.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("tuner ioctl failed: {0}")]
    TunerIoctl(String),

    #[error("requested frequency {requested} is outside [{min}, {max}]")]
    RangeViolation {
        requested: f32,
        min: f32,
        max: f32,
    },

    #[error("tuner device open failed: {0}")]
    DeviceOpenFailure(String),

    #[error("audio graph unavailable: {0}")]
    AudioGraphUnavailable(String),

    #[error("no known station to switch to")]
    NoKnownStation,
}
