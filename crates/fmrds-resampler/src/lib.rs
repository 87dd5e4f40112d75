// SPDX-License-Identifier: MIT

//! PI-controlled adaptive resampler.
//!
//! Bridges a capture device's clock to an audio graph's clock: each callback
//! measures capture-buffer occupancy, runs a smoothed PI controller over the
//! occupancy error, and resamples enough input frames to produce exactly the
//! requested number of output frames.

pub mod capture;
pub mod controller;
pub mod engine;
pub mod error;
pub mod window;

pub use capture::CaptureDevice;
pub use controller::{PiController, PiControllerConfig};
pub use engine::{ResamplerConfig, ResamplerEngine, ResamplerTelemetry};
pub use error::ResamplerError;
