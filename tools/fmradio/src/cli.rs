// SPDX-License-Identifier: MIT

use clap::Parser;
use thiserror::Error;

/// FM/RDS tuner controller.
#[derive(Parser, Debug)]
#[command(name = "fmradio")]
#[command(about = "Tune an FM radio device, decode RDS, and forward capture audio")]
#[command(version)]
pub struct Args {
    /// Radio tuner device
    #[arg(short = 'd', long = "device", default_value = "/dev/radio0")]
    pub device: String,

    /// ALSA capture device
    #[arg(short = 'a', long = "alsa-device", default_value = "hw:Music")]
    pub alsa_device: String,

    /// Tune to this frequency (MHz) at startup
    #[arg(short = 'F', long = "frequency")]
    pub frequency: Option<f32>,

    /// Use the realtime JACK audio graph instead of the monitor pipeline
    #[arg(short = 'j', long = "jack")]
    pub jack: bool,

    /// Record capture audio to this compressed file instead of monitoring
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Seek upward on startup instead of using a fixed frequency
    #[arg(short = 's', long = "seek")]
    pub seek: bool,

    /// Increase logging verbosity (repeatable)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("terminal setup failed: {0}")]
    Terminal(String),

    #[error("failed to spawn audio pipeline: {0}")]
    Pipeline(String),

    #[error("signal handler installation failed: {0}")]
    SignalHandler(String),
}
