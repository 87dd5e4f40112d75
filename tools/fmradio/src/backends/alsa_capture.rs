// SPDX-License-Identifier: MIT

//! ALSA capture backend, gated behind the `alsa-capture` feature: opens the
//! configured PCM device non-blocking and exposes it as a
//! [`fmrds_resampler::CaptureDevice`].

use alsa::pcm::{Access, Format, HwParams, PCM};
use alsa::{Direction, ValueOr};

use fmrds_resampler::{CaptureDevice, ResamplerError};

const CHANNELS: u32 = 2;

pub struct AlsaCapture {
    pcm: PCM,
}

impl AlsaCapture {
    pub fn open(device: &str, sample_rate: u32) -> Result<Self, ResamplerError> {
        let pcm = PCM::new(device, Direction::Capture, true)
            .map_err(|e| ResamplerError::DeviceUnavailable(format!("{device}: {e}")))?;
        {
            let params = HwParams::any(&pcm)
                .map_err(|e| ResamplerError::DeviceUnavailable(e.to_string()))?;
            params
                .set_access(Access::RWInterleaved)
                .and_then(|_| params.set_format(Format::s16()))
                .and_then(|_| params.set_channels(CHANNELS))
                .and_then(|_| params.set_rate(sample_rate, ValueOr::Nearest))
                .map_err(|e| ResamplerError::DeviceUnavailable(e.to_string()))?;
            pcm.hw_params(&params)
                .map_err(|e| ResamplerError::DeviceUnavailable(e.to_string()))?;
        }
        pcm.prepare()
            .map_err(|e| ResamplerError::DeviceUnavailable(e.to_string()))?;
        Ok(Self { pcm })
    }
}

impl CaptureDevice for AlsaCapture {
    fn available(&self) -> u32 {
        self.pcm
            .avail_update()
            .map(|frames| frames.max(0) as u32)
            .unwrap_or(0)
    }

    fn read(&mut self, frames: usize) -> Result<Vec<i16>, ResamplerError> {
        let io = self
            .pcm
            .io_i16()
            .map_err(|e| ResamplerError::DeviceUnavailable(e.to_string()))?;
        let mut buf = vec![0i16; frames * CHANNELS as usize];
        match io.readi(&mut buf) {
            Ok(read) => {
                buf.truncate(read * CHANNELS as usize);
                Ok(buf)
            }
            Err(e) if e.errno() == libc::EAGAIN => Ok(Vec::new()),
            Err(e) => {
                self.pcm
                    .try_recover(e, true)
                    .map_err(|e| ResamplerError::RecoveryFailed(e.to_string()))?;
                Ok(Vec::new())
            }
        }
    }

    fn rewind(&mut self, frames: usize) -> Result<(), ResamplerError> {
        self.pcm
            .rewind(frames as alsa::pcm::Frames)
            .map(|_| ())
            .map_err(|e| ResamplerError::DeviceUnavailable(e.to_string()))
    }

    fn recover(&mut self) -> Result<(), ResamplerError> {
        self.pcm
            .prepare()
            .map_err(|e| ResamplerError::RecoveryFailed(e.to_string()))
    }
}
