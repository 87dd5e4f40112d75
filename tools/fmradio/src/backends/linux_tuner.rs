// SPDX-License-Identifier: MIT

//! V4L2 tuner backend, gated behind the `linux-tuner` feature. Talks to
//! `/dev/radioN` the same way `original_source/linux-si470x.c` does: raw
//! `VIDIOC_*` ioctls plus blocking/non-blocking reads of the RDS byte
//! stream.

use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;

use fmrds_session::{SessionError, TunerCapabilities, TunerDevice, TunerInfo};

const V4L2_TUNER_RADIO: u32 = 1;
const V4L2_CID_AUDIO_MUTE: u32 = 9_963_784; // V4L2_CID_BASE + 9
const V4L2_CID_AUDIO_VOLUME: u32 = 9_963_777; // V4L2_CID_BASE + 2
const V4L2_TUNER_CAP_LOW: u32 = 0x0001;
const V4L2_TUNER_CAP_STEREO: u32 = 0x0002;
const V4L2_TUNER_CAP_RDS: u32 = 0x0004;

#[repr(C)]
#[derive(Default)]
struct V4l2Frequency {
    tuner: u32,
    kind: u32,
    frequency: u32,
    reserved: [u32; 8],
}

#[repr(C)]
#[derive(Default)]
struct V4l2HwFreqSeek {
    tuner: u32,
    kind: u32,
    seek_upward: u32,
    wrap_around: u32,
    spacing: u32,
    rangelow: u32,
    rangehigh: u32,
    reserved: [u32; 5],
}

#[repr(C)]
#[derive(Default)]
struct V4l2Control {
    id: u32,
    value: i32,
}

#[repr(C)]
#[derive(Default)]
struct V4l2Tuner {
    index: u32,
    name: [u8; 32],
    kind: u32,
    capability: u32,
    rangelow: u32,
    rangehigh: u32,
    rxsubchans: u32,
    audmode: u32,
    signal: i32,
    afc: i32,
    reserved: [u32; 4],
}

nix::ioctl_readwrite!(vidioc_g_tuner, b'V', 29, V4l2Tuner);
nix::ioctl_readwrite!(vidioc_g_frequency, b'V', 56, V4l2Frequency);
nix::ioctl_readwrite!(vidioc_s_frequency, b'V', 57, V4l2Frequency);
nix::ioctl_readwrite!(vidioc_s_hw_freq_seek, b'V', 82, V4l2HwFreqSeek);
nix::ioctl_readwrite!(vidioc_s_ctrl, b'V', 28, V4l2Control);

/// The real tuner backend, opened non-blocking against a `/dev/radioN`
/// V4L2 device.
pub struct LinuxTuner {
    file: File,
}

impl LinuxTuner {
    pub fn open(path: &str) -> Result<Self, SessionError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(|e| SessionError::DeviceOpenFailure(format!("{path}: {e}")))?;
        Ok(Self { file })
    }

    fn fd(&self) -> i32 {
        self.file.as_raw_fd()
    }
}

impl TunerDevice for LinuxTuner {
    fn query_tuner(&mut self) -> Result<TunerInfo, SessionError> {
        let mut tuner = V4l2Tuner::default();
        unsafe { vidioc_g_tuner(self.fd(), &mut tuner) }
            .map_err(|e| SessionError::TunerIoctl(format!("VIDIOC_G_TUNER: {e}")))?;

        let mut capabilities = TunerCapabilities::empty();
        if tuner.capability & V4L2_TUNER_CAP_LOW != 0 {
            capabilities |= TunerCapabilities::LOW;
        }
        if tuner.capability & V4L2_TUNER_CAP_STEREO != 0 {
            capabilities |= TunerCapabilities::STEREO;
        }
        if tuner.capability & V4L2_TUNER_CAP_RDS != 0 {
            capabilities |= TunerCapabilities::RDS;
        }

        let name_len = tuner.name.iter().position(|&b| b == 0).unwrap_or(0);
        Ok(TunerInfo {
            name: String::from_utf8_lossy(&tuner.name[..name_len]).into_owned(),
            stereo: tuner.rxsubchans & 0x02 != 0,
            signal: tuner.signal.max(0) as u16,
            kind: tuner.kind,
            range_low: tuner.rangelow,
            range_high: tuner.rangehigh,
            capabilities,
        })
    }

    fn query_capabilities(&mut self) -> Result<TunerCapabilities, SessionError> {
        Ok(self.query_tuner()?.capabilities)
    }

    fn get_frequency(&mut self) -> Result<u32, SessionError> {
        let mut freq = V4l2Frequency {
            tuner: 0,
            kind: V4L2_TUNER_RADIO,
            ..Default::default()
        };
        unsafe { vidioc_g_frequency(self.fd(), &mut freq) }
            .map_err(|e| SessionError::TunerIoctl(format!("VIDIOC_G_FREQUENCY: {e}")))?;
        Ok(freq.frequency)
    }

    fn set_frequency(&mut self, raw: u32) -> Result<(), SessionError> {
        let mut freq = V4l2Frequency {
            tuner: 0,
            kind: V4L2_TUNER_RADIO,
            frequency: raw,
            ..Default::default()
        };
        unsafe { vidioc_s_frequency(self.fd(), &mut freq) }
            .map_err(|e| SessionError::TunerIoctl(format!("VIDIOC_S_FREQUENCY: {e}")))?;
        Ok(())
    }

    fn seek(&mut self, upward: bool, wrap_around: bool) -> Result<u32, SessionError> {
        let mut seek = V4l2HwFreqSeek {
            tuner: 0,
            kind: V4L2_TUNER_RADIO,
            seek_upward: upward as u32,
            wrap_around: wrap_around as u32,
            ..Default::default()
        };
        unsafe { vidioc_s_hw_freq_seek(self.fd(), &mut seek) }
            .map_err(|e| SessionError::TunerIoctl(format!("VIDIOC_S_HW_FREQ_SEEK: {e}")))?;
        self.get_frequency()
    }

    fn set_mute(&mut self, mute: bool) -> Result<(), SessionError> {
        let mut control = V4l2Control {
            id: V4L2_CID_AUDIO_MUTE,
            value: mute as i32,
        };
        unsafe { vidioc_s_ctrl(self.fd(), &mut control) }
            .map_err(|e| SessionError::TunerIoctl(format!("VIDIOC_S_CTRL(mute): {e}")))?;
        Ok(())
    }

    fn set_volume(&mut self, normalized: f32) -> Result<(), SessionError> {
        let value = (normalized.clamp(0.0, 1.0) * 65535.0) as i32;
        let mut control = V4l2Control {
            id: V4L2_CID_AUDIO_VOLUME,
            value,
        };
        unsafe { vidioc_s_ctrl(self.fd(), &mut control) }
            .map_err(|e| SessionError::TunerIoctl(format!("VIDIOC_S_CTRL(volume): {e}")))?;
        Ok(())
    }

    fn read_rds_block(&mut self) -> Result<Option<fmrds::RdsBlock>, SessionError> {
        use std::io::Read;
        let mut raw = [0u8; 3];
        match self.file.read_exact(&mut raw) {
            Ok(()) => Ok(Some(fmrds::RdsBlock::new(raw[0], raw[1], raw[2]))),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(SessionError::TunerIoctl(format!("RDS read: {e}"))),
        }
    }

    fn raw_fd(&self) -> Option<std::os::unix::io::RawFd> {
        Some(self.fd())
    }
}
