// SPDX-License-Identifier: MIT

//! `poll(2)`-backed [`InputSource`] multiplexing the tuner's RDS stream and
//! stdin, matching spec.md §4.4's 1-second timeout.

use std::io::Read;
use std::os::fd::RawFd;
use std::time::Duration;

use fmrds_session::input_loop::{InputSource, ReadOutcome};
use fmrds_session::{SessionError, TunerDevice};

pub struct PollInputSource<'a> {
    tuner: &'a mut dyn TunerDevice,
    tuner_fd: Option<RawFd>,
    stdin_fd: RawFd,
}

impl<'a> PollInputSource<'a> {
    pub fn new(tuner: &'a mut dyn TunerDevice, tuner_fd: Option<RawFd>) -> Self {
        Self {
            tuner,
            tuner_fd,
            stdin_fd: 0,
        }
    }

    /// Reborrow the underlying tuner device, for callers (keyboard command
    /// dispatch) that need to drive it directly between polls.
    pub fn tuner_mut(&mut self) -> &mut dyn TunerDevice {
        self.tuner
    }
}

impl<'a> InputSource for PollInputSource<'a> {
    fn wait_ready(&mut self, timeout: Duration) -> Result<bool, SessionError> {
        let mut fds = vec![libc::pollfd {
            fd: self.stdin_fd,
            events: libc::POLLIN,
            revents: 0,
        }];
        if let Some(fd) = self.tuner_fd {
            fds.push(libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            });
        }

        let ret = unsafe {
            libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, timeout.as_millis() as i32)
        };
        if ret < 0 {
            let errno = std::io::Error::last_os_error();
            if errno.kind() == std::io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(SessionError::TunerIoctl(format!("poll failed: {errno}")));
        }
        Ok(ret > 0)
    }

    fn read_tuner(&mut self) -> Result<ReadOutcome<fmrds::RdsBlock>, SessionError> {
        match self.tuner.read_rds_block()? {
            Some(block) => Ok(ReadOutcome::Ready(block)),
            None => Ok(ReadOutcome::WouldBlock),
        }
    }

    fn read_keyboard(&mut self) -> Result<ReadOutcome<u8>, SessionError> {
        let mut byte = [0u8; 1];
        match std::io::stdin().read(&mut byte) {
            Ok(0) => Ok(ReadOutcome::Eof),
            Ok(_) => Ok(ReadOutcome::Ready(byte[0])),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(ReadOutcome::WouldBlock),
            Err(e) => Err(SessionError::TunerIoctl(format!("stdin read: {e}"))),
        }
    }
}
