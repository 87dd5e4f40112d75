// SPDX-License-Identifier: MIT

//! Terminal canonical-mode handling: disables line buffering/echo on stdin
//! so single-key commands are readable without Enter, and restores it on
//! every exit path, including SIGTERM/SIGINT.
//!
//! Grounded in `original_source/linux-si470x.c`'s
//! `disableCannonicalMode`/`parent_sigterm_handler` pair.

use std::os::fd::RawFd;

use crate::cli::CliError;

const STDIN_FD: RawFd = 0;

/// RAII guard restoring the terminal's original settings on drop, covering
/// both normal returns and early exits via `?`.
pub struct CanonicalModeGuard {
    saved: Option<libc::termios>,
}

impl CanonicalModeGuard {
    /// Disable canonical mode and echo on stdin, if stdin is a TTY.
    /// Returns a guard that restores the saved settings on drop.
    pub fn disable() -> Result<Self, CliError> {
        if unsafe { libc::isatty(STDIN_FD) } == 0 {
            return Ok(Self { saved: None });
        }

        let mut termios = std::mem::MaybeUninit::<libc::termios>::uninit();
        if unsafe { libc::tcgetattr(STDIN_FD, termios.as_mut_ptr()) } != 0 {
            return Err(CliError::Terminal("tcgetattr failed".into()));
        }
        let saved = unsafe { termios.assume_init() };

        let mut raw = saved;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON);
        if unsafe { libc::tcsetattr(STDIN_FD, libc::TCSAFLUSH, &raw) } != 0 {
            return Err(CliError::Terminal("tcsetattr failed".into()));
        }

        Ok(Self { saved: Some(saved) })
    }

    /// The saved termios, for the signal handler to restore from a
    /// plain `libc` call (signal-safe; no allocation).
    pub fn saved(&self) -> Option<libc::termios> {
        self.saved
    }
}

impl Drop for CanonicalModeGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved {
            unsafe {
                libc::tcsetattr(STDIN_FD, libc::TCSAFLUSH, &saved);
            }
        }
    }
}

/// Restore terminal settings from within a signal handler context. Only
/// calls `tcsetattr`, which is async-signal-safe.
pub fn restore_from_signal(saved: &libc::termios) {
    unsafe {
        libc::tcsetattr(STDIN_FD, libc::TCSAFLUSH, saved);
    }
}
