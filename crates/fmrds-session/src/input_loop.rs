// SPDX-License-Identifier: MIT

//! Multiplexes the tuner's RDS byte stream and the keyboard control channel
//! behind a single 1-second-timeout readiness wait (spec.md §4.4/§5).
//!
//! Kept generic over [`InputSource`] so the decode loop can be driven in
//! tests without real file descriptors; `tools/fmradio` supplies a `poll(2)`
//! backed implementation over the tuner fd and stdin.

use std::time::Duration;

use crate::error::SessionError;

pub const POLL_TIMEOUT: Duration = Duration::from_secs(1);

/// The outcome of attempting a non-blocking read from one multiplexed
/// source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome<T> {
    Ready(T),
    WouldBlock,
    Eof,
}

/// The two file descriptors the input loop waits on.
pub trait InputSource {
    /// Block up to `timeout` for either source to become readable.
    /// Returns `false` on timeout with nothing ready.
    fn wait_ready(&mut self, timeout: Duration) -> Result<bool, SessionError>;

    fn read_tuner(&mut self) -> Result<ReadOutcome<fmrds::RdsBlock>, SessionError>;

    fn read_keyboard(&mut self) -> Result<ReadOutcome<u8>, SessionError>;
}

/// One multiplexed event: an RDS block, a keyboard byte, a timeout (no data
/// within 1 second), or end-of-file on either source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    RdsBlock(fmrds::RdsBlock),
    Keyboard(u8),
    Timeout,
    Eof,
}

/// Wait for, and return, the next event from either source. The tuner is
/// checked before the keyboard, matching the reference loop's read order.
pub fn next_event(source: &mut dyn InputSource) -> Result<InputEvent, SessionError> {
    if !source.wait_ready(POLL_TIMEOUT)? {
        return Ok(InputEvent::Timeout);
    }

    match source.read_tuner()? {
        ReadOutcome::Ready(block) => return Ok(InputEvent::RdsBlock(block)),
        ReadOutcome::Eof => return Ok(InputEvent::Eof),
        ReadOutcome::WouldBlock => {}
    }

    match source.read_keyboard()? {
        ReadOutcome::Ready(byte) => Ok(InputEvent::Keyboard(byte)),
        ReadOutcome::Eof => Ok(InputEvent::Eof),
        ReadOutcome::WouldBlock => Ok(InputEvent::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmrds::RdsBlock;

    struct MockSource {
        ready: bool,
        tuner: ReadOutcome<RdsBlock>,
        keyboard: ReadOutcome<u8>,
    }

    impl InputSource for MockSource {
        fn wait_ready(&mut self, _timeout: Duration) -> Result<bool, SessionError> {
            Ok(self.ready)
        }
        fn read_tuner(&mut self) -> Result<ReadOutcome<RdsBlock>, SessionError> {
            Ok(self.tuner)
        }
        fn read_keyboard(&mut self) -> Result<ReadOutcome<u8>, SessionError> {
            Ok(self.keyboard)
        }
    }

    #[test]
    fn timeout_when_nothing_ready() {
        let mut source = MockSource {
            ready: false,
            tuner: ReadOutcome::WouldBlock,
            keyboard: ReadOutcome::WouldBlock,
        };
        assert_eq!(next_event(&mut source).unwrap(), InputEvent::Timeout);
    }

    #[test]
    fn tuner_takes_priority_over_keyboard() {
        let block = RdsBlock::new(1, 2, 0);
        let mut source = MockSource {
            ready: true,
            tuner: ReadOutcome::Ready(block),
            keyboard: ReadOutcome::Ready(b'n'),
        };
        assert_eq!(next_event(&mut source).unwrap(), InputEvent::RdsBlock(block));
    }

    #[test]
    fn falls_through_to_keyboard_when_tuner_would_block() {
        let mut source = MockSource {
            ready: true,
            tuner: ReadOutcome::WouldBlock,
            keyboard: ReadOutcome::Ready(b'+'),
        };
        assert_eq!(next_event(&mut source).unwrap(), InputEvent::Keyboard(b'+'));
    }

    #[test]
    fn eof_on_either_source_propagates() {
        let mut source = MockSource {
            ready: true,
            tuner: ReadOutcome::Eof,
            keyboard: ReadOutcome::WouldBlock,
        };
        assert_eq!(next_event(&mut source).unwrap(), InputEvent::Eof);
    }
}
