// SPDX-License-Identifier: MIT

//! Tuner session state and the external-device boundaries the FM/RDS
//! controller drives: a [`TunerDevice`], an [`AudioGraph`], and the keyboard
//! commands that move between them.
//!
//! Replaces what was process-global mutable state with an explicit
//! [`Session`] constructed once by the binary and threaded through by
//! `&mut` reference.

pub mod audio_graph;
pub mod commands;
pub mod error;
pub mod input_loop;
pub mod session;
pub mod tuner;

pub use audio_graph::AudioGraph;
pub use commands::{apply_command, KeyCommand};
pub use error::SessionError;
pub use input_loop::{InputEvent, InputSource};
pub use session::Session;
pub use tuner::{FrequencyDivider, TunerCapabilities, TunerDevice, TunerInfo, TunerState};
