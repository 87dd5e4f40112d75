// SPDX-License-Identifier: MIT

//! RDS (Radio Data System) decoder.
//!
//! Consumes 24-bit RDS blocks delivered by a tuner device, assembles them
//! into 4-block groups, and dispatches on group type to update a
//! [`station::StationRegistry`] and produce user-visible [`decoder::DecoderEvent`]s.
//!
//! This crate has no I/O of its own: callers feed it [`group::RdsBlock`]
//! values (however they were read) and drain the events it returns.

pub mod af;
pub mod clock;
pub mod decoder;
pub mod eon;
pub mod group;
pub mod pty;
pub mod radiotext;
pub mod station;
pub mod tmc;

pub use decoder::{Decoder, DecoderEvent};
pub use group::RdsBlock;
pub use station::{ProgramData, StationRegistry};
