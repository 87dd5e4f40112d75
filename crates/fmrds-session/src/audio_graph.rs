// SPDX-License-Identifier: MIT

//! The realtime audio graph boundary (spec.md §6): output port registration
//! and the pull-mode `process` callback the resampler is driven by.

use crate::error::SessionError;

/// A realtime pull-model audio graph (JACK in the reference deployment).
/// Implementors register output ports at startup and invoke a registered
/// callback once per period; this trait models the setup half only, since
/// the callback itself is owned by whoever constructs the graph.
pub trait AudioGraph {
    /// Register the graph's output ports (`capture_1`, `capture_2`).
    fn register_ports(&mut self, names: &[&str]) -> Result<(), SessionError>;

    /// Connect this graph's output ports to the system's available input
    /// ports.
    fn connect_to_inputs(&mut self) -> Result<(), SessionError>;

    /// The graph's current sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// The graph's current buffer size in frames.
    fn buffer_size(&self) -> u32;

    /// Start the graph's callback thread. Implementations take ownership of
    /// the resampler state inside the closure they register with the
    /// underlying audio API.
    fn activate(&mut self) -> Result<(), SessionError>;

    /// Stop the graph's callback thread and release its client handle.
    fn deactivate(&mut self) -> Result<(), SessionError>;
}
