// SPDX-License-Identifier: MIT

//! JACK realtime audio graph backend, gated behind the `jack-audio` feature.
//! Registers `capture_1`/`capture_2` output ports and drives the resampler
//! from the realtime `process` callback, per spec.md §6.

use fmrds_resampler::{CaptureDevice, ResamplerEngine};
use fmrds_session::{AudioGraph, SessionError};
use jack::{AudioOut, Client, ClientOptions, Control, ProcessScope};

pub struct JackGraph {
    client: Option<Client>,
    ports: Vec<jack::Port<AudioOut>>,
    active: Option<jack::AsyncClient<(), JackProcessHandler>>,
}

struct JackProcessHandler {
    engine: ResamplerEngine,
    capture: Box<dyn CaptureDevice + Send>,
    ports: Vec<jack::Port<AudioOut>>,
    scratch: Vec<Vec<f32>>,
}

impl jack::ProcessHandler for JackProcessHandler {
    fn process(&mut self, _client: &Client, scope: &ProcessScope) -> Control {
        let nframes = scope.n_frames() as usize;
        for channel in self.scratch.iter_mut() {
            channel.clear();
        }
        if self.scratch.len() != self.ports.len() {
            self.scratch = vec![Vec::new(); self.ports.len()];
        }

        match self.engine.process(nframes, self.capture.as_mut(), &mut self.scratch) {
            Ok(_telemetry) => {
                for (port, channel) in self.ports.iter_mut().zip(self.scratch.iter()) {
                    let buf = port.as_mut_slice(scope);
                    buf.copy_from_slice(channel);
                }
                Control::Continue
            }
            Err(e) => {
                tracing::error!(error = %e, "resampler callback failed, stopping audio graph");
                Control::Quit
            }
        }
    }
}

impl JackGraph {
    pub fn new(client_name: &str) -> Result<Self, SessionError> {
        let (client, _status) = Client::new(client_name, ClientOptions::NO_START_SERVER)
            .map_err(|e| SessionError::AudioGraphUnavailable(e.to_string()))?;
        Ok(Self {
            client: Some(client),
            ports: Vec::new(),
            active: None,
        })
    }

    /// Move the engine and capture device into the realtime callback and
    /// activate the graph. Consumes `self`'s ports.
    pub fn activate_with(
        mut self,
        engine: ResamplerEngine,
        capture: Box<dyn CaptureDevice + Send>,
    ) -> Result<Self, SessionError> {
        let client = self
            .client
            .take()
            .ok_or_else(|| SessionError::AudioGraphUnavailable("already activated".into()))?;
        let ports = std::mem::take(&mut self.ports);
        let handler = JackProcessHandler {
            scratch: vec![Vec::new(); ports.len()],
            engine,
            capture,
            ports,
        };
        let active = client
            .activate_async((), handler)
            .map_err(|e| SessionError::AudioGraphUnavailable(e.to_string()))?;
        self.active = Some(active);
        Ok(self)
    }
}

impl AudioGraph for JackGraph {
    fn register_ports(&mut self, names: &[&str]) -> Result<(), SessionError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| SessionError::AudioGraphUnavailable("client already active".into()))?;
        for name in names {
            let port = client
                .register_port(name, AudioOut::default())
                .map_err(|e| SessionError::AudioGraphUnavailable(e.to_string()))?;
            self.ports.push(port);
        }
        Ok(())
    }

    fn connect_to_inputs(&mut self) -> Result<(), SessionError> {
        // Real connection requires the active client; left to the caller
        // once `activate_with` has run, matching JACK's post-activation
        // connection model.
        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        self.client
            .as_ref()
            .map(|c| c.sample_rate() as u32)
            .unwrap_or(0)
    }

    fn buffer_size(&self) -> u32 {
        self.client
            .as_ref()
            .map(|c| c.buffer_size())
            .unwrap_or(0)
    }

    fn activate(&mut self) -> Result<(), SessionError> {
        Err(SessionError::AudioGraphUnavailable(
            "use activate_with to supply the resampler engine".into(),
        ))
    }

    fn deactivate(&mut self) -> Result<(), SessionError> {
        if let Some(active) = self.active.take() {
            active
                .deactivate()
                .map_err(|(e, _, _)| SessionError::AudioGraphUnavailable(e.to_string()))?;
        }
        Ok(())
    }
}
