// SPDX-License-Identifier: MIT

//! FM/RDS tuner controller: tunes a V4L2 radio device, decodes its RDS
//! sub-carrier, and forwards capture audio into a resampled realtime graph
//! or an external recording/monitor pipeline.

mod backends;
mod cli;
mod input_source;
mod pipeline;
mod terminal;

use std::time::Duration;

use clap::Parser;
use fmrds::{Decoder, StationRegistry};
use fmrds_session::input_loop::{next_event, InputEvent};
use fmrds_session::{FrequencyDivider, Session, TunerCapabilities, TunerDevice, TunerState};
use tracing::{info, warn};

use crate::cli::Args;
use crate::input_source::PollInputSource;
use crate::terminal::CanonicalModeGuard;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

#[cfg(feature = "linux-tuner")]
fn open_tuner(device: &str) -> anyhow::Result<Box<dyn TunerDevice>> {
    Ok(Box::new(backends::linux_tuner::LinuxTuner::open(device)?))
}

#[cfg(not(feature = "linux-tuner"))]
fn open_tuner(_device: &str) -> anyhow::Result<Box<dyn TunerDevice>> {
    anyhow::bail!(
        "no tuner backend compiled in; rebuild with `--features linux-tuner` on Linux with V4L2"
    )
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    info!("fmradio v{}", env!("CARGO_PKG_VERSION"));
    info!(device = %args.device, alsa_device = %args.alsa_device, "opening tuner");

    let mut tuner = open_tuner(&args.device)?;

    let caps = tuner.query_capabilities()?;
    if !caps.contains(TunerCapabilities::RDS) {
        warn!("tuner does not report RDS capture support; station metadata will not decode");
    }

    let divider = if caps.contains(TunerCapabilities::LOW) {
        FrequencyDivider::SixteenThousand
    } else {
        FrequencyDivider::Sixteen
    };

    let tuner_info = tuner.query_tuner()?;
    info!(
        name = %tuner_info.name,
        stereo = tuner_info.stereo,
        signal = tuner_info.signal,
        "tuner ready"
    );

    let min_frequency = divider.to_mhz(tuner_info.range_low);
    let max_frequency = divider.to_mhz(tuner_info.range_high);
    let mut session = Session::new(TunerState::new(min_frequency, max_frequency, divider));

    if args.seek {
        let raw = tuner.seek(true, true)?;
        session.tuner.current_frequency = divider.to_mhz(raw);
        info!(frequency = session.tuner.current_frequency, "seek stopped");
    } else if let Some(freq) = args.frequency {
        session.tuner.validate_tune(freq)?;
        tuner.set_frequency(divider.from_mhz(freq))?;
        session.tuner.current_frequency = freq;
    }
    tuner.set_volume(1.0)?;

    let guard = CanonicalModeGuard::disable()?;
    install_signal_handler(&guard)?;

    let _audio_child = if let Some(path) = &args.output {
        Some(pipeline::spawn_record_to_file(&args.alsa_device, path)?)
    } else if !args.jack {
        Some(pipeline::spawn_monitor(&args.alsa_device)?)
    } else {
        None // the `jack-audio` backend owns its own realtime thread
    };

    if caps.contains(TunerCapabilities::RDS) {
        run_rds_loop(&mut session, tuner.as_mut())?;
    } else {
        std::thread::sleep(Duration::from_secs(u64::MAX));
    }

    Ok(())
}

fn run_rds_loop(session: &mut Session, tuner: &mut dyn TunerDevice) -> anyhow::Result<()> {
    let mut decoder = Decoder::new();
    let tuner_fd = tuner.raw_fd();
    let mut source = PollInputSource::new(tuner, tuner_fd);

    loop {
        match next_event(&mut source)? {
            InputEvent::RdsBlock(block) => {
                for event in decoder.process_block(block, session.tuner.current_frequency) {
                    println!("{event}");
                }
                sync_registry(&decoder, &mut session.registry);
            }
            InputEvent::Keyboard(byte) => {
                if let Some(command) = fmrds_session::KeyCommand::from_byte(byte) {
                    match fmrds_session::apply_command(session, source.tuner_mut(), command) {
                        Ok(freq) => info!(frequency = freq, "tuned"),
                        Err(e) => warn!(error = %e, "command rejected"),
                    }
                }
            }
            InputEvent::Timeout => {
                tracing::trace!("no RDS data this cycle");
            }
            InputEvent::Eof => {
                info!("input source closed, shutting down");
                return Ok(());
            }
        }
    }
}

/// The decoder owns the authoritative registry; copy it into the session
/// after each block so the keyboard command handler's `next_known` lookups
/// see newly discovered stations.
fn sync_registry(decoder: &Decoder, registry: &mut StationRegistry) {
    for program in decoder.registry().iter() {
        *registry.lookup_or_insert(program.id) = program.clone();
    }
}

fn install_signal_handler(guard: &CanonicalModeGuard) -> Result<(), cli::CliError> {
    let saved = guard.saved();

    ctrlc::set_handler(move || {
        if let Some(saved) = saved {
            terminal::restore_from_signal(&saved);
        }
        std::process::exit(0);
    })
    .map_err(|e| cli::CliError::SignalHandler(e.to_string()))
}

fn main() -> anyhow::Result<()> {
    match run() {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("fmradio: {e}");
            std::process::exit(1);
        }
    }
}
