// SPDX-License-Identifier: MIT

//! Top-level RDS decoder: per-block state machine, group dispatch, and the
//! user-visible events it produces.

use std::fmt;

use crate::af;
use crate::clock::LocalClock;
use crate::eon::{self, EonOutcome};
use crate::group::{GroupBuffer, GroupType, RdsBlock, Version};
use crate::radiotext::RadiotextBuffer;
use crate::station::StationRegistry;
use crate::tmc::{self, TmcMessage};

/// A user-visible event produced by decoding RDS blocks. `Display` renders
/// the exact line a console front-end should print.
#[derive(Debug, Clone, PartialEq)]
pub enum DecoderEvent {
    ProgramType(&'static str),
    ProgramName(String),
    Stereo(bool),
    TrafficAnnouncement(bool),
    Radiotext(String),
    Clock(LocalClock),
    Tmc(TmcMessage),
    EonNameUpdated { other_pi: u16 },
    EonAfAssigned { other_pi: u16, freq: f32 },
    EonTrafficAnnouncement { other_pi: u16, on: bool },
}

impl fmt::Display for DecoderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecoderEvent::ProgramType(name) => write!(f, "Program type: {name}"),
            DecoderEvent::ProgramName(name) => write!(f, "Program: {name}"),
            DecoderEvent::Stereo(is_stereo) => {
                write!(f, "Program is {}", if *is_stereo { "stereo" } else { "mono" })
            }
            DecoderEvent::TrafficAnnouncement(on) => {
                write!(f, "Traffic announcement {}", if *on { "on" } else { "off" })
            }
            DecoderEvent::Radiotext(text) => write!(f, "Text: {text}"),
            DecoderEvent::Clock(local) => write!(f, "Date: {local}"),
            DecoderEvent::Tmc(TmcMessage::Single {
                duration,
                extent,
                event,
                location,
            }) => write!(
                f,
                "TMC(single): evt={event:X}, loc={location:X}, extent={extent:X}, dur={}",
                duration.as_str()
            ),
            DecoderEvent::Tmc(TmcMessage::Other {
                sub_type,
                event,
                location,
            }) => write!(f, "TMC: type={sub_type:?}, event={event:X}, loc={location:X}"),
            DecoderEvent::EonNameUpdated { other_pi } => {
                write!(f, "EON: updated name for {other_pi:04X}")
            }
            DecoderEvent::EonAfAssigned { other_pi, freq } => {
                write!(f, "{other_pi:04X} is on {freq:.2}MHz")
            }
            DecoderEvent::EonTrafficAnnouncement { other_pi, on } => write!(
                f,
                "Traffic Announcement on {:04X} is {}",
                other_pi,
                if *on { "on" } else { "off" }
            ),
        }
    }
}

/// Statistics accumulated across a decoding session.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecoderStats {
    pub blocks_seen: u64,
    pub blocks_errored: u64,
}

/// Stateful RDS group decoder. Owns the station registry and all per-group
/// accumulation state; has no I/O of its own.
pub struct Decoder {
    registry: StationRegistry,
    group_buf: GroupBuffer,
    current_pi: Option<u16>,
    current_group_type: Option<GroupType>,
    radiotext: RadiotextBuffer,
    stereo_known: bool,
    is_stereo: bool,
    traffic_announcement: bool,
    af_list_remaining: u8,
    stats: DecoderStats,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            registry: StationRegistry::new(),
            group_buf: GroupBuffer::new(),
            current_pi: None,
            current_group_type: None,
            radiotext: RadiotextBuffer::new(),
            stereo_known: false,
            is_stereo: false,
            traffic_announcement: false,
            af_list_remaining: 0,
            stats: DecoderStats::default(),
        }
    }

    pub fn registry(&self) -> &StationRegistry {
        &self.registry
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Feed one raw RDS block. Returns any events triggered by this block
    /// (typically empty except when block 3 completes a new, non-duplicate
    /// group).
    pub fn process_block(&mut self, block: RdsBlock, tuner_frequency: f32) -> Vec<DecoderEvent> {
        self.stats.blocks_seen += 1;

        if block.is_error() {
            self.stats.blocks_errored += 1;
            tracing::debug!(
                errors = self.stats.blocks_errored,
                total = self.stats.blocks_seen,
                "dropped errored RDS block"
            );
            return Vec::new();
        }

        let mut events = Vec::new();

        match block.position() {
            0 => {
                let pi = block.word();
                let program = self.registry.lookup_or_insert(pi);
                program.freq = tuner_frequency;
                self.current_pi = Some(pi);
            }
            1 => {
                let pty_code = ((block.msb << 3) & 0x18) | ((block.lsb >> 5) & 0x07);
                let group_type = GroupType::from_block_b(block.msb);
                self.current_group_type = Some(group_type);

                if let Some(pi) = self.current_pi {
                    let program = self.registry.lookup_or_insert(pi);
                    if pty_code != 0 && program.program_type != pty_code {
                        program.program_type = pty_code;
                        if let Some(name) = crate::pty::name(pty_code) {
                            events.push(DecoderEvent::ProgramType(name));
                        }
                    }
                }
            }
            _ => {}
        }

        self.group_buf.set_block(&block);

        if block.position() == 3 {
            if let Some(group) = self.group_buf.finish() {
                if let Some(group_type) = self.current_group_type {
                    events.extend(self.dispatch(group_type, &group, tuner_frequency));
                }
            }
        }

        events
    }

    fn dispatch(
        &mut self,
        group_type: GroupType,
        group: &[u8; 8],
        tuner_frequency: f32,
    ) -> Vec<DecoderEvent> {
        let mut events = Vec::new();

        if group_type.is(0, Version::A) {
            events.extend(self.dispatch_0a(group, tuner_frequency));
        } else if group_type.is(2, Version::A) {
            events.extend(self.dispatch_2a(group));
        } else if group_type.is(4, Version::A) {
            events.push(DecoderEvent::Clock(LocalClock::from_group(group)));
        } else if group_type.is(8, Version::A) {
            events.push(DecoderEvent::Tmc(tmc::decode(group)));
        } else if group_type.is(14, Version::A) {
            events.extend(self.dispatch_14a(group, tuner_frequency));
        } else {
            tracing::trace!(
                family = group_type.family,
                version = ?group_type.version,
                "unhandled RDS group type"
            );
        }

        events
    }

    fn dispatch_0a(&mut self, group: &[u8; 8], _tuner_frequency: f32) -> Vec<DecoderEvent> {
        let mut events = Vec::new();
        let Some(pi) = self.current_pi else {
            return events;
        };

        let tp = group[2] & 0x04 == 0x04;
        let ta = group[3] & 0x10 == 0x10;
        let segment = group[3] & 0x03;

        {
            let program = self.registry.lookup_or_insert(pi);
            program.traffic_program = tp;

            if tp && ta != self.traffic_announcement {
                self.traffic_announcement = ta;
                events.push(DecoderEvent::TrafficAnnouncement(ta));
            }

            program.write_name_fragment(segment, [group[6], group[7]]);

            if segment == 3 && program.name_is_nonempty() {
                if program.last_emitted_name != Some(program.name) {
                    program.last_emitted_name = Some(program.name);
                    events.push(DecoderEvent::ProgramName(program.name_str().to_string()));
                }
            }

            if segment == 3 {
                let stereo_now = group[3] & 0x04 == 0x04;
                if !self.stereo_known || stereo_now != self.is_stereo {
                    self.stereo_known = true;
                    self.is_stereo = stereo_now;
                    events.push(DecoderEvent::Stereo(stereo_now));
                }
            }
        }

        // Alternative-frequency list (block C: groupData[4], groupData[5]).
        if let Some(len) = af::list_header(group[4]) {
            self.af_list_remaining = len;
        } else if self.af_list_remaining > 0 {
            if let Some(freq) = af::decode(group[4]) {
                let program = self.registry.lookup_or_insert(pi);
                if !program.alt_frequencies.contains(&freq) {
                    program.alt_frequencies.push(freq);
                }
            }
            if let Some(freq) = af::decode(group[5]) {
                let program = self.registry.lookup_or_insert(pi);
                if !program.alt_frequencies.contains(&freq) {
                    program.alt_frequencies.push(freq);
                }
            }
            self.af_list_remaining = self.af_list_remaining.saturating_sub(2);
        }

        events
    }

    fn dispatch_2a(&mut self, group: &[u8; 8]) -> Vec<DecoderEvent> {
        let index = group[3] & 0x0F;
        let ab_flag = group[3] & 0x10 == 0x10;

        let mut events = Vec::new();
        if let Some(text) = self.radiotext.observe_ab_flag(ab_flag) {
            events.push(DecoderEvent::Radiotext(text));
        }
        self.radiotext
            .write_segment(index, [group[4], group[5], group[6], group[7]]);
        events
    }

    fn dispatch_14a(&mut self, group: &[u8; 8], tuner_frequency: f32) -> Vec<DecoderEvent> {
        let other_pi = ((group[6] as u16) << 8) | group[7] as u16;
        let current_freq = self
            .current_pi
            .and_then(|pi| self.registry.get(pi))
            .map(|p| p.freq)
            .unwrap_or(tuner_frequency);

        let other = self.registry.lookup_or_insert(other_pi);
        match eon::handle_group(group, other, current_freq) {
            EonOutcome::NameFragmentWritten => vec![DecoderEvent::EonNameUpdated { other_pi }],
            EonOutcome::AfAssigned { other_pi, freq } => {
                vec![DecoderEvent::EonAfAssigned { other_pi, freq }]
            }
            EonOutcome::TrafficAnnouncementChanged { other_pi, on } => {
                vec![DecoderEvent::EonTrafficAnnouncement { other_pi, on }]
            }
            EonOutcome::AfNotApplicable
            | EonOutcome::TrafficAnnouncementUnchanged
            | EonOutcome::Unhandled { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(lsb: u8, msb: u8, pos: u8) -> RdsBlock {
        RdsBlock::new(lsb, msb, pos)
    }

    #[test]
    fn scenario_pi_record_creation() {
        let mut decoder = Decoder::new();
        decoder.process_block(block(0x34, 0x12, 0), 88.5);

        // PTY=10 (Pop music): code = ((msb<<3)&0x18)|((lsb>>5)&0x07).
        // Top two bits (0,1) come from msb&0x03=0x01; bottom three (0,1,0)
        // come from lsb's top 3 bits, so lsb = 0b010_00000 = 0x40.
        let events = decoder.process_block(block(0x40, 0x01, 1), 88.5);

        assert_eq!(events, vec![DecoderEvent::ProgramType("Pop music")]);
        let pd = decoder.registry().get(0x1234).unwrap();
        assert_eq!(pd.program_type, 10);
    }

    #[test]
    fn scenario_program_service_assembly() {
        let mut decoder = Decoder::new();
        decoder.process_block(block(0x34, 0x12, 0), 94.5);

        // Group type 0A (family=0, version A): block B msb = 0x00.
        let fragments: [[u8; 2]; 4] = [*b"BB", *b"C1", *b" R", *b"AD"];
        let mut final_events = Vec::new();
        for (segment, frag) in fragments.iter().enumerate() {
            decoder.process_block(RdsBlock::new(segment as u8, 0x00, 1), 94.5);
            decoder.process_block(RdsBlock::new(0, 0, 2), 94.5);
            final_events = decoder.process_block(RdsBlock::new(frag[1], frag[0], 3), 94.5);
        }

        assert!(final_events
            .iter()
            .any(|e| matches!(e, DecoderEvent::ProgramName(name) if name == "BBC1 RAD")));
    }

    #[test]
    fn scenario_radiotext_finalize() {
        let mut decoder = Decoder::new();
        decoder.process_block(block(0x00, 0x00, 0), 100.0);

        // Group type 2A (family=2, version A): block B msb = 0x20.
        let write = |decoder: &mut Decoder, index: u8, ab: bool, bytes: [u8; 4]| {
            let lsb_b = index | if ab { 0x10 } else { 0 };
            decoder.process_block(RdsBlock::new(lsb_b, 0x20, 1), 100.0);
            decoder.process_block(RdsBlock::new(bytes[1], bytes[0], 2), 100.0);
            decoder.process_block(RdsBlock::new(bytes[3], bytes[2], 3), 100.0)
        };

        // Establish baseline ab flag (false) while filling all five segments.
        write(&mut decoder, 0, false, *b"NOW ");
        write(&mut decoder, 1, false, *b"PLAY");
        write(&mut decoder, 2, false, *b"ING:");
        write(&mut decoder, 3, false, *b"   F");
        write(&mut decoder, 4, false, *b"OO  ");

        // Toggle the ab flag to finalize and emit the accumulated text.
        let events = write(&mut decoder, 0, true, *b"    ");

        assert!(events
            .iter()
            .any(|e| matches!(e, DecoderEvent::Radiotext(t) if t == "NOW PLAYING:   FOO")));
    }

    #[test]
    fn unhandled_group_type_is_silently_skipped() {
        let mut decoder = Decoder::new();
        decoder.process_block(block(0, 0, 0), 90.0);
        // group type 1A: family=1, version A -> msb = 0b0001_0000
        decoder.process_block(RdsBlock::new(0, 0b0001_0000, 1), 90.0);
        decoder.process_block(RdsBlock::new(0, 0, 2), 90.0);
        let events = decoder.process_block(RdsBlock::new(0, 0, 3), 90.0);
        assert!(events.is_empty());
    }

    #[test]
    fn errored_block_is_dropped_and_counted() {
        let mut decoder = Decoder::new();
        let events = decoder.process_block(RdsBlock::new(0, 0, 0x80), 90.0);
        assert!(events.is_empty());
        assert_eq!(decoder.stats().blocks_errored, 1);
    }
}
