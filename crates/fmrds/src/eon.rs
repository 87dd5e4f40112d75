// SPDX-License-Identifier: MIT

//! RDS group 14A: Enhanced Other Networks (EON) variant handling.

use crate::af;
use crate::station::ProgramData;

/// Outcome of processing one 14A group, used by the decoder to decide what
/// (if anything) to emit.
#[derive(Debug, Clone, PartialEq)]
pub enum EonOutcome {
    /// Variants 0..=3: a name fragment was written; nothing to announce.
    NameFragmentWritten,
    /// Variant 5: the AF pair matched the current station and was applied.
    AfAssigned { other_pi: u16, freq: f32 },
    /// Variant 5 but the first frequency didn't match the current station.
    AfNotApplicable,
    /// Variant 0xD: the other station's TA flag changed.
    TrafficAnnouncementChanged { other_pi: u16, on: bool },
    /// Variant 0xD but TP-ON was not asserted, or TA was unchanged.
    TrafficAnnouncementUnchanged,
    /// A variant this decoder doesn't act on (valid, but not in the
    /// required subset).
    Unhandled { variant: u8 },
}

/// Process one 14A group against the `other` station (looked up by the PI
/// in block D) and, for variant 5, the `current` station's frequency.
pub fn handle_group(group: &[u8; 8], other: &mut ProgramData, current_freq: f32) -> EonOutcome {
    let tp_on = group[3] & 0x10 == 0x10;
    let variant = group[3] & 0x0F;

    match variant {
        0..=3 => {
            other.write_name_fragment(variant, [group[4], group[5]]);
            EonOutcome::NameFragmentWritten
        }
        5 => {
            let msb = group[4];
            let lsb = group[5];
            let (Some(f1), Some(f2)) = (af::decode(msb), af::decode(lsb)) else {
                return EonOutcome::AfNotApplicable;
            };
            if current_freq > 0.0 && af::within(f1, current_freq, 0.04) {
                other.freq = f2;
                EonOutcome::AfAssigned {
                    other_pi: other.id,
                    freq: f2,
                }
            } else {
                EonOutcome::AfNotApplicable
            }
        }
        0xD => {
            let ta_on = group[7] & 0x01 != 0;
            if tp_on && ta_on != other.traffic_announcement {
                other.traffic_announcement = ta_on;
                EonOutcome::TrafficAnnouncementChanged {
                    other_pi: other.id,
                    on: ta_on,
                }
            } else {
                EonOutcome::TrafficAnnouncementUnchanged
            }
        }
        v => EonOutcome::Unhandled { variant: v },
    }
}
