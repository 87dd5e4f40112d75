// SPDX-License-Identifier: MIT

//! Alternative Frequency (AF) byte <-> MHz conversion, shared by the 0A
//! AF-list and the 14A EON AF-pair variant.

/// Decode an AF byte `1..=204` to a frequency in MHz.
/// `(100*(b-1) + 87600) / 1000`.
pub fn decode(byte: u8) -> Option<f32> {
    if (1..=204).contains(&byte) {
        Some((100.0 * (byte as f32 - 1.0) + 87600.0) / 1000.0)
    } else {
        None
    }
}

/// Inverse of [`decode`]: recover the AF byte for a frequency in MHz,
/// rounding to the nearest 100 kHz step.
pub fn encode(freq_mhz: f32) -> Option<u8> {
    let raw = (freq_mhz * 1000.0 - 87600.0) / 100.0 + 1.0;
    let rounded = raw.round();
    if (1.0..=204.0).contains(&rounded) {
        Some(rounded as u8)
    } else {
        None
    }
}

/// True if `byte` opens an AF-list header (`224..=249`), along with the
/// declared list length.
pub fn list_header(byte: u8) -> Option<u8> {
    if (224..=249).contains(&byte) {
        Some(byte - 224)
    } else {
        None
    }
}

/// True if `a` and `b` are within `tolerance` MHz of each other.
pub fn within(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_matches_scenario() {
        // groupData[5] = 12 decodes to 88.7 MHz per spec scenario 5.
        assert_eq!(decode(12), Some(88.7));
    }

    #[test]
    fn decode_out_of_range_is_none() {
        assert_eq!(decode(0), None);
        assert_eq!(decode(205), None);
    }

    #[test]
    fn encode_is_inverse_of_decode() {
        for b in 1u8..=204 {
            let f = decode(b).unwrap();
            assert_eq!(encode(f), Some(b), "round-trip failed for byte {b}");
        }
    }

    #[test]
    fn list_header_range() {
        assert_eq!(list_header(224), Some(0));
        assert_eq!(list_header(226), Some(2));
        assert_eq!(list_header(249), Some(25));
        assert_eq!(list_header(250), None);
        assert_eq!(list_header(223), None);
    }

    #[test]
    fn within_tolerance() {
        assert!(within(88.5, 88.54, 0.04));
        assert!(!within(88.5, 88.6, 0.04));
    }
}
