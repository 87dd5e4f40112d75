// SPDX-License-Identifier: MIT

//! Radiotext (RT) accumulation: a 64-character, space-filled buffer written
//! in 4-byte segments, finalized on A/B flag toggle.

const RADIOTEXT_LEN: usize = 64;

/// Accumulates radiotext segments and finalizes on A/B toggle.
#[derive(Debug)]
pub struct RadiotextBuffer {
    buf: [u8; RADIOTEXT_LEN],
    ab_flag: Option<bool>,
}

impl Default for RadiotextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl RadiotextBuffer {
    pub fn new() -> Self {
        Self {
            buf: [b' '; RADIOTEXT_LEN],
            ab_flag: None,
        }
    }

    /// Write a 4-byte segment at `4*index .. 4*index+4`.
    pub fn write_segment(&mut self, index: u8, bytes: [u8; 4]) {
        let offset = (index as usize) * 4;
        if offset + 4 <= self.buf.len() {
            self.buf[offset..offset + 4].copy_from_slice(&bytes);
        }
    }

    /// Called with the A/B flag carried in the current segment's group.
    /// On a flip from the previously seen flag, returns the finalized text
    /// (right-trimmed of spaces and `\r`) if non-empty, and resets the
    /// buffer to spaces. Returns `None` on the first observation (no prior
    /// flag to compare against) or when the flag is unchanged.
    pub fn observe_ab_flag(&mut self, flag: bool) -> Option<String> {
        let toggled = matches!(self.ab_flag, Some(prev) if prev != flag);
        self.ab_flag = Some(flag);

        if !toggled {
            return None;
        }

        let trimmed_len = self
            .buf
            .iter()
            .rposition(|&b| b != b' ' && b != b'\r')
            .map(|i| i + 1)
            .unwrap_or(0);

        let text = if trimmed_len > 0 {
            Some(String::from_utf8_lossy(&self.buf[..trimmed_len]).into_owned())
        } else {
            None
        };

        self.buf = [b' '; RADIOTEXT_LEN];
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(s: &str) -> [u8; 4] {
        let bytes = s.as_bytes();
        let mut out = [b' '; 4];
        out[..bytes.len()].copy_from_slice(bytes);
        out
    }

    #[test]
    fn finalizes_and_trims_on_toggle() {
        let mut rt = RadiotextBuffer::new();
        rt.observe_ab_flag(false); // establishes baseline, no emission

        rt.write_segment(0, seg("NOW "));
        rt.write_segment(1, seg("PLAY"));
        rt.write_segment(2, seg("ING:"));
        rt.write_segment(3, seg("   F"));
        rt.write_segment(4, *b"OO  ");
        rt.write_segment(5, *b"    ");

        let text = rt.observe_ab_flag(true).expect("toggle should emit");
        assert_eq!(text, "NOW PLAYING:   FOO");
    }

    #[test]
    fn no_emission_without_toggle() {
        let mut rt = RadiotextBuffer::new();
        rt.observe_ab_flag(false);
        rt.write_segment(0, seg("HI  "));
        assert_eq!(rt.observe_ab_flag(false), None);
    }

    #[test]
    fn reset_yields_64_spaces() {
        let mut rt = RadiotextBuffer::new();
        rt.observe_ab_flag(false);
        rt.write_segment(0, seg("HI  "));
        rt.observe_ab_flag(true);
        assert_eq!(rt.buf, [b' '; RADIOTEXT_LEN]);
    }

    #[test]
    fn empty_text_suppressed() {
        let mut rt = RadiotextBuffer::new();
        rt.observe_ab_flag(false);
        assert_eq!(rt.observe_ab_flag(true), None);
    }
}
