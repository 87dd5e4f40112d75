// SPDX-License-Identifier: MIT

//! The closed 30-entry RDS Program Type (PTY) name table.

/// Program type names, indexed `code - 1` for `code` in `1..=30`.
///
/// PTY 0 means "unknown" and has no entry here; callers must check for it
/// separately before indexing.
pub const PROGRAM_TYPES: [&str; 30] = [
    "News",
    "Current affairs",
    "Information",
    "Sport",
    "Education",
    "Drama",
    "Culture",
    "Science",
    "Varied",
    "Pop music",
    "Rock music",
    "Easy listening",
    "Light classical",
    "Serious classical",
    "Other music",
    "Weather",
    "Finance",
    "Children's programmes",
    "Social affairs",
    "Religion",
    "Phone-in",
    "Travel",
    "Leisure",
    "Jazz music",
    "Country music",
    "National music",
    "Oldies music",
    "Folk music",
    "Documentary",
    "Alarm test",
];

/// Look up the display name for a 5-bit PTY code, or `None` for 0 (unknown)
/// or any out-of-range value.
pub fn name(code: u8) -> Option<&'static str> {
    if code == 0 {
        return None;
    }
    PROGRAM_TYPES.get((code - 1) as usize).copied()
}
