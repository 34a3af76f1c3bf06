//! Stable color picks for groups and avatars.

use crate::models::GroupId;

/// Colors available for group markers.
pub const GROUP_PALETTE: [&str; 9] = [
    "indigo", "pink", "emerald", "orange", "cyan", "violet", "yellow", "rose", "sky",
];

/// Colors available for name avatars.
pub const AVATAR_PALETTE: [&str; 15] = [
    "red", "orange", "amber", "green", "emerald", "teal", "cyan", "sky", "blue", "indigo",
    "violet", "purple", "fuchsia", "pink", "rose",
];

/// Index into a palette of `len` colors: polynomial hash `h = c + (h << 5) - h` over UTF-16
/// units, kept in wrapping 32-bit arithmetic, then `|h| % len`. Stable for a given string.
pub fn palette_index(s: &str, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let hash = s.encode_utf16().fold(0i32, |h, c| {
        (c as i32).wrapping_add(h.wrapping_shl(5).wrapping_sub(h))
    });
    (hash.unsigned_abs() as usize) % len
}

pub fn group_color(group_id: GroupId) -> &'static str {
    GROUP_PALETTE[palette_index(&group_id.to_string(), GROUP_PALETTE.len())]
}

pub fn avatar_color(name: &str) -> &'static str {
    AVATAR_PALETTE[palette_index(name, AVATAR_PALETTE.len())]
}

/// First two characters, uppercased.
pub fn initials(name: &str) -> String {
    name.chars().take(2).collect::<String>().to_uppercase()
}
