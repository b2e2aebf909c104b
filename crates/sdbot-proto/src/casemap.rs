//! Chat identity case mapping.
//!
//! Room and user names are compared by their id: the name lower-cased
//! with everything except ASCII letters and digits removed, so
//! `"Lobby"`, `"lobby"` and `" L-o-b-b-y "` all name the same room.

/// Map a single character to its id form, or `None` if ids drop it.
#[inline]
pub const fn id_char(c: char) -> Option<char> {
    match c {
        'A'..='Z' => Some((c as u8 + 32) as char),
        'a'..='z' | '0'..='9' => Some(c),
        _ => None,
    }
}

/// Convert a display name to its id.
pub fn to_id(name: &str) -> String {
    name.chars().filter_map(id_char).collect()
}

/// Compare two names by id.
pub fn id_eq(a: &str, b: &str) -> bool {
    a.chars()
        .filter_map(id_char)
        .eq(b.chars().filter_map(id_char))
}
