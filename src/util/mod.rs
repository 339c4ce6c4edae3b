//! Utility functions
//!
//! Helpers shared by the scanner, the parser and the untokenizer.

pub mod unicode;

/// Highest valid Unicode code point
pub const CODE_POINT_MAX: u32 = 0x10FFFF;

/// Encode a Unicode code point as UTF-16 code units
///
/// Code points above U+FFFF are split into a surrogate pair.
/// Returns the number of code units written (1 or 2).
#[inline]
pub fn unicode_to_utf16(buf: &mut Vec<u16>, c: u32) -> usize {
    if c <= 0xFFFF {
        buf.push(c as u16);
        1
    } else {
        let c = c - 0x10000;
        buf.push((0xD800 + (c >> 10)) as u16);
        buf.push((0xDC00 + (c & 0x3FF)) as u16);
        2
    }
}

/// Shorten `text` to at most `max` characters, appending `...` when cut
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
