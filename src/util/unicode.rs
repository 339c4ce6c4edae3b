//! Unicode utilities
//!
//! Character classes used by the scanner, the untokenizer and literal decoding.

/// Check if a character is a line terminator
#[inline]
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\u{000A}' | '\u{000D}' | '\u{2028}' | '\u{2029}')
}

/// Check if a character is whitespace that does not end a line
#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'  // Tab
        | '\u{000B}' // Vertical Tab
        | '\u{000C}' // Form Feed
        | '\u{0020}' // Space
        | '\u{00A0}' // No-Break Space
        | '\u{FEFF}' // BOM
    ) || is_unicode_space(c)
}

/// Check if a character is any kind of space, line terminators included
#[inline]
pub fn is_space(c: char) -> bool {
    is_whitespace(c) || is_line_terminator(c)
}

/// Check if a character is a Unicode space separator
#[inline]
pub fn is_unicode_space(c: char) -> bool {
    matches!(c, '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}')
}

/// Check if a character is an ASCII "word" character (`[A-Za-z0-9_]`)
#[inline]
pub fn is_ascii_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Check if a string ends with a sign character (`+` or `-`)
#[inline]
pub fn ends_with_sign(s: &str) -> bool {
    s.ends_with(['+', '-'])
}

/// Length of the line terminator sequence at the start of `s`, if any.
///
/// `\r\n` counts as a single sequence.
pub fn line_terminator_len(s: &str) -> Option<usize> {
    if s.starts_with("\r\n") {
        return Some(2);
    }
    s.chars()
        .next()
        .filter(|&c| is_line_terminator(c))
        .map(char::len_utf8)
}

/// Check whether a string contains a line terminator
pub fn has_line_terminator(s: &str) -> bool {
    s.chars().any(is_line_terminator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_terminators() {
        assert!(is_line_terminator('\n'));
        assert!(is_line_terminator('\r'));
        assert!(is_line_terminator('\u{2028}'));
        assert!(!is_line_terminator(' '));

        assert_eq!(line_terminator_len("\r\nx"), Some(2));
        assert_eq!(line_terminator_len("\nx"), Some(1));
        assert_eq!(line_terminator_len("\u{2029}"), Some(3));
        assert_eq!(line_terminator_len("x\n"), None);
    }

    #[test]
    fn test_whitespace() {
        assert!(is_whitespace('\t'));
        assert!(is_whitespace('\u{FEFF}'));
        assert!(is_whitespace('\u{3000}'));
        assert!(!is_whitespace('\n'));
        assert!(is_space('\n'));
    }
}
