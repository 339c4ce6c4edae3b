//! Literal decoding
//!
//! Turns the raw spelling of numeric, string and template tokens into
//! values. Strings are decoded through UTF-16 so that escaped surrogate
//! pairs combine; unpaired surrogates become U+FFFD.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Result, SyntaxError};
use crate::util::{CODE_POINT_MAX, unicode_to_utf16};

/// Numeric value of a numeric literal
pub fn parse_numeric(raw: &str) -> f64 {
    let bytes = raw.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return digits_value(&raw[2..], radix);
        }
        // Legacy octal
        if bytes[1..].iter().all(|b| (b'0'..=b'7').contains(b)) {
            return digits_value(&raw[1..], 8);
        }
    }
    raw.parse::<f64>().unwrap_or(f64::NAN)
}

fn digits_value(digits: &str, radix: u32) -> f64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d))
}

/// Decoded value of a quoted string literal
pub fn parse_string(raw: &str) -> Result<String> {
    let body = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");
    decode_escapes(body)
}

/// Resolve escape sequences and line continuations in `body`
pub fn decode_escapes(body: &str) -> Result<String> {
    if !body.contains('\\') {
        return Ok(body.to_string());
    }

    let mut units: Vec<u16> = Vec::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            push_char(&mut units, c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            break;
        };
        match escaped {
            // Line continuations
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            'b' => units.push(0x08),
            't' => units.push(0x09),
            'n' => units.push(0x0A),
            'v' => units.push(0x0B),
            'f' => units.push(0x0C),
            'r' => units.push(0x0D),
            'x' => {
                let value = fixed_hex(&mut chars, 2)
                    .ok_or_else(|| SyntaxError::new("Invalid hexadecimal escape sequence"))?;
                units.push(value as u16);
            }
            'u' => {
                let value = unicode_escape(&mut chars)?;
                unicode_to_utf16(&mut units, value);
            }
            '0'..='7' => {
                let max_len = if escaped <= '3' { 3 } else { 2 };
                let mut value = escaped as u32 - '0' as u32;
                for _ in 1..max_len {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                units.push(value as u16);
            }
            other => push_char(&mut units, other),
        }
    }
    Ok(String::from_utf16_lossy(&units))
}

fn push_char(units: &mut Vec<u16>, c: char) {
    let mut buf = [0u16; 2];
    units.extend_from_slice(c.encode_utf16(&mut buf));
}

/// Read exactly `len` hex digits
fn fixed_hex(chars: &mut Peekable<Chars<'_>>, len: usize) -> Option<u32> {
    let mut value = 0;
    for _ in 0..len {
        let digit = chars.peek()?.to_digit(16)?;
        chars.next();
        value = value * 16 + digit;
    }
    Some(value)
}

/// Read the rest of a `\u` escape: four hex digits or a braced code point
fn unicode_escape(chars: &mut Peekable<Chars<'_>>) -> Result<u32> {
    if chars.peek() != Some(&'{') {
        return fixed_hex(chars, 4).ok_or_else(|| SyntaxError::new("Invalid Unicode escape sequence"));
    }
    chars.next();

    let mut digits = String::new();
    loop {
        match chars.next() {
            Some('}') => break,
            Some(c) => digits.push(c),
            None => return Err(SyntaxError::new("Unterminated Unicode escape sequence")),
        }
    }
    match u32::from_str_radix(&digits, 16) {
        Ok(value) if value <= CODE_POINT_MAX => Ok(value),
        _ => Err(SyntaxError::new("Undefined Unicode code-point")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("42"), 42.0);
        assert_eq!(parse_numeric("1.5e3"), 1500.0);
        assert_eq!(parse_numeric(".5"), 0.5);
        assert_eq!(parse_numeric("5."), 5.0);
        assert_eq!(parse_numeric("0x1F"), 31.0);
        assert_eq!(parse_numeric("0o17"), 15.0);
        assert_eq!(parse_numeric("0B101"), 5.0);
        assert_eq!(parse_numeric("017"), 15.0);
        assert_eq!(parse_numeric("019"), 19.0);
        assert_eq!(parse_numeric("0"), 0.0);
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(parse_string("'abc'").unwrap(), "abc");
        assert_eq!(parse_string(r#""a\"b""#).unwrap(), "a\"b");
        assert_eq!(parse_string(r"'\t\n\\'").unwrap(), "\t\n\\");
        assert_eq!(parse_string("'a\\\r\nb'").unwrap(), "ab");
        assert_eq!(parse_string(r"'\x41B\u{43}'").unwrap(), "ABC");
        assert_eq!(parse_string(r"'😀'").unwrap(), "😀");
        assert_eq!(parse_string(r"'\u{1F600}'").unwrap(), "😀");
        assert_eq!(parse_string(r"'\q'").unwrap(), "q");
    }

    #[test]
    fn test_octal_escapes() {
        assert_eq!(parse_string(r"'\0'").unwrap(), "\0");
        assert_eq!(parse_string(r"'\101'").unwrap(), "A");
        assert_eq!(parse_string(r"'\477'").unwrap(), "'7");
        assert_eq!(parse_string(r"'\08'").unwrap(), "\08");
    }

    #[test]
    fn test_malformed_escapes() {
        assert!(parse_string(r"'\x4'").is_err());
        assert!(parse_string(r"'\u12'").is_err());
        assert!(parse_string(r"'\u{41'").is_err());
        let err = parse_string(r"'\u{110000}'").unwrap_err();
        assert_eq!(err.message, "Undefined Unicode code-point");
    }
}
