//! Token types produced by the scanner

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::unicode::line_terminator_len;

/// Token types
///
/// Keywords, punctuators and literals are not split further: the token text
/// carries the exact spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Comment,
    WhiteSpace,
    LineTerminator,
    /// A template chunk: `` `…` ``, `` `…${ ``, `}…${` or `` }…` ``
    Template,
    String,
    Punctuator,
    RegularExpression,
    Numeric,
    Identifier,
    Null,
    Boolean,
    Keyword,
}

impl TokenKind {
    /// Comments, whitespace and line terminators
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Comment | Self::WhiteSpace | Self::LineTerminator)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "Comment",
            Self::WhiteSpace => "WhiteSpace",
            Self::LineTerminator => "LineTerminator",
            Self::Template => "Template",
            Self::String => "String",
            Self::Punctuator => "Punctuator",
            Self::RegularExpression => "RegularExpression",
            Self::Numeric => "Numeric",
            Self::Identifier => "Identifier",
            Self::Null => "Null",
            Self::Boolean => "Boolean",
            Self::Keyword => "Keyword",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keywords, future reserved words included
pub const KEYWORDS: &[&str] = &[
    "if", "while", "for", "with", "typeof", "in", "void", "case", "instanceof", "yield", "throw",
    "delete", "else", "return", "do", "var", "function", "this", "new", "break", "catch",
    "finally", "try", "default", "continue", "switch", "const", "export", "import", "class",
    "extends", "debugger", "super", "let", "static", "enum", "await", "implements", "package",
    "protected", "interface", "private", "public",
];

/// Keywords after which a `/` starts a regular expression, e.g. `typeof /a/`
pub const REGEX_PREFIX_KEYWORDS: &[&str] = &[
    "typeof", "in", "void", "case", "instanceof", "yield", "throw", "delete", "else", "return",
    "do",
];

/// Keywords whose parenthesized head may be followed by a regular expression,
/// e.g. `if (x) /a/.test(y)`
pub const REGEX_PAREN_KEYWORDS: &[&str] = &["if", "while", "for", "with"];

/// Classify an identifier-like run
pub fn classify_word(text: &str) -> TokenKind {
    match text {
        "true" | "false" => TokenKind::Boolean,
        "null" => TokenKind::Null,
        _ if KEYWORDS.contains(&text) => TokenKind::Keyword,
        _ => TokenKind::Identifier,
    }
}

/// Line/column pair. Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Start/end line-column location
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

/// Half-open byte range into the source
pub type Range = (usize, usize);

/// Pattern and flags of a regular expression literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegexParts<'a> {
    pub pattern: &'a str,
    pub flags: &'a str,
}

impl<'a> RegexParts<'a> {
    /// Split `/pattern/flags` at its last slash
    pub fn split(text: &'a str) -> Self {
        let last = text.rfind('/').unwrap_or(0);
        RegexParts {
            pattern: text.get(1..last).unwrap_or(""),
            flags: &text[last + 1..],
        }
    }
}

/// A lexical token borrowing its text from the source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token<'a> {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub value: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<RegexParts<'a>>,
    #[serde(rename = "hasLineTerminator", skip_serializing_if = "std::ops::Not::not")]
    pub has_line_terminator_before: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

impl<'a> Token<'a> {
    /// Create a bare token without location information
    pub fn new(kind: TokenKind, value: &'a str) -> Self {
        Token {
            kind,
            value,
            regex: None,
            has_line_terminator_before: false,
            range: None,
            loc: None,
        }
    }

    pub fn is_punctuator(&self, text: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.value == text
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.kind == TokenKind::Keyword && self.value == text
    }
}

/// Scan position
///
/// Line and column are only maintained when location tracking is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor {
            offset: 0,
            line: 1,
            column: 0,
        }
    }
}

impl Cursor {
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// Move past `text`, which must start at the current offset
    pub fn advance(&mut self, text: &str, track_lines: bool) {
        self.offset += text.len();
        if !track_lines {
            return;
        }

        let mut rest = text;
        while let Some(c) = rest.chars().next() {
            if let Some(len) = line_terminator_len(rest) {
                self.line += 1;
                self.column = 0;
                rest = &rest[len..];
            } else {
                self.column += 1;
                rest = &rest[c.len_utf8()..];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_word() {
        assert_eq!(classify_word("foo"), TokenKind::Identifier);
        assert_eq!(classify_word("typeof"), TokenKind::Keyword);
        assert_eq!(classify_word("interface"), TokenKind::Keyword);
        assert_eq!(classify_word("true"), TokenKind::Boolean);
        assert_eq!(classify_word("null"), TokenKind::Null);
        assert_eq!(classify_word("of"), TokenKind::Identifier);
        assert_eq!(classify_word("undefined"), TokenKind::Identifier);
    }

    #[test]
    fn test_regex_parts() {
        let parts = RegexParts::split("/a\\/b/gi");
        assert_eq!(parts.pattern, "a\\/b");
        assert_eq!(parts.flags, "gi");

        let parts = RegexParts::split("/x/");
        assert_eq!(parts.pattern, "x");
        assert_eq!(parts.flags, "");
    }

    #[test]
    fn test_cursor_advance() {
        let mut cursor = Cursor::default();
        cursor.advance("ab\r\ncd\ne", true);
        assert_eq!(cursor.offset, 8);
        assert_eq!(cursor.line, 3);
        assert_eq!(cursor.column, 1);

        let mut cursor = Cursor::default();
        cursor.advance("é\n", false);
        assert_eq!(cursor.offset, 3);
        assert_eq!(cursor.line, 1);
    }

    #[test]
    fn test_token_json_shape() {
        let mut token = Token::new(TokenKind::Punctuator, "+");
        token.range = Some((1, 2));
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Punctuator", "value": "+", "range": [1, 2]}));

        token.has_line_terminator_before = true;
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["hasLineTerminator"], serde_json::json!(true));
    }
}
