//! Option records for the public entry points
//!
//! All records deserialize from camelCase JSON and fall back to their
//! defaults for missing fields.

use serde::{Deserialize, Serialize};

/// Default soft limit on minified line length
pub const DEFAULT_MAX_LINE_LEN: usize = 32000;

/// Which trivia the scanner retains and which positions it records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenizeOptions {
    /// Keep comment tokens
    pub comment: bool,
    /// Keep line terminator tokens
    pub line_terminator: bool,
    /// Keep whitespace tokens
    pub white_space: bool,
    /// Record byte ranges
    pub range: bool,
    /// Record line/column locations
    pub loc: bool,
}

impl TokenizeOptions {
    /// Retain every token so the stream reproduces the source
    pub fn lossless() -> Self {
        TokenizeOptions {
            comment: true,
            line_terminator: true,
            white_space: true,
            ..Default::default()
        }
    }

    /// Whether tokens of `kind` are kept in the output
    pub fn retains(&self, kind: crate::TokenKind) -> bool {
        use crate::TokenKind;
        match kind {
            TokenKind::Comment => self.comment,
            TokenKind::LineTerminator => self.line_terminator,
            TokenKind::WhiteSpace => self.white_space,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Attach byte ranges to nodes
    pub range: bool,
    /// Attach line/column locations to nodes and errors
    pub loc: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UntokenizeOptions {
    /// Skip the spaces that keep identifier-like tokens apart; operator
    /// separators are still inserted
    #[serde(rename = "unsafe")]
    pub unsafe_spacing: bool,
    /// Accepted for symmetry with [`MinifyOptions`]; line breaking is done by the minifier
    pub max_line_len: usize,
}

impl Default for UntokenizeOptions {
    fn default() -> Self {
        UntokenizeOptions {
            unsafe_spacing: false,
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MinifyOptions {
    /// Soft limit on output line length
    pub max_line_len: usize,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        MinifyOptions {
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let opts: TokenizeOptions =
            serde_json::from_str(r#"{"lineTerminator": true, "whiteSpace": true}"#).unwrap();
        assert!(opts.line_terminator);
        assert!(opts.white_space);
        assert!(!opts.comment);
        assert!(!opts.loc);

        let opts: UntokenizeOptions = serde_json::from_str(r#"{"unsafe": true}"#).unwrap();
        assert!(opts.unsafe_spacing);
        assert_eq!(opts.max_line_len, DEFAULT_MAX_LINE_LEN);

        let opts: MinifyOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.max_line_len, 32000);
    }

    #[test]
    fn test_retains() {
        let opts = TokenizeOptions::default();
        assert!(!opts.retains(crate::TokenKind::Comment));
        assert!(opts.retains(crate::TokenKind::Identifier));
        assert!(TokenizeOptions::lossless().retains(crate::TokenKind::WhiteSpace));
    }
}
