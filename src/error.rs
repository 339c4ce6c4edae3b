//! Syntax errors raised by the parser

use thiserror::Error;

use crate::util::truncate_chars;

/// Longest token excerpt quoted in an error message
pub(crate) const TOKEN_EXCERPT_LEN: usize = 10;

/// A grammar violation, with the offending token and its position when known
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", location_suffix(.line, .column))]
pub struct SyntaxError {
    pub message: String,
    /// Offending token text, shortened to a short excerpt
    pub token: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

fn location_suffix(line: &Option<u32>, column: &Option<u32>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" at line {line} column {column}"),
        _ => String::new(),
    }
}

impl SyntaxError {
    pub fn new(message: impl Into<String>) -> Self {
        SyntaxError {
            message: message.into(),
            token: String::new(),
            line: None,
            column: None,
        }
    }

    /// "Unexpected token" error quoting `token`
    pub fn unexpected(token: &str) -> Self {
        let token = truncate_chars(token, TOKEN_EXCERPT_LEN);
        SyntaxError {
            message: format!("Unexpected token '{token}'"),
            token,
            line: None,
            column: None,
        }
    }

    /// Premature end of the token stream
    pub fn end_of_input() -> Self {
        SyntaxError::new("Unexpected end of input")
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

/// Result alias for parser internals
pub type Result<T> = std::result::Result<T, SyntaxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SyntaxError::unexpected("}");
        assert_eq!(err.to_string(), "Unexpected token '}'");

        let err = SyntaxError::unexpected("abcdefghijklmnop").at(3, 4);
        assert_eq!(err.token, "abcdefghij...");
        assert_eq!(err.to_string(), "Unexpected token 'abcdefghij...' at line 3 column 4");
    }
}
