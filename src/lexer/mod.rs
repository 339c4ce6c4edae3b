//! ECMAScript lexer
//!
//! Turns source text into a flat token stream borrowing from the source.

pub mod pattern;
pub mod scanner;
pub mod token;

use log::debug;

use crate::options::TokenizeOptions;

pub use scanner::{Scan, Scanner};
pub use token::{Position, Range, RegexParts, SourceLocation, Token, TokenKind};

/// Tokenize `source`.
///
/// Never fails: scanning stops at the first character no lexical rule
/// recognizes, and the tokens before it are returned.
pub fn tokenize<'a>(source: &'a str, options: &TokenizeOptions) -> Vec<Token<'a>> {
    debug!("tokenize: {} bytes, {options:?}", source.len());
    Scanner::new(source, options).scan().tokens
}
