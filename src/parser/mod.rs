//! ESTree parser
//!
//! Recursive descent over the scanner's significant tokens, producing a
//! [`Node`] tree. Automatic semicolon insertion follows the line terminator
//! flags the scanner attaches to tokens.

pub mod ast;
pub mod literal;
#[allow(clippy::module_inception)]
pub mod parser;

mod expression;
mod pattern;
mod statement;

use log::debug;

use crate::error::Result;
use crate::lexer::Scanner;
use crate::options::{ParseOptions, TokenizeOptions};

// Re-exports
pub use ast::{LiteralValue, Node, NodeKind};
pub use parser::Parser;

/// Parse `source` as a program.
///
/// Fails with a [`SyntaxError`](crate::SyntaxError) on the first grammar
/// violation, malformed escape, or character the scanner cannot recognize.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Node> {
    debug!("parse: {} bytes, {options:?}", source.len());
    let tokenize = TokenizeOptions {
        range: true,
        loc: options.loc,
        ..Default::default()
    };
    let scan = Scanner::new(source, &tokenize).scan();
    Parser::new(source, scan, *options).parse_program()
}
