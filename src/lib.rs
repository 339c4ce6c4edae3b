//! Chiffon - a compact ECMAScript tokenizer, ESTree parser and minifier
//!
//! Four pure entry points share one lexical scanner:
//!
//! - [`tokenize`] splits source text into tokens, optionally keeping trivia
//!   and recording byte ranges and line/column locations
//! - [`parse`] builds an ESTree-shaped syntax tree
//! - [`untokenize`] renders tokens back to text with minimal spacing
//! - [`minify`] drops the whitespace, comments and line breaks the grammar
//!   does not need
//!
//! # Example
//! ```
//! use chiffon::{MinifyOptions, ParseOptions, minify, parse};
//!
//! let program = parse("let x = 1 + 2 * 3", &ParseOptions::default()).unwrap();
//! assert_eq!(program.type_name(), "Program");
//!
//! let small = minify("var a = 1;\n\n// note\nvar b = a;", &MinifyOptions::default());
//! assert_eq!(small, "var a=1;var b=a;");
//! ```

// Errors and options
pub mod error;
pub mod options;

// Scanner
pub mod lexer;

// Parser
pub mod parser;

// Minifier and untokenizer
pub mod minifier;

// Utilities
pub mod util;

// Re-export main types
pub use error::SyntaxError;
pub use lexer::{Token, TokenKind, tokenize};
pub use minifier::{minify, untokenize};
pub use options::{MinifyOptions, ParseOptions, TokenizeOptions, UntokenizeOptions};
pub use parser::{Node, NodeKind, parse};
