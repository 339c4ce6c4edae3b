//! Token-level minifier
//!
//! Scans with line terminators retained, drops every line break the
//! grammar does not need, re-inserts breaks to keep lines bounded, then
//! renders with minimal spacing.

pub mod untokenizer;

use log::{debug, trace};

use crate::lexer::{Token, TokenKind, tokenize};
use crate::options::{MinifyOptions, TokenizeOptions, UntokenizeOptions};
use crate::util::unicode::ends_with_sign;

pub use untokenizer::untokenize;

/// Minify `source`.
///
/// Input the scanner cannot fully recognize is minified up to the point
/// where scanning stopped.
pub fn minify(source: &str, options: &MinifyOptions) -> String {
    debug!("minify: {} bytes, {options:?}", source.len());
    let tokens = tokenize(
        source,
        &TokenizeOptions {
            line_terminator: true,
            ..Default::default()
        },
    );
    let tokens = break_lines(flatten(restore_comment_breaks(tokens)), options.max_line_len);
    untokenize(&tokens, &UntokenizeOptions::default())
}

fn is_line_terminator(token: &Token<'_>) -> bool {
    token.kind == TokenKind::LineTerminator
}

/// Line breaks before `++` and `--` end the statement
fn is_restricted_punctuator(token: &Token<'_>) -> bool {
    token.is_punctuator("++") || token.is_punctuator("--")
}

/// Put back the line breaks hidden inside dropped multi-line comments.
///
/// A comment spanning lines separates statements like a line terminator,
/// so a token flagged with a preceding break gets one when the stream has
/// none right before it.
pub fn restore_comment_breaks(tokens: Vec<Token<'_>>) -> Vec<Token<'_>> {
    let mut out: Vec<Token<'_>> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let needs_break = token.has_line_terminator_before
            && !token.kind.is_trivia()
            && out.last().is_some_and(|previous| !is_line_terminator(previous));
        if needs_break {
            out.push(Token::new(TokenKind::LineTerminator, "\n"));
        }
        out.push(token);
    }
    out
}

/// Drop line terminators that cannot affect semicolon insertion.
///
/// Runs of breaks collapse to one. Leading breaks go, as do breaks next to
/// a punctuator, except before `++`/`--` where the break ends the statement.
pub fn flatten(tokens: Vec<Token<'_>>) -> Vec<Token<'_>> {
    let total = tokens.len();
    let mut out: Vec<Token<'_>> = Vec::with_capacity(total);
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if !is_line_terminator(&token) {
            out.push(token);
            continue;
        }

        while iter.peek().is_some_and(is_line_terminator) {
            iter.next();
        }

        let restricted_next = iter.peek().is_some_and(is_restricted_punctuator);
        let after_punctuator = match out.last() {
            None => true,
            Some(previous) => previous.kind == TokenKind::Punctuator && !restricted_next,
        };
        let before_punctuator = iter
            .peek()
            .is_some_and(|next| next.kind == TokenKind::Punctuator && !restricted_next);
        if !after_punctuator && !before_punctuator {
            out.push(token);
        }
    }

    trace!("flatten: {total} -> {} tokens", out.len());
    out
}

/// Insert a line break after the first safe punctuator once a line reaches
/// `max_line_len` bytes
pub fn break_lines(tokens: Vec<Token<'_>>, max_line_len: usize) -> Vec<Token<'_>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut line_len = 0;
    let mut breaks = 0usize;
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if is_line_terminator(&token) {
            line_len = 0;
            out.push(token);
            continue;
        }

        line_len += token.value.len();
        let breakable = line_len >= max_line_len
            && token.kind == TokenKind::Punctuator
            && !ends_with_sign(token.value)
            && !iter.peek().is_some_and(|next| is_restricted_punctuator(next) || is_line_terminator(next));
        out.push(token);
        if breakable {
            out.push(Token::new(TokenKind::LineTerminator, "\n"));
            line_len = 0;
            breaks += 1;
        }
    }

    trace!("break_lines: {breaks} breaks at limit {max_line_len}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use crate::parser::{Node, parse};
    use test_log::test;

    fn minify_default(source: &str) -> String {
        minify(source, &MinifyOptions::default())
    }

    #[test]
    fn test_drops_redundant_breaks() {
        let source = "\n\nvar a = 1;\n\n// note\nvar b = 2;\n";
        assert_eq!(minify_default(source), "var a=1;var b=2;");
    }

    #[test]
    fn test_keeps_significant_breaks() {
        assert_eq!(minify_default("a\n\n\nb"), "a\nb");
        assert_eq!(minify_default("return\na"), "return\na");
        assert_eq!(minify_default("a\n++b"), "a\n++b");
        assert_eq!(minify_default("x = y\n(z)"), "x=y(z)");
        assert_eq!(minify_default("a\n"), "a\n");
    }

    #[test]
    fn test_breaks_inside_comments() {
        assert_eq!(minify_default("a /*\n*/ b"), "a\nb");
        assert_eq!(
            minify_default("function f(){ return /*\n*/ 1 }"),
            "function f(){return\n1}"
        );
        assert_eq!(minify_default("a = 1 /* x */ + 2"), "a=1+2");
        assert_eq!(minify_default("a; /*\n*/ b"), "a;b");

        let options = ParseOptions::default();
        let minified = minify_default("x = 1 /*\n*/ y = 2");
        assert_eq!(minified, "x=1\ny=2");
        assert!(parse(&minified, &options).is_ok());
    }

    #[test]
    fn test_shrinks_and_keeps_meaning() {
        let source = "function add(a, b) {\n  /* sum */\n  return a + b;\n}\n\nvar total = add(1, +2) - -3;\n";
        let minified = minify_default(source);
        assert!(minified.len() < source.len());
        assert_eq!(minified, "function add(a,b){return a+b;}var total=add(1,+2)- -3;");

        let strip = |node: Node| {
            let mut json = serde_json::to_value(node).unwrap();
            json.as_object_mut().unwrap().remove("range");
            json
        };
        let options = ParseOptions::default();
        assert_eq!(
            strip(parse(source, &options).unwrap()),
            strip(parse(&minified, &options).unwrap())
        );
    }

    #[test]
    fn test_idempotent() {
        let sources = [
            "var s = `a${ b + 1 }c`;\nif (x) /re/.test(s);\nfoo()",
            "a\n\n\nb\n",
            "x = y / 2 / z; // done",
        ];
        for source in sources {
            let once = minify_default(source);
            assert_eq!(minify_default(&once), once);
        }
    }

    #[test]
    fn test_line_length_bound() {
        let options = MinifyOptions { max_line_len: 4 };
        assert_eq!(minify("a = 1; b = 2; c = 3;", &options), "a=1;\nb=2;\nc=3;\n");

        let options = MinifyOptions { max_line_len: 1 };
        assert_eq!(minify("a[0]\n++b", &options), "a[\n0]\n++b");
    }

    #[test]
    fn test_flatten_tokens() {
        let tokens = tokenize(
            "\n a \n\n ; \n b",
            &TokenizeOptions {
                line_terminator: true,
                ..Default::default()
            },
        );
        let kinds: Vec<_> = flatten(tokens).iter().map(|token| token.kind).collect();
        assert_eq!(kinds, [TokenKind::Identifier, TokenKind::Punctuator, TokenKind::Identifier]);
    }
}
