//! Parser state and token cursor
//!
//! Recursive descent over the significant tokens of a [`Scan`]. Node spans
//! are taken from token markers: a node starts at the token that was
//! current when it began and ends at the last consumed token.

use crate::error::{Result, SyntaxError, TOKEN_EXCERPT_LEN};
use crate::lexer::token::Cursor;
use crate::lexer::{Position, Range, Scan, SourceLocation, Token, TokenKind};
use crate::options::ParseOptions;

use super::ast::{Node, NodeKind};

/// Index of a token in the parser's stream
pub(crate) type Marker = usize;

/// A parsed node whose final span is not decided yet.
///
/// A parenthesized expression may turn out to be the parameter list of an
/// arrow function. Committing gives the node the span recorded here; the
/// arrow path discards the record and keeps the node as parsed.
#[must_use]
pub(crate) struct PendingRevision {
    node: Node,
    start: Marker,
    end: Marker,
}

impl PendingRevision {
    pub(crate) fn new(node: Node, start: Marker, end: Marker) -> Self {
        PendingRevision { node, start, end }
    }

    pub(crate) fn commit(self, parser: &Parser<'_>) -> Node {
        let mut node = self.node;
        parser.respan(&mut node, self.start, self.end);
        node
    }

    pub(crate) fn discard(self) -> Node {
        self.node
    }
}

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    halted_at: Option<usize>,
    pub(crate) index: usize,
    pub(crate) options: ParseOptions,
    /// Inside a generator body, where `yield` is an operator
    pub(crate) in_generator: bool,
    /// `=` of the first shorthand property default (`{a = 1}`) not yet
    /// rewritten into a pattern
    pub(crate) shorthand_init: Option<Marker>,
    /// Token span of the last parenthesized expression, parens included
    pub(crate) parenthesized: Option<(Marker, Marker)>,
}

impl<'a> Parser<'a> {
    /// Create a parser over a scan that retained no trivia
    pub fn new(source: &'a str, scan: Scan<'a>, options: ParseOptions) -> Self {
        Parser {
            source,
            tokens: scan.tokens,
            halted_at: scan.halted_at,
            index: 0,
            options,
            in_generator: false,
            shorthand_init: None,
            parenthesized: None,
        }
    }

    // Token cursor

    pub(crate) fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.index)
    }

    pub(crate) fn peek(&self, ahead: usize) -> Option<&Token<'a>> {
        self.tokens.get(self.index + ahead)
    }

    pub(crate) fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|token| token.kind)
    }

    pub(crate) fn current_value(&self) -> &'a str {
        self.current().map_or("", |token| token.value)
    }

    pub(crate) fn advance(&mut self) {
        if self.index < self.tokens.len() {
            self.index += 1;
        }
    }

    /// Check the current token's text
    pub(crate) fn is(&self, text: &str) -> bool {
        self.current().is_some_and(|token| token.value == text)
    }

    pub(crate) fn is_kind(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    pub(crate) fn eat(&mut self, text: &str) -> bool {
        if self.is(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, text: &str) -> Result<()> {
        if self.eat(text) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// A line break separates the current token from the previous one
    pub(crate) fn newline_before(&self) -> bool {
        self.current().is_some_and(|token| token.has_line_terminator_before)
    }

    /// No tokens remain and the scan consumed the whole input
    pub(crate) fn at_end(&self) -> bool {
        self.index >= self.tokens.len() && self.halted_at.is_none()
    }

    pub(crate) fn has_more_tokens(&self) -> bool {
        self.index < self.tokens.len()
    }

    /// Consume a statement terminator, inserting one where permitted
    pub(crate) fn consume_semicolon(&mut self) -> Result<()> {
        if self.eat(";") || self.is("}") || self.at_end() || self.newline_before() {
            return Ok(());
        }
        Err(self.unexpected())
    }

    // Errors

    /// Error for the current token, or for the input where scanning halted
    pub(crate) fn unexpected(&self) -> SyntaxError {
        if self.current().is_some() {
            return self.unexpected_at(self.index);
        }

        let Some(offset) = self.halted_at else {
            return SyntaxError::end_of_input();
        };
        let rest = &self.source[offset..];
        let stray = rest.chars().next().map(String::from).unwrap_or_default();
        let err = SyntaxError::unexpected(&stray);
        if !self.options.loc {
            return err;
        }
        let mut cursor = Cursor::default();
        cursor.advance(&self.source[..offset], true);
        err.at(cursor.line, cursor.column)
    }

    /// Error quoting the token at `marker`
    pub(crate) fn unexpected_at(&self, marker: Marker) -> SyntaxError {
        let Some(token) = self.tokens.get(marker) else {
            return SyntaxError::end_of_input();
        };
        self.at_token(marker, SyntaxError::unexpected(token.value))
    }

    /// Give `err` the position of the token at `marker`
    pub(crate) fn at_token(&self, marker: Marker, err: SyntaxError) -> SyntaxError {
        match self.tokens.get(marker).and_then(|token| token.loc) {
            Some(loc) if self.options.loc => err.at(loc.start.line, loc.start.column),
            _ => err,
        }
    }

    /// Attach the current token and its position to an error raised while
    /// decoding it
    pub(crate) fn locate(&self, mut err: SyntaxError) -> SyntaxError {
        let Some(token) = self.current() else {
            return err;
        };
        if err.token.is_empty() {
            err.token = crate::util::truncate_chars(token.value, TOKEN_EXCERPT_LEN);
        }
        match token.loc {
            Some(loc) if self.options.loc => err.at(loc.start.line, loc.start.column),
            _ => err,
        }
    }

    /// Error at the start of an already built node
    pub(crate) fn error_at(&self, node: &Node, message: &str) -> SyntaxError {
        let err = SyntaxError::new(message);
        match node.loc {
            Some(loc) => err.at(loc.start.line, loc.start.column),
            None => err,
        }
    }

    // Cover grammar

    /// Merge shorthand defaults recorded before a nested parse back in
    pub(crate) fn keep_shorthand_init(&mut self, outer: Option<Marker>) {
        self.shorthand_init = outer.or(self.shorthand_init);
    }

    /// Reject a shorthand default that never became part of a pattern
    pub(crate) fn check_shorthand_init(&mut self) -> Result<()> {
        match self.shorthand_init.take() {
            Some(marker) => Err(self.at_token(
                marker,
                SyntaxError::new("Invalid shorthand property initializer"),
            )),
            None => Ok(()),
        }
    }

    // Spans

    pub(crate) fn start(&self) -> Marker {
        self.index
    }

    /// Last consumed token, never before `start`
    pub(crate) fn last(&self, start: Marker) -> Marker {
        self.index.saturating_sub(1).max(start)
    }

    /// Finish a node that began at `start` and ends at the last consumed token
    pub(crate) fn finish(&self, start: Marker, kind: NodeKind) -> Node {
        let mut node = Node::new(kind);
        self.respan(&mut node, start, self.last(start));
        node
    }

    /// Give `node` the span from token `start` through token `end`
    pub(crate) fn respan(&self, node: &mut Node, start: Marker, end: Marker) {
        let (range, loc) = self.span(start, end);
        node.range = range;
        node.loc = loc;
    }

    fn span(&self, start: Marker, end: Marker) -> (Option<Range>, Option<SourceLocation>) {
        let (Some(first), Some(last)) = (self.tokens.get(start), self.tokens.get(end)) else {
            return self.empty_span();
        };
        let range = match (first.range, last.range) {
            (Some(from), Some(to)) if self.options.range => Some((from.0, to.1)),
            _ => None,
        };
        let loc = match (first.loc, last.loc) {
            (Some(from), Some(to)) if self.options.loc => Some(SourceLocation {
                start: from.start,
                end: to.end,
            }),
            _ => None,
        };
        (range, loc)
    }

    /// Span of a node covering no tokens
    pub(crate) fn empty_span(&self) -> (Option<Range>, Option<SourceLocation>) {
        let origin = Position { line: 0, column: 0 };
        (
            self.options.range.then_some((0, 0)),
            self.options.loc.then_some(SourceLocation {
                start: origin,
                end: origin,
            }),
        )
    }

    pub(crate) fn token_count(&self) -> usize {
        self.tokens.len()
    }
}
