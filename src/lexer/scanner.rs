//! Lexical scanner
//!
//! Matches the composite pattern repeatedly over the input. Regular
//! expression candidates are checked against the tokens already emitted, and
//! template literals are split into chunks whose embedded expressions are
//! scanned by a nested scanner seeded with the enclosing cursor.

use log::trace;

use super::pattern::{self, Lexeme};
use super::token::{
    Cursor, REGEX_PAREN_KEYWORDS, REGEX_PREFIX_KEYWORDS, RegexParts, SourceLocation, Token,
    TokenKind, classify_word,
};
use crate::options::TokenizeOptions;
use crate::util::unicode::has_line_terminator;

/// Tokens of one scan, plus where it stopped if some input was left unrecognized
#[derive(Debug, Clone, PartialEq)]
pub struct Scan<'a> {
    pub tokens: Vec<Token<'a>>,
    /// Offset of the first character no alternative recognizes
    pub halted_at: Option<usize>,
}

/// How a scan loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Reached the end of the scanned region
    Finished,
    /// Stopped before an unbalanced `}`
    Closed,
    /// Stopped before an unrecognized character
    Halted,
}

/// Saved scanner state, restored when a template interpolation turns out not to close
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    tokens: usize,
    cursor: Cursor,
    newline_before: bool,
    at_line_start: bool,
}

/// Per-call scan state
pub struct Scanner<'a, 'o> {
    source: &'a str,
    /// Exclusive end of the region this scanner may consume
    end: usize,
    cursor: Cursor,
    options: &'o TokenizeOptions,
    tokens: Vec<Token<'a>>,
    /// A line terminator was seen since the last significant token
    newline_before: bool,
    /// Only whitespace was seen since the start of input or the last line terminator
    at_line_start: bool,
    /// Stop at a `}` that closes a template interpolation
    stop_at_close: bool,
    /// Open `{ ( [` punctuators in this region
    depth: usize,
}

impl<'a, 'o> Scanner<'a, 'o> {
    pub fn new(source: &'a str, options: &'o TokenizeOptions) -> Self {
        Scanner {
            source,
            end: source.len(),
            cursor: Cursor::default(),
            options,
            tokens: Vec::new(),
            newline_before: false,
            at_line_start: true,
            stop_at_close: false,
            depth: 0,
        }
    }

    /// Scan the whole input
    pub fn scan(mut self) -> Scan<'a> {
        let flow = self.run();
        let halted_at = (flow == Flow::Halted).then_some(self.cursor.offset);
        if let Some(offset) = halted_at {
            trace!("scan halted at offset {offset}");
        }
        Scan {
            tokens: self.tokens,
            halted_at,
        }
    }

    /// A scanner over `self.cursor..end` that continues this token stream.
    ///
    /// The emitted tokens move into the nested scanner so that regular
    /// expression checks inside template interpolations see the full
    /// history; [`Self::absorb`] moves them back.
    fn nested(&mut self, end: usize) -> Scanner<'a, 'o> {
        Scanner {
            source: self.source,
            end,
            cursor: self.cursor,
            options: self.options,
            tokens: std::mem::take(&mut self.tokens),
            newline_before: self.newline_before,
            at_line_start: self.at_line_start,
            stop_at_close: self.stop_at_close,
            depth: self.depth,
        }
    }

    fn absorb(&mut self, nested: Scanner<'a, 'o>) {
        self.tokens = nested.tokens;
        self.cursor = nested.cursor;
        self.newline_before = nested.newline_before;
        self.at_line_start = nested.at_line_start;
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            tokens: self.tokens.len(),
            cursor: self.cursor,
            newline_before: self.newline_before,
            at_line_start: self.at_line_start,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.tokens.truncate(checkpoint.tokens);
        self.cursor = checkpoint.cursor;
        self.newline_before = checkpoint.newline_before;
        self.at_line_start = checkpoint.at_line_start;
    }

    fn run(&mut self) -> Flow {
        while self.cursor.offset < self.end {
            let rest = &self.source[self.cursor.offset..self.end];

            if self.at_line_start {
                if let Some(len) = pattern::html_close_comment_len(rest) {
                    self.emit(TokenKind::Comment, len);
                    continue;
                }
            }

            if self.stop_at_close && self.depth == 0 && rest.starts_with('}') {
                return Flow::Closed;
            }

            let Some((mut lexeme, mut len)) = pattern::match_lexeme(rest, true) else {
                return Flow::Halted;
            };

            if lexeme == Lexeme::RegularExpression && !pattern::literal_suffix_ok(&rest[len..]) {
                // The literal alternative fails as a whole; the next one is a punctuator.
                match pattern::match_lexeme(rest, false) {
                    Some(next) => (lexeme, len) = next,
                    None => return Flow::Halted,
                }
            }

            let flow = match lexeme {
                Lexeme::BlockComment | Lexeme::LineComment => self.emit(TokenKind::Comment, len),
                Lexeme::Template => self.scan_template(),
                Lexeme::String => self.emit(TokenKind::String, len),
                Lexeme::RegularExpression => self.scan_regex(len),
                Lexeme::Numeric => self.emit(TokenKind::Numeric, len),
                Lexeme::Punctuator => self.emit(TokenKind::Punctuator, len),
                Lexeme::WhiteSpace => self.emit(TokenKind::WhiteSpace, len),
                Lexeme::LineTerminator => self.emit(TokenKind::LineTerminator, len),
                Lexeme::Word => self.emit(classify_word(&rest[..len]), len),
            };
            if flow != Flow::Finished {
                return flow;
            }
        }
        Flow::Finished
    }

    /// Emit the next `len` bytes as one token
    fn emit(&mut self, kind: TokenKind, len: usize) -> Flow {
        let start = self.cursor.offset;
        let value = &self.source[start..start + len];
        let begin = self.cursor.position();
        self.cursor.advance(value, self.options.loc);

        match kind {
            TokenKind::LineTerminator => {
                self.newline_before = true;
                self.at_line_start = true;
            }
            TokenKind::WhiteSpace => {}
            TokenKind::Comment => {
                if has_line_terminator(value) {
                    self.newline_before = true;
                }
                self.at_line_start = false;
            }
            TokenKind::Punctuator => {
                match value {
                    "{" | "(" | "[" => self.depth += 1,
                    "}" | ")" | "]" => self.depth = self.depth.saturating_sub(1),
                    _ => {}
                }
                self.at_line_start = false;
            }
            _ => self.at_line_start = false,
        }

        if !self.options.retains(kind) {
            return Flow::Finished;
        }

        let mut token = Token::new(kind, value);
        if kind == TokenKind::RegularExpression {
            token.regex = Some(RegexParts::split(value));
        }
        if !kind.is_trivia() {
            token.has_line_terminator_before = std::mem::take(&mut self.newline_before);
        }
        if self.options.range {
            token.range = Some((start, start + len));
        }
        if self.options.loc {
            token.loc = Some(SourceLocation {
                start: begin,
                end: self.cursor.position(),
            });
        }
        self.tokens.push(token);
        Flow::Finished
    }

    /// Emit a regular expression candidate, or re-lex it from the slash as
    /// division when the preceding tokens rule a literal out.
    ///
    /// Only the division punctuator is emitted here; the rest of the former
    /// candidate is scanned by the main loop, so a `//` comment inside it is
    /// still recognized.
    fn scan_regex(&mut self, len: usize) -> Flow {
        if self.regex_allowed() {
            return self.emit(TokenKind::RegularExpression, len);
        }

        let start = self.cursor.offset;
        trace!(
            "re-lexing {:?} at {start} as division",
            &self.source[start..start + len]
        );
        match pattern::match_lexeme(&self.source[start..self.end], false) {
            Some((Lexeme::Punctuator, len)) => self.emit(TokenKind::Punctuator, len),
            _ => Flow::Halted,
        }
    }

    /// Whether a `/` at the current position may open a regular expression
    fn regex_allowed(&self) -> bool {
        let Some((index, prev)) = self
            .tokens
            .iter()
            .enumerate()
            .rev()
            .find(|(_, token)| !token.kind.is_trivia())
        else {
            return true;
        };

        match prev.kind {
            TokenKind::Punctuator => match prev.value {
                ")" => self.paren_head_allows_regex(index),
                "]" | "." | "..." => false,
                _ => true,
            },
            TokenKind::Keyword => REGEX_PREFIX_KEYWORDS.contains(&prev.value),
            TokenKind::Template => prev.value.ends_with("${"),
            _ => false,
        }
    }

    /// Whether the `(` matching the `)` at `close` follows `if`, `while`, `for` or `with`
    fn paren_head_allows_regex(&self, close: usize) -> bool {
        let mut depth = 0usize;
        for index in (0..=close).rev() {
            let token = &self.tokens[index];
            if token.kind != TokenKind::Punctuator {
                continue;
            }
            match token.value {
                ")" => depth += 1,
                "(" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.tokens[..index]
                            .iter()
                            .rev()
                            .find(|token| !token.kind.is_trivia())
                            .is_some_and(|head| {
                                head.kind == TokenKind::Keyword
                                    && REGEX_PAREN_KEYWORDS.contains(&head.value)
                            });
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// Split the template literal opening at the cursor into chunks and
    /// interpolations.
    ///
    /// The closing backtick is found by walking the text; each interpolation
    /// is scanned by a nested scanner, so templates nest to any depth.
    fn scan_template(&mut self) -> Flow {
        let opening = self.checkpoint();
        let start = self.cursor.offset;
        let mut chunk_start = start;
        let mut pos = start + 1;
        let mut backslashes = 0usize;

        while pos < self.end {
            let rest = &self.source[pos..self.end];
            if rest.starts_with('\\') {
                backslashes += 1;
                pos += 1;
                continue;
            }

            let escaped = backslashes % 2 == 1;
            backslashes = 0;
            if !escaped && rest.starts_with('`') {
                return self.emit(TokenKind::Template, pos + 1 - chunk_start);
            }
            if !escaped && rest.starts_with("${") {
                let checkpoint = self.checkpoint();
                self.emit(TokenKind::Template, pos + 2 - chunk_start);

                let mut inner = self.nested(self.end);
                inner.stop_at_close = true;
                inner.depth = 0;
                inner.at_line_start = false;
                let flow = inner.run();
                self.absorb(inner);

                match flow {
                    Flow::Closed => {
                        trace!("template interpolation closed at {}", self.cursor.offset);
                        chunk_start = self.cursor.offset;
                        pos = chunk_start + 1;
                    }
                    Flow::Halted => return Flow::Halted,
                    Flow::Finished => {
                        // Unclosed: keep `${` as literal text of the current chunk
                        self.restore(checkpoint);
                        pos += 2;
                    }
                }
                continue;
            }

            pos += rest.chars().next().map_or(1, char::len_utf8);
        }

        trace!("unterminated template at {start}");
        self.restore(opening);
        Flow::Halted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn kinds_and_values(source: &str) -> Vec<(TokenKind, &str)> {
        Scanner::new(source, &TokenizeOptions::default())
            .scan()
            .tokens
            .into_iter()
            .map(|token| (token.kind, token.value))
            .collect()
    }

    fn round_trip(source: &str) -> String {
        let scan = Scanner::new(source, &TokenizeOptions::lossless()).scan();
        assert_eq!(scan.halted_at, None, "scan of {source:?} halted");
        scan.tokens.iter().map(|token| token.value).collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            kinds_and_values("var x = null; if (true) x++"),
            vec![
                (TokenKind::Keyword, "var"),
                (TokenKind::Identifier, "x"),
                (TokenKind::Punctuator, "="),
                (TokenKind::Null, "null"),
                (TokenKind::Punctuator, ";"),
                (TokenKind::Keyword, "if"),
                (TokenKind::Punctuator, "("),
                (TokenKind::Boolean, "true"),
                (TokenKind::Punctuator, ")"),
                (TokenKind::Identifier, "x"),
                (TokenKind::Punctuator, "++"),
            ]
        );
    }

    #[test]
    fn test_division_is_not_regex() {
        let tokens = kinds_and_values("a/b/g");
        assert!(tokens.iter().all(|(kind, _)| *kind != TokenKind::RegularExpression));
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Identifier, "a"),
                (TokenKind::Punctuator, "/"),
                (TokenKind::Identifier, "b"),
                (TokenKind::Punctuator, "/"),
                (TokenKind::Identifier, "g"),
            ]
        );

        let tokens = kinds_and_values("var g=1,a=2/3/g;");
        assert!(tokens.iter().all(|(kind, _)| *kind != TokenKind::RegularExpression));

        let options = TokenizeOptions {
            comment: true,
            ..Default::default()
        };
        let scan = Scanner::new("x = total / count //\ny", &options).scan();
        let values: Vec<_> = scan.tokens.iter().map(|token| token.value).collect();
        assert_eq!(values, ["x", "=", "total", "/", "count", "//", "y"]);
    }

    #[test]
    fn test_regex_after_paren_head() {
        let tokens = kinds_and_values("if (1) /a/g.test(x)");
        let regexes: Vec<_> = tokens
            .iter()
            .filter(|(kind, _)| *kind == TokenKind::RegularExpression)
            .collect();
        assert_eq!(regexes, vec![&(TokenKind::RegularExpression, "/a/g")]);

        let tokens = kinds_and_values("(a) /b/ c");
        assert!(tokens.iter().all(|(kind, _)| *kind != TokenKind::RegularExpression));
    }

    #[test]
    fn test_regex_contexts() {
        let scan = Scanner::new("x = /[/]+/gi;", &TokenizeOptions::default()).scan();
        let regex = &scan.tokens[2];
        assert_eq!(regex.kind, TokenKind::RegularExpression);
        assert_eq!(regex.value, "/[/]+/gi");
        assert_eq!(regex.regex, Some(RegexParts { pattern: "[/]+", flags: "gi" }));

        assert_eq!(kinds_and_values("return /a/")[1].0, TokenKind::RegularExpression);
        assert_eq!(kinds_and_values("typeof /a/")[1].0, TokenKind::RegularExpression);
        assert_eq!(kinds_and_values("a[0] /b/ c")[4].0, TokenKind::Punctuator);
    }

    #[test]
    fn test_template_split() {
        assert_eq!(
            kinds_and_values("`a${1+1}b`"),
            vec![
                (TokenKind::Template, "`a${"),
                (TokenKind::Numeric, "1"),
                (TokenKind::Punctuator, "+"),
                (TokenKind::Numeric, "1"),
                (TokenKind::Template, "}b`"),
            ]
        );
    }

    #[test]
    fn test_template_nesting() {
        assert_eq!(
            kinds_and_values("`${ {a: 1}[\"}\"] }x${`in${y}`}`"),
            vec![
                (TokenKind::Template, "`${"),
                (TokenKind::Punctuator, "{"),
                (TokenKind::Identifier, "a"),
                (TokenKind::Punctuator, ":"),
                (TokenKind::Numeric, "1"),
                (TokenKind::Punctuator, "}"),
                (TokenKind::Punctuator, "["),
                (TokenKind::String, "\"}\""),
                (TokenKind::Punctuator, "]"),
                (TokenKind::Template, "}x${"),
                (TokenKind::Template, "`in${"),
                (TokenKind::Identifier, "y"),
                (TokenKind::Template, "}`"),
                (TokenKind::Template, "}`"),
            ]
        );
    }

    #[test]
    fn test_template_deep_nesting() {
        let tokens = kinds_and_values("`${ (() => { if (a) { return `x${b}` } })() }`");
        let templates: Vec<_> = tokens
            .iter()
            .filter(|(kind, _)| *kind == TokenKind::Template)
            .map(|(_, value)| *value)
            .collect();
        assert_eq!(templates, ["`${", "`x${", "}`", "}`"]);
        assert_eq!(tokens.last(), Some(&(TokenKind::Template, "}`")));
    }

    #[test]
    fn test_unterminated_template_halts() {
        let scan = Scanner::new("x = `abc", &TokenizeOptions::default()).scan();
        assert_eq!(scan.halted_at, Some(4));
        assert_eq!(scan.tokens.len(), 2);

        let scan = Scanner::new("`a${b", &TokenizeOptions::default()).scan();
        assert_eq!(scan.halted_at, Some(0));
        assert!(scan.tokens.is_empty());
    }

    #[test]
    fn test_template_escapes() {
        assert_eq!(kinds_and_values(r"`a\${b}`"), vec![(TokenKind::Template, r"`a\${b}`")]);
        assert_eq!(
            kinds_and_values(r"`a\\${b}`"),
            vec![
                (TokenKind::Template, r"`a\\${"),
                (TokenKind::Identifier, "b"),
                (TokenKind::Template, "}`"),
            ]
        );
        assert_eq!(kinds_and_values("`a` + 1")[1], (TokenKind::Punctuator, "+"));
    }

    #[test]
    fn test_template_regex_in_interpolation() {
        let tokens = kinds_and_values("`${/a/.source}`");
        assert_eq!(tokens[1], (TokenKind::RegularExpression, "/a/"));
    }

    #[test]
    fn test_round_trip() {
        let sources = [
            "var a = 1;\r\n// comment\n/* block\n comment */ b = a / 2 / c;",
            "if (x) /re/g.exec(s)\u{2028}<!-- html\n  --> close\n",
            "`t ${ a + `u${b}` } v` + 'str\\\nline'",
            "x\t\u{A0}=\u{3000}0x1F + .5e3 - 010",
            "a\\u0062c = \\u{1F600}",
        ];
        for source in sources {
            assert_eq!(round_trip(source), source);
        }
    }

    #[test]
    fn test_html_close_comment() {
        let tokens = kinds_and_values("a\n  --> note\nb --> c");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Identifier, "a"),
                (TokenKind::Identifier, "b"),
                (TokenKind::Punctuator, "--"),
                (TokenKind::Punctuator, ">"),
                (TokenKind::Identifier, "c"),
            ]
        );

        let options = TokenizeOptions {
            comment: true,
            ..Default::default()
        };
        let scan = Scanner::new("--> first", &options).scan();
        assert_eq!(scan.tokens[0].kind, TokenKind::Comment);
    }

    #[test]
    fn test_line_terminator_flag() {
        let scan = Scanner::new("a\nb /*\n*/ c d", &TokenizeOptions::default()).scan();
        let flags: Vec<_> = scan
            .tokens
            .iter()
            .map(|token| token.has_line_terminator_before)
            .collect();
        assert_eq!(flags, vec![false, true, true, false]);
    }

    #[test]
    fn test_ranges_and_locations() {
        let options = TokenizeOptions {
            range: true,
            loc: true,
            ..Default::default()
        };
        let scan = Scanner::new("ab\n  `x${é}`", &options).scan();
        let tokens = &scan.tokens;
        assert_eq!(tokens[0].range, Some((0, 2)));
        assert_eq!(tokens[1].value, "`x${");
        assert_eq!(tokens[1].range, Some((5, 9)));
        let loc = tokens[1].loc.unwrap();
        assert_eq!((loc.start.line, loc.start.column), (2, 2));
        assert_eq!((loc.end.line, loc.end.column), (2, 6));
        assert_eq!(tokens[2].value, "é");
        assert_eq!(tokens[2].range, Some((9, 11)));
        assert_eq!(tokens[2].loc.unwrap().end.column, 7);
        assert_eq!(tokens[3].range, Some((11, 13)));
    }

    #[test]
    fn test_halts_on_unrecognized_input() {
        let scan = Scanner::new("a = @b", &TokenizeOptions::default()).scan();
        assert_eq!(scan.halted_at, Some(4));
        assert_eq!(scan.tokens.len(), 2);

        let scan = Scanner::new("x = \"open", &TokenizeOptions::default()).scan();
        assert_eq!(scan.halted_at, Some(4));

        let scan = Scanner::new("\\ x", &TokenizeOptions::default()).scan();
        assert_eq!(scan.halted_at, Some(0));
        assert!(scan.tokens.is_empty());
    }
}
