//! Composite lexical pattern
//!
//! All lexical alternatives live in one anchored regular expression whose
//! named groups are tried in order; the first group that matches decides the
//! lexeme. The `regex` crate has no lookaround, so the "literal suffix"
//! lookahead that guards regular expression literals is checked by
//! [`literal_suffix_ok`] after the match.

use std::sync::LazyLock;

use regex::Regex;

use crate::util::unicode::{has_line_terminator, is_ascii_word, is_line_terminator, is_space};

/// Line terminator characters, for use inside a character class
const LT: &str = r"\r\n\u{2028}\u{2029}";

/// Whitespace characters other than line terminators, for use inside a character class
const WS: &str = r"\t\x0B\x0C \u{A0}\u{1680}\u{2000}-\u{200A}\u{202F}\u{205F}\u{3000}\u{FEFF}";

/// Raw lexeme categories recognized by the composite pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lexeme {
    BlockComment,
    LineComment,
    Template,
    String,
    RegularExpression,
    Numeric,
    Punctuator,
    WhiteSpace,
    LineTerminator,
    /// Identifier, keyword, boolean or null
    Word,
}

/// Group names, in alternative order
const GROUPS: &[(&str, Lexeme)] = &[
    ("block_comment", Lexeme::BlockComment),
    ("line_comment", Lexeme::LineComment),
    ("template", Lexeme::Template),
    ("string", Lexeme::String),
    ("regex", Lexeme::RegularExpression),
    ("numeric", Lexeme::Numeric),
    ("punctuator", Lexeme::Punctuator),
    ("white_space", Lexeme::WhiteSpace),
    ("line_terminator", Lexeme::LineTerminator),
    ("word", Lexeme::Word),
];

/// Only the opening backtick; the scanner walks the rest of a template itself
const TEMPLATE_START: &str = "`";

const NUMERIC: &str = concat!(
    r"0(?:[xX][0-9a-fA-F]+|[oO][0-7]+|[bB][01]+)",
    r"|(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+\-]?[0-9]+)?",
    r"|[1-9][0-9]*",
    r"|0[0-7]+",
);

const PUNCTUATOR: &str = concat!(
    r">>>=?|\.\.\.|<<=|===|!==|>>=",
    r"|[=!<>*%+/\&|\^\-]=",
    r"|&&|\|\||\+\+|--|<<|>>|=>",
    r"|[\-+*/%<>=\&|\^\~!?:;,.()\[\]{}]",
);

fn string_pattern() -> String {
    let quoted = |q: &str| [q, r"(?:\\\r\n|\\(?s:.)|[^", q, r"\\", LT, "])*", q].concat();
    [quoted("\""), "|".to_string(), quoted("'")].concat()
}

fn regex_pattern() -> String {
    let class = [r"\[(?:\\(?s:.)|[^\]\\", LT, r"])*\]"].concat();
    [
        r"/(?:\\(?s:.)|",
        &class,
        r"|[^/*\\",
        LT,
        r"])(?:\\(?s:.)|",
        &class,
        r"|[^/\\",
        LT,
        r"])*/[gimuy]*",
    ]
    .concat()
}

/// One identifier unit: a unicode escape or a character that is neither
/// space, quote nor operator
fn word_unit() -> String {
    [
        r"(?:\\u(?:[0-9a-fA-F]{4}|\{[0-9a-fA-F]+\})|[^",
        WS,
        LT,
        r"\\+/%*=\&|\^\~<>!?:;,.()\[\]{}'`@\#\-",
        "\"",
        "])",
    ]
    .concat()
}

fn composite(with_regex: bool) -> Regex {
    let alternatives: Vec<(&str, String)> = vec![
        ("block_comment", r"/\*(?s:.)*?\*/".to_string()),
        ("line_comment", [r"//[^", LT, r"]*|<!--[^", LT, "]*"].concat()),
        ("template", TEMPLATE_START.to_string()),
        ("string", string_pattern()),
        ("regex", regex_pattern()),
        ("numeric", NUMERIC.to_string()),
        ("punctuator", PUNCTUATOR.to_string()),
        ("white_space", ["[", WS, "]+"].concat()),
        ("line_terminator", [r"\r\n|[", LT, "]"].concat()),
        ("word", [&word_unit(), "+"].concat()),
    ];

    let body = alternatives
        .iter()
        .filter(|(name, _)| with_regex || *name != "regex")
        .map(|(name, pattern)| format!("(?P<{name}>{pattern})"))
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&format!(r"\A(?:{body})")).expect("composite lexical pattern must compile")
}

static FULL: LazyLock<Regex> = LazyLock::new(|| composite(true));
static WITHOUT_REGEX: LazyLock<Regex> = LazyLock::new(|| composite(false));
static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\A{}", word_unit())).expect("word pattern must compile"));
static WORD_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"{}\z", word_unit())).expect("word pattern must compile"));

/// Match the composite pattern at the start of `rest`.
///
/// Returns the lexeme category and its byte length, or `None` when no
/// alternative recognizes the input.
pub fn match_lexeme(rest: &str, with_regex: bool) -> Option<(Lexeme, usize)> {
    let pattern = if with_regex { &*FULL } else { &*WITHOUT_REGEX };
    let caps = pattern.captures(rest)?;
    GROUPS
        .iter()
        .find_map(|&(name, lexeme)| caps.name(name).map(|m| (lexeme, m.end())))
}

/// Length of an HTML-like `-->` comment at the start of `rest`
pub fn html_close_comment_len(rest: &str) -> Option<usize> {
    if !rest.starts_with("-->") {
        return None;
    }
    Some(rest.find(is_line_terminator).unwrap_or(rest.len()))
}

/// Check what follows a regular expression literal.
///
/// A literal may be followed by optional space and then anything that does
/// not begin another operand: an operator that cannot start an expression,
/// a closing bracket, a separator, a comment, a line break or the end of
/// input.
pub fn literal_suffix_ok(after: &str) -> bool {
    let rest = after.trim_start_matches(is_space);
    let skipped = &after[..after.len() - rest.len()];
    if has_line_terminator(skipped) {
        return true;
    }

    let Some(c) = rest.chars().next() else {
        return true;
    };

    let starts_operand =
        is_ascii_word(c) || matches!(c, '/' | '\\' | '<' | '>' | '*' | '+' | '%' | '`' | '^' | '"' | '\'' | '$' | '-');
    if !starts_operand && (!skipped.is_empty() || !matches!(c, '(' | '{' | '[')) {
        return true;
    }

    ["==", "!=", "||", "&&", "/*", "//"]
        .iter()
        .any(|op| rest.starts_with(op))
        || matches!(c, ',' | '.' | ';' | ':' | '!' | '?' | ')' | '}' | ']')
}

/// Check whether `text` begins with an identifier unit
pub fn starts_with_word(text: &str) -> bool {
    WORD_START.is_match(text)
}

/// Check whether `text` ends with an identifier unit
pub fn ends_with_word(text: &str) -> bool {
    WORD_END.is_match(text)
}
