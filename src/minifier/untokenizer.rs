//! Token stream rendering
//!
//! Concatenates token texts, separating two tokens with a single space only
//! where gluing them would scan differently.

use log::trace;

use crate::lexer::pattern::{self, Lexeme, ends_with_word, starts_with_word};
use crate::lexer::{Token, TokenKind};
use crate::options::UntokenizeOptions;
use crate::util::unicode::ends_with_sign;

/// Render `tokens` back to source text
pub fn untokenize(tokens: &[Token<'_>], options: &UntokenizeOptions) -> String {
    let capacity = tokens.iter().map(|token| token.value.len() + 1).sum();
    let mut out = String::with_capacity(capacity);
    let mut spaces = 0usize;

    for (index, token) in tokens.iter().enumerate() {
        if let Some(previous) = index.checked_sub(1).map(|i| &tokens[i])
            && needs_space(previous, token, tokens.get(index + 1), options.unsafe_spacing)
        {
            out.push(' ');
            spaces += 1;
        }
        out.push_str(token.value);
    }

    trace!("untokenize: {} tokens, {spaces} separators", tokens.len());
    out
}

/// Whether `previous` and `next` would merge into different tokens if glued.
///
/// `after` is the token following `next`. With `unsafe_spacing` the word
/// rules are skipped.
fn needs_space(previous: &Token<'_>, next: &Token<'_>, after: Option<&Token<'_>>, unsafe_spacing: bool) -> bool {
    if next.kind == TokenKind::Punctuator {
        // `a + +b`, `a - --b`
        if next.value.starts_with(['+', '-']) && ends_with_sign(previous.value) {
            return signs_merge(previous.value, next.value);
        }
        // `a / /b/` would open a line comment, `a < !--b` an HTML comment
        if next.value.starts_with('/') && previous.value.ends_with('/') {
            return true;
        }
        if next.value == "!" && previous.value.ends_with('<') {
            return after.is_some_and(|token| token.value.starts_with("--"));
        }
        // `1 .toString()` would read as `1.` then `toString`
        return next.value.starts_with('.')
            && previous.kind == TokenKind::Numeric
            && previous.value.bytes().all(|b| b.is_ascii_digit());
    }

    if next.kind == TokenKind::RegularExpression && previous.value.ends_with('/') {
        return true;
    }
    if unsafe_spacing {
        return false;
    }
    // Regex flags would swallow a following word
    if previous.kind == TokenKind::RegularExpression && starts_with_word(next.value) {
        return true;
    }
    starts_with_word(next.value) && ends_with_word(previous.value)
}

/// Whether `left` glued to `right` no longer scans as `left` first
fn signs_merge(left: &str, right: &str) -> bool {
    let glued = [left, right].concat();
    !matches!(
        pattern::match_lexeme(&glued, false),
        Some((Lexeme::Punctuator, len)) if len == left.len()
    )
}
