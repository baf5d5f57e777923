//! Lexical atoms: identifiers and the basic literals.
//!
//! Whether a word like `if` or `struct` is a keyword is not decided here;
//! [`identifier`] happily matches reserved words and the grammar layer
//! claims them with explicit `keyword(...)` parsers where the surface form
//! calls for them.

use super::combinators::{
    any_rune, choice, delimited, literal, map, one_or_more, pair, pred, right, rune, zero_or_more,
    Match, PResult, ParseError, Parser,
};
use super::source::Source;
use crate::ast::{BasicLit, Expr, Ident, LitKind};

/// Identifier text: a letter or underscore followed by letters, digits and
/// underscores, Unicode classes included. `_` alone is fine.
pub fn identifier(src: Source<'_>) -> PResult<'_> {
    let rest = src.rest();
    let mut chars = rest.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_alphabetic() || c == '_' => {}
        Some((_, c)) => {
            return Err(ParseError::new(
                src.offset(),
                format!("wanted identifier, got {c:?}"),
            ))
        }
        None => {
            return Err(ParseError::new(src.offset(), "wanted identifier, got \"\""));
        }
    }
    let mut end = rest.len();
    for (i, c) in chars {
        if !c.is_alphabetic() && !c.is_numeric() && c != '_' {
            end = i;
            break;
        }
    }
    Ok((src.advance(end), Match::Text(rest[..end].to_string())))
}

/// Identifier text wrapped as an [`Ident`] node.
pub fn ident(src: Source<'_>) -> PResult<'_> {
    map(identifier, |m| {
        Match::Expr(Expr::Ident(Ident::new(m.into_text())))
    })
    .parse(src)
}

fn decimal_digit<'a>() -> impl Parser<'a> {
    pred(any_rune, |m| {
        matches!(m, Match::Rune(c) if c.is_ascii_digit())
    })
}

fn digit_run(src: Source<'_>) -> PResult<'_> {
    map(one_or_more(decimal_digit()), |m| {
        Match::Text(m.into_seq().into_iter().map(Match::into_rune).collect())
    })
    .parse(src)
}

/// `"0"`, or a nonzero digit followed by any digits. Leading zeros lose to
/// the bare `"0"` branch.
pub fn int_lit(src: Source<'_>) -> PResult<'_> {
    let nonzero_digit = pred(decimal_digit(), |m| !matches!(m, Match::Rune('0')));
    let nonzero_lit = map(pair(nonzero_digit, zero_or_more(decimal_digit())), |m| {
        let (first, rest) = m.into_pair();
        let mut text = String::new();
        text.push(first.into_rune());
        for digit in rest.into_seq() {
            text.push(digit.into_rune());
        }
        Match::Text(text)
    });
    map(choice((literal("0"), nonzero_lit)), |m| {
        Match::Expr(Expr::BasicLit(BasicLit {
            kind: LitKind::Int,
            value: m.into_text(),
        }))
    })
    .parse(src)
}

/// Digits, `.`, digits.
pub fn float_lit(src: Source<'_>) -> PResult<'_> {
    map(pair(digit_run, right(rune('.'), digit_run)), |m| {
        let (int_part, frac_part) = m.into_pair();
        Match::Expr(Expr::BasicLit(BasicLit {
            kind: LitKind::Float,
            value: format!("{}.{}", int_part.into_text(), frac_part.into_text()),
        }))
    })
    .parse(src)
}

/// Interpreted string literal. No escape processing: the body is taken
/// verbatim and re-wrapped in quotes.
pub fn string_lit(src: Source<'_>) -> PResult<'_> {
    let body = zero_or_more(pred(any_rune, |m| !matches!(m, Match::Rune('"'))));
    map(delimited('"', '"', body), |m| {
        let text: String = m.into_seq().into_iter().map(Match::into_rune).collect();
        Match::Expr(Expr::BasicLit(BasicLit {
            kind: LitKind::String,
            value: format!("\"{text}\""),
        }))
    })
    .parse(src)
}

const RUNE_ESCAPES: [&str; 10] = [
    "\\a", "\\b", "\\f", "\\n", "\\r", "\\t", "\\v", "\\\\", "\\'", "\\\"",
];

fn escape_sequence(src: Source<'_>) -> PResult<'_> {
    let mut result = literal(RUNE_ESCAPES[0]).parse(src);
    for &escape in &RUNE_ESCAPES[1..] {
        if result.is_ok() {
            break;
        }
        result = literal(escape).parse(src);
    }
    result
}

/// Rune literal: one escape sequence from the fixed set, or any single
/// rune, between single quotes.
pub fn rune_lit(src: Source<'_>) -> PResult<'_> {
    let body = choice((
        escape_sequence,
        map(any_rune, |m| Match::Text(m.into_rune().to_string())),
    ));
    map(delimited('\'', '\'', body), |m| {
        Match::Expr(Expr::BasicLit(BasicLit {
            kind: LitKind::Char,
            value: format!("'{}'", m.into_text()),
        }))
    })
    .parse(src)
}

/// The basic-literal alternation. The order is load-bearing: float before
/// int, or `3.14` would stop at `3`.
pub fn basic_lit(src: Source<'_>) -> PResult<'_> {
    choice((float_lit, int_lit, rune_lit, string_lit)).parse(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(kind: LitKind, value: &str) -> Match {
        Match::Expr(Expr::BasicLit(BasicLit {
            kind,
            value: value.to_string(),
        }))
    }

    #[test]
    fn identifier_takes_the_longest_run() {
        let (next, matched) = identifier(Source::new("i_am_an_identifier")).unwrap();
        assert!(next.finished());
        assert_eq!(matched, Match::Text("i_am_an_identifier".into()));

        let (next, matched) = identifier(Source::new("not entirely an identifier")).unwrap();
        assert_eq!(next.rest(), " entirely an identifier");
        assert_eq!(matched, Match::Text("not".into()));
    }

    #[test]
    fn identifier_rejects_a_bad_first_rune() {
        let err = identifier(Source::new("!not at all an identifier")).unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.message, "wanted identifier, got '!'");

        let err = identifier(Source::new("")).unwrap_err();
        assert_eq!(err.message, "wanted identifier, got \"\"");
    }

    #[test]
    fn blank_identifier_is_valid() {
        let (next, matched) = identifier(Source::new("_ x")).unwrap();
        assert_eq!(next.rest(), " x");
        assert_eq!(matched, Match::Text("_".into()));
    }

    #[test]
    fn int_lit_zero_and_nonzero() {
        let (next, matched) = int_lit(Source::new("0 aoeu")).unwrap();
        assert_eq!(next.rest(), " aoeu");
        assert_eq!(matched, lit(LitKind::Int, "0"));

        let (next, matched) = int_lit(Source::new("12340 aoeu")).unwrap();
        assert_eq!(next.rest(), " aoeu");
        assert_eq!(matched, lit(LitKind::Int, "12340"));
    }

    #[test]
    fn int_lit_rejects_leading_zeros() {
        // The "0" branch wins; the rest of "01" is left unconsumed.
        let (next, matched) = int_lit(Source::new("01")).unwrap();
        assert_eq!(next.rest(), "1");
        assert_eq!(matched, lit(LitKind::Int, "0"));
    }

    #[test]
    fn float_lit_needs_digits_on_both_sides() {
        let (next, matched) = float_lit(Source::new("3.14)")).unwrap();
        assert_eq!(next.rest(), ")");
        assert_eq!(matched, lit(LitKind::Float, "3.14"));

        assert!(float_lit(Source::new("3.")).is_err());
        assert!(float_lit(Source::new(".5")).is_err());
    }

    #[test]
    fn string_lit_keeps_its_quotes() {
        let (next, matched) = string_lit(Source::new("\"Hello, World\"")).unwrap();
        assert!(next.finished());
        assert_eq!(matched, lit(LitKind::String, "\"Hello, World\""));
    }

    #[test]
    fn unterminated_string_fails_at_end_of_input() {
        let err = string_lit(Source::new("\"abc")).unwrap_err();
        assert_eq!(err.offset, 4);
        assert_eq!(err.message, "wanted a literal '\"', got \"\"");
    }

    #[test]
    fn rune_lit_plain_and_escaped() {
        let (next, matched) = rune_lit(Source::new("'a'")).unwrap();
        assert!(next.finished());
        assert_eq!(matched, lit(LitKind::Char, "'a'"));

        let (_, matched) = rune_lit(Source::new("'\\n'")).unwrap();
        assert_eq!(matched, lit(LitKind::Char, "'\\n'"));

        let (_, matched) = rune_lit(Source::new("'\\\\'")).unwrap();
        assert_eq!(matched, lit(LitKind::Char, "'\\\\'"));
    }

    #[test]
    fn basic_lit_prefers_float_over_int() {
        let (next, matched) = basic_lit(Source::new("3.14")).unwrap();
        assert!(next.finished());
        assert_eq!(matched, lit(LitKind::Float, "3.14"));

        let (_, matched) = basic_lit(Source::new("42")).unwrap();
        assert_eq!(matched, lit(LitKind::Int, "42"));

        let (_, matched) = basic_lit(Source::new("'x'")).unwrap();
        assert_eq!(matched, lit(LitKind::Char, "'x'"));

        let (_, matched) = basic_lit(Source::new("\"x\"")).unwrap();
        assert_eq!(matched, lit(LitKind::String, "\"x\""));
    }
}
