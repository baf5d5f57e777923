//! Parser-combinator kernel.
//!
//! A parser is anything that maps a [`Source`] cursor to a [`PResult`]:
//! either the advanced cursor plus a [`Match`] payload, or a positional
//! [`ParseError`]. Failure never moves the cursor the caller holds, which
//! is what makes ordered choice and backtracking free.
//!
//! Grammar rules are plain functions with this shape, so mutually recursive
//! rules simply call each other by name; no combinator closes over mutable
//! state and finished parsers may be reused freely.

use thiserror::Error;

use super::source::Source;
use crate::ast::{BasicLit, BlockStmt, CaseClause, Decl, Expr, Field, File, Ident, Stmt, StructType, Tok};

// ============================================================================
// PARSE RESULT
// ============================================================================

/// A parse failure: the byte offset where the mismatch was detected and a
/// human-readable message. No partial tree is carried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        ParseError {
            offset,
            message: message.into(),
        }
    }
}

pub type PResult<'a> = Result<(Source<'a>, Match), ParseError>;

// ============================================================================
// MATCHED PAYLOAD
// ============================================================================

/// Payload of a successful match. Lexical parsers produce the leaf
/// variants; `map` steps fold them into AST nodes as rules complete.
#[derive(Debug, Clone, PartialEq)]
pub enum Match {
    Rune(char),
    Text(String),
    Tok(Tok),
    Pair(Box<Match>, Box<Match>),
    Seq(Vec<Match>),
    None,
    Expr(Expr),
    Stmt(Stmt),
    Block(BlockStmt),
    Case(CaseClause),
    Field(Field),
    Struct(StructType),
    Decl(Decl),
    File(File),
}

// Accessors for map steps. Each is called only where the rule just built
// that payload shape; a mismatch is a grammar bug, not an input error.
impl Match {
    pub fn into_rune(self) -> char {
        match self {
            Match::Rune(c) => c,
            other => unreachable!("expected rune payload, got {other:?}"),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Match::Text(text) => text,
            other => unreachable!("expected text payload, got {other:?}"),
        }
    }

    pub fn into_tok(self) -> Tok {
        match self {
            Match::Tok(tok) => tok,
            other => unreachable!("expected token payload, got {other:?}"),
        }
    }

    pub fn into_pair(self) -> (Match, Match) {
        match self {
            Match::Pair(left, right) => (*left, *right),
            other => unreachable!("expected pair payload, got {other:?}"),
        }
    }

    pub fn into_seq(self) -> Vec<Match> {
        match self {
            Match::Seq(items) => items,
            other => unreachable!("expected sequence payload, got {other:?}"),
        }
    }

    pub fn into_expr(self) -> Expr {
        match self {
            Match::Expr(expr) => expr,
            other => unreachable!("expected expression payload, got {other:?}"),
        }
    }

    pub fn into_ident(self) -> Ident {
        match self {
            Match::Expr(Expr::Ident(ident)) => ident,
            other => unreachable!("expected identifier payload, got {other:?}"),
        }
    }

    pub fn into_lit(self) -> BasicLit {
        match self {
            Match::Expr(Expr::BasicLit(lit)) => lit,
            other => unreachable!("expected literal payload, got {other:?}"),
        }
    }

    pub fn into_stmt(self) -> Stmt {
        match self {
            Match::Stmt(stmt) => stmt,
            other => unreachable!("expected statement payload, got {other:?}"),
        }
    }

    pub fn into_block(self) -> BlockStmt {
        match self {
            Match::Block(block) => block,
            other => unreachable!("expected block payload, got {other:?}"),
        }
    }

    pub fn into_case(self) -> CaseClause {
        match self {
            Match::Case(clause) => clause,
            other => unreachable!("expected case clause payload, got {other:?}"),
        }
    }

    pub fn into_field(self) -> Field {
        match self {
            Match::Field(field) => field,
            other => unreachable!("expected field payload, got {other:?}"),
        }
    }

    pub fn into_struct(self) -> StructType {
        match self {
            Match::Struct(ty) => ty,
            other => unreachable!("expected struct type payload, got {other:?}"),
        }
    }

    pub fn into_decl(self) -> Decl {
        match self {
            Match::Decl(decl) => decl,
            other => unreachable!("expected declaration payload, got {other:?}"),
        }
    }

    pub fn into_file(self) -> File {
        match self {
            Match::File(file) => file,
            other => unreachable!("expected file payload, got {other:?}"),
        }
    }
}

// ============================================================================
// PARSER TRAIT
// ============================================================================

pub trait Parser<'a> {
    fn parse(&self, src: Source<'a>) -> PResult<'a>;
}

impl<'a, F> Parser<'a> for F
where
    F: Fn(Source<'a>) -> PResult<'a>,
{
    fn parse(&self, src: Source<'a>) -> PResult<'a> {
        self(src)
    }
}

// ============================================================================
// PRIMITIVES
// ============================================================================

/// Matches the exact byte sequence `expected`.
pub fn literal<'a>(expected: &'static str) -> impl Parser<'a> {
    move |src: Source<'a>| {
        if src.rest().starts_with(expected) {
            Ok((src.advance(expected.len()), Match::Text(expected.to_string())))
        } else {
            let peek = match src.peek_rune() {
                Some((c, _)) => c.to_string(),
                None => String::new(),
            };
            Err(ParseError::new(
                src.offset(),
                format!("wanted a literal {expected:?}, got: {peek:?}"),
            ))
        }
    }
}

/// Matches exactly one rune.
pub fn rune<'a>(expected: char) -> impl Parser<'a> {
    move |src: Source<'a>| match src.peek_rune() {
        Some((c, size)) if c == expected => Ok((src.advance(size), Match::Rune(c))),
        Some((c, _)) => Err(ParseError::new(
            src.offset(),
            format!("wanted a literal {expected:?}, got {c:?}"),
        )),
        None => Err(ParseError::new(
            src.offset(),
            format!("wanted a literal {expected:?}, got \"\""),
        )),
    }
}

/// Matches any single rune; fails only at end of input.
pub fn any_rune(src: Source<'_>) -> PResult<'_> {
    match src.peek_rune() {
        Some((c, size)) => Ok((src.advance(size), Match::Rune(c))),
        None => Err(ParseError::new(src.offset(), "unexpected end of input")),
    }
}

// ============================================================================
// COMBINATORS
// ============================================================================

/// Keeps `p`'s match only if `accept` approves it; otherwise fails at the
/// original offset.
pub fn pred<'a>(p: impl Parser<'a>, accept: impl Fn(&Match) -> bool) -> impl Parser<'a> {
    move |src: Source<'a>| {
        let (next, matched) = p.parse(src)?;
        if accept(&matched) {
            Ok((next, matched))
        } else {
            Err(ParseError::new(src.offset(), "predicate failed"))
        }
    }
}

/// Replaces a successful match's payload with `f(payload)`.
pub fn map<'a>(p: impl Parser<'a>, f: impl Fn(Match) -> Match) -> impl Parser<'a> {
    move |src: Source<'a>| {
        let (next, matched) = p.parse(src)?;
        Ok((next, f(matched)))
    }
}

/// Runs `p1` then `p2`; both must succeed. The failure offset is the inner
/// one, but the caller's cursor is untouched.
pub fn pair<'a>(p1: impl Parser<'a>, p2: impl Parser<'a>) -> impl Parser<'a> {
    move |src: Source<'a>| {
        let (mid, left) = p1.parse(src)?;
        let (end, right) = p2.parse(mid)?;
        Ok((end, Match::Pair(Box::new(left), Box::new(right))))
    }
}

/// `pair` keeping only the left payload.
pub fn left<'a>(p1: impl Parser<'a>, p2: impl Parser<'a>) -> impl Parser<'a> {
    map(pair(p1, p2), |matched| matched.into_pair().0)
}

/// `pair` keeping only the right payload.
pub fn right<'a>(p1: impl Parser<'a>, p2: impl Parser<'a>) -> impl Parser<'a> {
    map(pair(p1, p2), |matched| matched.into_pair().1)
}

/// Collects matches of `p` until it fails or the input ends. Never fails.
pub fn zero_or_more<'a>(p: impl Parser<'a>) -> impl Parser<'a> {
    move |mut src: Source<'a>| {
        let mut matches = Vec::new();
        while let Ok((next, matched)) = p.parse(src) {
            src = next;
            matches.push(matched);
            if src.finished() {
                break;
            }
        }
        Ok((src, Match::Seq(matches)))
    }
}

/// Like [`zero_or_more`] but the first match is mandatory.
pub fn one_or_more<'a>(p: impl Parser<'a>) -> impl Parser<'a> {
    move |src: Source<'a>| {
        let (mut src, first) = p.parse(src)?;
        let mut matches = vec![first];
        while !src.finished() {
            match p.parse(src) {
                Ok((next, matched)) => {
                    src = next;
                    matches.push(matched);
                }
                Err(_) => break,
            }
        }
        Ok((src, Match::Seq(matches)))
    }
}

/// Turns failure into a successful [`Match::None`] at the original cursor.
pub fn optional<'a>(p: impl Parser<'a>) -> impl Parser<'a> {
    move |src: Source<'a>| match p.parse(src) {
        Ok(hit) => Ok(hit),
        Err(_) => Ok((src, Match::None)),
    }
}

/// A single Unicode whitespace rune.
pub fn whitespace_char<'a>() -> impl Parser<'a> {
    pred(any_rune, |matched| {
        matches!(matched, Match::Rune(c) if c.is_whitespace())
    })
}

pub fn whitespace0<'a>() -> impl Parser<'a> {
    zero_or_more(whitespace_char())
}

pub fn whitespace1<'a>() -> impl Parser<'a> {
    one_or_more(whitespace_char())
}

/// Trims optional whitespace on both sides of `p`.
pub fn whitespace_wrap<'a>(p: impl Parser<'a>) -> impl Parser<'a> {
    right(whitespace0(), left(p, whitespace0()))
}

/// `open`, then `p`, then `close`; yields `p`'s payload.
pub fn delimited<'a>(open: char, close: char, p: impl Parser<'a>) -> impl Parser<'a> {
    right(rune(open), left(p, rune(close)))
}

/// The S-expression scaffold every parenthesised form shares.
pub fn parenthesized<'a>(p: impl Parser<'a>) -> impl Parser<'a> {
    delimited('(', ')', whitespace_wrap(p))
}

// ============================================================================
// ORDERED CHOICE & SEQUENCE
// ============================================================================

/// Tries alternatives in order; first success wins. When every branch
/// fails, the error of the last one tried is returned.
pub fn choice<'a>(alts: impl Alternatives<'a>) -> impl Parser<'a> {
    move |src: Source<'a>| alts.choose(src)
}

pub trait Alternatives<'a> {
    fn choose(&self, src: Source<'a>) -> PResult<'a>;
}

impl<'a, P1, P2> Alternatives<'a> for (P1, P2)
where
    P1: Parser<'a>,
    P2: Parser<'a>,
{
    fn choose(&self, src: Source<'a>) -> PResult<'a> {
        self.0.parse(src).or_else(|_| self.1.parse(src))
    }
}

impl<'a, P1, P2, P3> Alternatives<'a> for (P1, P2, P3)
where
    P1: Parser<'a>,
    P2: Parser<'a>,
    P3: Parser<'a>,
{
    fn choose(&self, src: Source<'a>) -> PResult<'a> {
        self.0
            .parse(src)
            .or_else(|_| self.1.parse(src))
            .or_else(|_| self.2.parse(src))
    }
}

impl<'a, P1, P2, P3, P4> Alternatives<'a> for (P1, P2, P3, P4)
where
    P1: Parser<'a>,
    P2: Parser<'a>,
    P3: Parser<'a>,
    P4: Parser<'a>,
{
    fn choose(&self, src: Source<'a>) -> PResult<'a> {
        self.0
            .parse(src)
            .or_else(|_| self.1.parse(src))
            .or_else(|_| self.2.parse(src))
            .or_else(|_| self.3.parse(src))
    }
}

impl<'a, P1, P2, P3, P4, P5> Alternatives<'a> for (P1, P2, P3, P4, P5)
where
    P1: Parser<'a>,
    P2: Parser<'a>,
    P3: Parser<'a>,
    P4: Parser<'a>,
    P5: Parser<'a>,
{
    fn choose(&self, src: Source<'a>) -> PResult<'a> {
        self.0
            .parse(src)
            .or_else(|_| self.1.parse(src))
            .or_else(|_| self.2.parse(src))
            .or_else(|_| self.3.parse(src))
            .or_else(|_| self.4.parse(src))
    }
}

impl<'a, P1, P2, P3, P4, P5, P6> Alternatives<'a> for (P1, P2, P3, P4, P5, P6)
where
    P1: Parser<'a>,
    P2: Parser<'a>,
    P3: Parser<'a>,
    P4: Parser<'a>,
    P5: Parser<'a>,
    P6: Parser<'a>,
{
    fn choose(&self, src: Source<'a>) -> PResult<'a> {
        self.0
            .parse(src)
            .or_else(|_| self.1.parse(src))
            .or_else(|_| self.2.parse(src))
            .or_else(|_| self.3.parse(src))
            .or_else(|_| self.4.parse(src))
            .or_else(|_| self.5.parse(src))
    }
}

/// Runs every step in order and collects the payloads into a
/// [`Match::Seq`]; a generalized [`pair`].
pub fn sequence<'a>(steps: impl Chain<'a>) -> impl Parser<'a> {
    move |src: Source<'a>| steps.run(src)
}

pub trait Chain<'a> {
    fn run(&self, src: Source<'a>) -> PResult<'a>;
}

impl<'a, P1, P2> Chain<'a> for (P1, P2)
where
    P1: Parser<'a>,
    P2: Parser<'a>,
{
    fn run(&self, src: Source<'a>) -> PResult<'a> {
        let (src, m1) = self.0.parse(src)?;
        let (src, m2) = self.1.parse(src)?;
        Ok((src, Match::Seq(vec![m1, m2])))
    }
}

impl<'a, P1, P2, P3> Chain<'a> for (P1, P2, P3)
where
    P1: Parser<'a>,
    P2: Parser<'a>,
    P3: Parser<'a>,
{
    fn run(&self, src: Source<'a>) -> PResult<'a> {
        let (src, m1) = self.0.parse(src)?;
        let (src, m2) = self.1.parse(src)?;
        let (src, m3) = self.2.parse(src)?;
        Ok((src, Match::Seq(vec![m1, m2, m3])))
    }
}

impl<'a, P1, P2, P3, P4> Chain<'a> for (P1, P2, P3, P4)
where
    P1: Parser<'a>,
    P2: Parser<'a>,
    P3: Parser<'a>,
    P4: Parser<'a>,
{
    fn run(&self, src: Source<'a>) -> PResult<'a> {
        let (src, m1) = self.0.parse(src)?;
        let (src, m2) = self.1.parse(src)?;
        let (src, m3) = self.2.parse(src)?;
        let (src, m4) = self.3.parse(src)?;
        Ok((src, Match::Seq(vec![m1, m2, m3, m4])))
    }
}

impl<'a, P1, P2, P3, P4, P5> Chain<'a> for (P1, P2, P3, P4, P5)
where
    P1: Parser<'a>,
    P2: Parser<'a>,
    P3: Parser<'a>,
    P4: Parser<'a>,
    P5: Parser<'a>,
{
    fn run(&self, src: Source<'a>) -> PResult<'a> {
        let (src, m1) = self.0.parse(src)?;
        let (src, m2) = self.1.parse(src)?;
        let (src, m3) = self.2.parse(src)?;
        let (src, m4) = self.3.parse(src)?;
        let (src, m5) = self.4.parse(src)?;
        Ok((src, Match::Seq(vec![m1, m2, m3, m4, m5])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::atoms::identifier;

    fn text(s: &str) -> Match {
        Match::Text(s.to_string())
    }

    #[test]
    fn literal_matches_prefix() {
        let parse_joe = literal("Hello Joe!");

        let (next, matched) = parse_joe.parse(Source::new("Hello Joe!")).unwrap();
        assert!(next.finished());
        assert_eq!(matched, text("Hello Joe!"));

        let (next, matched) = parse_joe.parse(Source::new("Hello Joe! Hello Robert!")).unwrap();
        assert_eq!(next.rest(), " Hello Robert!");
        assert_eq!(matched, text("Hello Joe!"));
    }

    #[test]
    fn literal_reports_offset_and_message() {
        let parse_joe = literal("Hello Joe!");
        let err = parse_joe.parse(Source::new("Hello Mike!")).unwrap_err();
        assert_eq!(err.offset, 0);
        assert!(err.message.contains("wanted a literal \"Hello Joe!\""));
        assert_eq!(err.message, "wanted a literal \"Hello Joe!\", got: \"H\"");
    }

    #[test]
    fn literal_peeks_empty_at_end_of_input() {
        let err = literal("ha").parse(Source::new("")).unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.message, "wanted a literal \"ha\", got: \"\"");
    }

    #[test]
    fn rune_matches_one_scalar() {
        let (next, matched) = rune('λ').parse(Source::new("λx")).unwrap();
        assert_eq!(next.offset(), 2);
        assert_eq!(matched, Match::Rune('λ'));

        let err = rune('(').parse(Source::new("x")).unwrap_err();
        assert_eq!(err.message, "wanted a literal '(', got 'x'");

        let err = rune('(').parse(Source::new("")).unwrap_err();
        assert_eq!(err.message, "wanted a literal '(', got \"\"");
    }

    #[test]
    fn any_rune_fails_only_at_end() {
        let (next, matched) = any_rune(Source::new("ok")).unwrap();
        assert_eq!(next.offset(), 1);
        assert_eq!(matched, Match::Rune('o'));

        let err = any_rune(Source::new("")).unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.message, "unexpected end of input");
    }

    #[test]
    fn pair_requires_both_and_keeps_cursor_on_failure() {
        let tag_opener = pair(literal("<"), identifier);

        let (next, matched) = tag_opener.parse(Source::new("<element/>")).unwrap();
        assert_eq!(next.rest(), "/>");
        assert_eq!(
            matched,
            Match::Pair(Box::new(text("<")), Box::new(text("element")))
        );

        let err = tag_opener.parse(Source::new("oops")).unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.message, "wanted a literal \"<\", got: \"o\"");

        // The failure offset is the inner parser's, past the consumed '<'.
        let err = tag_opener.parse(Source::new("<!oops")).unwrap_err();
        assert_eq!(err.offset, 1);
        assert_eq!(err.message, "wanted identifier, got '!'");
    }

    #[test]
    fn left_and_right_project_the_pair() {
        let (next, matched) = right(literal("<"), identifier)
            .parse(Source::new("<element/>"))
            .unwrap();
        assert_eq!(next.rest(), "/>");
        assert_eq!(matched, text("element"));

        let (_, matched) = left(identifier, literal("/>"))
            .parse(Source::new("element/>"))
            .unwrap();
        assert_eq!(matched, text("element"));
    }

    #[test]
    fn one_or_more_requires_first_match() {
        let p = one_or_more(literal("ha"));

        let (next, matched) = p.parse(Source::new("hahaha")).unwrap();
        assert!(next.finished());
        assert_eq!(matched, Match::Seq(vec![text("ha"), text("ha"), text("ha")]));

        let (next, _) = p.parse(Source::new("hahaha ahah")).unwrap();
        assert_eq!(next.rest(), " ahah");

        let err = p.parse(Source::new("ahah")).unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.message, "wanted a literal \"ha\", got: \"a\"");

        let err = p.parse(Source::new("")).unwrap_err();
        assert_eq!(err.message, "wanted a literal \"ha\", got: \"\"");
    }

    #[test]
    fn zero_or_more_never_fails() {
        let p = zero_or_more(literal("ha"));

        let (next, matched) = p.parse(Source::new("hahaha")).unwrap();
        assert!(next.finished());
        assert_eq!(matched, Match::Seq(vec![text("ha"), text("ha"), text("ha")]));

        let (next, matched) = p.parse(Source::new("ahah")).unwrap();
        assert_eq!(next.offset(), 0);
        assert_eq!(matched, Match::Seq(vec![]));

        let (next, matched) = p.parse(Source::new("")).unwrap();
        assert_eq!(next.offset(), 0);
        assert_eq!(matched, Match::Seq(vec![]));
    }

    #[test]
    fn pred_fails_at_original_offset() {
        let p = pred(any_rune, |m| matches!(m, Match::Rune('o')));

        let (next, matched) = p.parse(Source::new("omg")).unwrap();
        assert_eq!(next.rest(), "mg");
        assert_eq!(matched, Match::Rune('o'));

        let err = p.parse(Source::new("lol")).unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.message, "predicate failed");
    }

    #[test]
    fn choice_is_ordered_and_returns_last_error() {
        let p = choice((literal("package"), literal("func")));

        let (next, matched) = p.parse(Source::new("package main")).unwrap();
        assert_eq!(next.rest(), " main");
        assert_eq!(matched, text("package"));

        let (next, matched) = p.parse(Source::new("func main")).unwrap();
        assert_eq!(next.rest(), " main");
        assert_eq!(matched, text("func"));

        let err = p.parse(Source::new("import \"fmt\"")).unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.message, "wanted a literal \"func\", got: \"i\"");
    }

    #[test]
    fn choice_prefers_the_first_success() {
        // "0" wins over the longer branch even though both would match.
        let p = choice((literal("0"), literal("01")));
        let (next, matched) = p.parse(Source::new("01")).unwrap();
        assert_eq!(next.rest(), "1");
        assert_eq!(matched, text("0"));
    }

    #[test]
    fn sequence_collects_ordered_payloads() {
        let p = sequence((literal("hello"), literal(" "), literal("world")));
        let (next, matched) = p.parse(Source::new("hello world!")).unwrap();
        assert_eq!(next.rest(), "!");
        assert_eq!(
            matched,
            Match::Seq(vec![text("hello"), text(" "), text("world")])
        );
    }

    #[test]
    fn optional_turns_failure_into_none() {
        let p = optional(literal("ha"));

        let (next, matched) = p.parse(Source::new("oh")).unwrap();
        assert_eq!(next.offset(), 0);
        assert_eq!(matched, Match::None);

        let (next, matched) = p.parse(Source::new("ha")).unwrap();
        assert_eq!(next.offset(), 2);
        assert_eq!(matched, text("ha"));
    }

    #[test]
    fn parenthesized_wraps_whitespace() {
        let p = parenthesized(one_or_more(whitespace_wrap(identifier)));
        let (next, matched) = p.parse(Source::new("(hello world)")).unwrap();
        assert!(next.finished());
        assert_eq!(matched, Match::Seq(vec![text("hello"), text("world")]));
    }

    #[test]
    fn map_replaces_the_payload() {
        let p = map(identifier, |m| Match::Text(m.into_text().to_uppercase()));
        let (_, matched) = p.parse(Source::new("shout")).unwrap();
        assert_eq!(matched, text("SHOUT"));
    }
}
