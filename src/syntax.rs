//! The parsing pipeline: cursor, combinator kernel, lexical atoms, grammar.

pub mod atoms;
pub mod combinators;
pub mod grammar;
pub mod source;

pub use combinators::{Match, PResult, ParseError, Parser};
pub use source::Source;

use crate::ast::File;

/// Parses a complete Jo source file into a Go-shaped [`File`].
///
/// The whole parse is synchronous and side-effect free; on failure the
/// returned error carries the byte offset of the deepest mismatch of the
/// last alternative tried, and no partial tree.
pub fn parse(source: &str) -> Result<File, ParseError> {
    let (_, matched) = grammar::source_file(Source::new(source))?;
    Ok(matched.into_file())
}
