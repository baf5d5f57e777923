//! Jolang: an S-expression surface syntax for Go.
//!
//! Jo source goes in, a Go-shaped AST comes out of [`parse`], and
//! [`compile`] pretty-prints that tree as Go source text.

pub mod ast;
pub mod cli;
pub mod errors;
pub mod printer;
pub mod syntax;

pub use ast::File;
pub use errors::{print_error, JoError, SourceContext};
pub use syntax::{parse, ParseError};

/// Compiles Jo source code into Go source code.
pub fn compile(source: &str) -> Result<String, ParseError> {
    let file = parse(source)?;
    Ok(printer::fprint(&file))
}
