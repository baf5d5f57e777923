//! User-facing diagnostics.
//!
//! The parser itself trades in bare [`ParseError`]s (offset plus message);
//! they are created constantly while ordered choice backtracks, so they
//! stay cheap. Only the one failure that escapes the root rule is promoted
//! into a [`JoError`], which pairs the message with the named source text
//! so miette can render the offending span.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, Report, SourceSpan};

use crate::syntax::ParseError;

/// The source text an error is reported against.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

/// A parse failure bound to its source, ready for diagnostic rendering.
#[derive(Debug)]
pub struct JoError {
    pub message: String,
    source: Arc<NamedSource<String>>,
    span: SourceSpan,
}

impl JoError {
    pub fn from_parse(error: ParseError, context: &SourceContext) -> Self {
        // A one-byte span unless the failure sits at end of input.
        let len = usize::from(error.offset < context.content.len());
        JoError {
            message: error.message,
            source: context.to_named_source(),
            span: (error.offset, len).into(),
        }
    }
}

impl fmt::Display for JoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for JoError {}

impl Diagnostic for JoError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("jo::parse"))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some("parse failed here".into()), self.span);
        Some(Box::new(std::iter::once(label)))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source)
    }
}

/// Renders the error as a miette report on stderr.
pub fn print_error(error: JoError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotes_parse_errors_with_their_offset() {
        let context = SourceContext::from_file("bad.jo", "(package 1)");
        let err = crate::parse(&context.content).unwrap_err();
        let jo = JoError::from_parse(err, &context);
        assert!(jo.message.contains("wanted identifier"));
        assert!(jo.labels().unwrap().next().is_some());
    }
}
