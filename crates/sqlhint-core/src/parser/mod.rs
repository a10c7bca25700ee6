//! Parser seam of the completion resolver.
//!
//! The resolver never looks at SQL grammar directly. It consumes a [`SqlParser`],
//! which either yields a [`Statement`] or a [`ParseFailure`] describing what the
//! parser expected at the point it gave up. [`SqlparserBackend`] is the
//! implementation on top of the `sqlparser` crate.

pub mod ast;
mod from_clause;
mod span;
mod sqlparser_backend;
mod syntax_error;
mod visit;

pub use ast::{
    ColumnRef, Expression, FromEntry, MutationStatement, Name, SelectColumn, SelectStatement,
    Statement,
};
pub use span::line_col_to_offset;
pub use sqlparser_backend::SqlparserBackend;
pub use syntax_error::EXPECTED_COLUMN_NAME;

use crate::types::SourceLocation;

/// A parser the completion resolver can drive.
pub trait SqlParser {
    /// Parses a complete statement. Multi-statement input yields the last statement.
    fn parse(&self, text: &str) -> Result<Statement, ParseFailure>;

    /// Best-effort parse of only the `FROM` clause of `text`.
    fn parse_from_clause(&self, text: &str) -> Result<Vec<FromEntry>, ParseFailure>;
}

impl<P: SqlParser + ?Sized> SqlParser for &P {
    fn parse(&self, text: &str) -> Result<Statement, ParseFailure> {
        (**self).parse(text)
    }

    fn parse_from_clause(&self, text: &str) -> Result<Vec<FromEntry>, ParseFailure> {
        (**self).parse_from_clause(text)
    }
}

/// Why a parse did not produce a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The text is not (yet) valid SQL. Drives fallback completion.
    Syntax(SyntaxError),
    /// Anything else. Never converted into candidates.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub expected: Vec<ExpectedToken>,
    pub location: SourceLocation,
}

impl SyntaxError {
    /// Texts of the expected literal tokens, in the order the parser reported them.
    pub fn expected_literals(&self) -> impl Iterator<Item = &str> {
        self.expected
            .iter()
            .filter(|token| token.kind == ExpectedKind::Literal)
            .map(|token| token.text.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedKind {
    /// A concrete token such as a keyword or punctuation.
    Literal,
    /// A grammar category such as "an expression".
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedToken {
    pub kind: ExpectedKind,
    pub text: String,
}

impl ExpectedToken {
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            kind: ExpectedKind::Literal,
            text: text.into(),
        }
    }

    pub fn other(text: impl Into<String>) -> Self {
        Self {
            kind: ExpectedKind::Other,
            text: text.into(),
        }
    }
}
