//! Context-aware SQL autocompletion.
//!
//! Given partially typed SQL, a cursor position and a [`Schema`], the resolver
//! returns the keywords, tables, columns, aliases and functions that fit at the
//! cursor, plus a description of the syntax error it recovered from, if any.
//!
//! ```
//! use sqlhint_core::{complete, Column, Position, Schema, Table};
//!
//! let schema = Schema::new(
//!     vec![Table::new("users", vec![Column::new("id", ""), Column::new("name", "")])],
//!     Vec::new(),
//! );
//! let result = complete("SELECT u. FROM users u", Position::new(0, 9), &schema).unwrap();
//! assert_eq!(result.labels(), vec!["id", "name"]);
//! ```

pub mod completion;
pub mod error;
pub mod parser;
pub mod types;

pub use completion::{complete, completion_items, Completer, MAX_SQL_LENGTH};
pub use error::CompletionError;
pub use parser::{ParseFailure, SqlParser, SqlparserBackend, SyntaxError};

pub use types::{
    Column, CompletionItem, CompletionItemKind, CompletionOptions, CompletionRequest,
    CompletionResult, DbFunction, Dialect, ErrorDescriptor, Position, Schema, SourceLocation,
    SourceRange, Table, DEFAULT_MAX_SUBQUERY_DEPTH,
};
