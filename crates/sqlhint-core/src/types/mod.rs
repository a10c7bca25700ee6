//! Types for the SQL completion API.
//!
//! This module defines the schema, position, request and result types exchanged
//! with callers. All of them serialize to camelCase JSON.

mod completion;
mod position;
mod request;
mod schema;

pub use completion::{CompletionItem, CompletionItemKind, CompletionResult, ErrorDescriptor};
pub use position::{Position, SourceLocation, SourceRange};
pub use request::{CompletionOptions, CompletionRequest, Dialect, DEFAULT_MAX_SUBQUERY_DEPTH};
pub use schema::{Column, DbFunction, Schema, Table};
