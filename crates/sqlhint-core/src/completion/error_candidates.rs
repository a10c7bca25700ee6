//! Candidates recovered from a syntax error.
//!
//! The parser's expected-token list supplies keywords; the partially typed
//! token is then resolved against the from clause the way a parsed column
//! reference would be.

#[cfg(feature = "tracing")]
use tracing::debug;

use super::cursor::last_token;
use super::scope::{aliases_by_prefix, functions_by_prefix, scope_tables, scoped_columns};
use crate::parser::{FromEntry, SqlParser, Statement, SyntaxError, EXPECTED_COLUMN_NAME};
use crate::types::{CompletionItem, Position, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorStrategy {
    /// Every column of every table, unscoped.
    AllColumns,
}

/// Parser messages that select a fixed candidate set.
const ERROR_STRATEGIES: &[(&str, ErrorStrategy)] =
    &[(EXPECTED_COLUMN_NAME, ErrorStrategy::AllColumns)];

/// Expected literals that are never worth offering.
const IGNORED_LITERALS: &[&str] = &["+", "-", "*", "$", ":", "COUNT", "AVG", "SUM"];

const QUOTES: &[&str] = &["'", "\"", "`"];

pub(crate) fn candidates<P: SqlParser + ?Sized>(
    parser: &P,
    error: &SyntaxError,
    target: &str,
    pos: Position,
    entries: &[FromEntry],
    schema: &Schema,
) -> Vec<CompletionItem> {
    if let Some((_, strategy)) = ERROR_STRATEGIES
        .iter()
        .find(|(message, _)| *message == error.message)
    {
        return match strategy {
            ErrorStrategy::AllColumns => schema
                .tables
                .iter()
                .flat_map(|table| table.columns.iter().map(CompletionItem::column))
                .collect(),
        };
    }

    let literals: Vec<&str> = error.expected_literals().collect();
    if literals.iter().any(|literal| QUOTES.contains(literal)) {
        return Vec::new();
    }
    if cursor_after_dot_in_from(parser, target, pos) {
        #[cfg(feature = "tracing")]
        debug!("Cursor follows a dot inside the from clause");
        return Vec::new();
    }

    let mut items = keyword_candidates(&literals);
    if literals.contains(&".") {
        items.extend(schema.tables.iter().map(CompletionItem::table));
    }

    let partial = last_token(target);
    let tables = scope_tables(&schema.tables, entries);
    items.extend(scoped_columns(entries, &tables, partial));
    items.extend(functions_by_prefix(&schema.functions, partial));
    items.extend(aliases_by_prefix(entries, partial));
    items
}

fn keyword_candidates(literals: &[&str]) -> Vec<CompletionItem> {
    let mut keywords: Vec<&str> = Vec::new();
    for literal in literals {
        if IGNORED_LITERALS.contains(literal) {
            continue;
        }
        let keyword = match *literal {
            "ORDER" => "ORDER BY",
            "GROUP" => "GROUP BY",
            other => other,
        };
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }

    let mut items = Vec::with_capacity(keywords.len() * 2);
    for keyword in keywords {
        items.push(CompletionItem::keyword(keyword));
        let lower = keyword.to_lowercase();
        if lower != keyword {
            items.push(CompletionItem::keyword(lower));
        }
    }
    items
}

/// `FROM schema.` names a qualified table, not a column scope.
fn cursor_after_dot_in_from<P: SqlParser + ?Sized>(
    parser: &P,
    target: &str,
    pos: Position,
) -> bool {
    let Some(without_dot) = target.strip_suffix('.') else {
        return false;
    };
    if pos.column == 0 {
        return false;
    }
    let moved = Position::new(pos.line, pos.column - 1);
    match parser.parse(without_dot) {
        Ok(Statement::Select(select)) => select.from.iter().any(|entry| {
            matches!(entry, FromEntry::Table { .. }) && entry.location().contains(moved)
        }),
        _ => false,
    }
}
