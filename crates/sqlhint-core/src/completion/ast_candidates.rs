//! Candidates for text that parsed into a complete statement.

#[cfg(feature = "tracing")]
use tracing::trace;

use super::scope::{
    aliases_by_prefix, functions_by_prefix, scope_tables, scoped_columns, tables_by_prefix,
};
use crate::parser::{ColumnRef, FromEntry, MutationStatement, SelectStatement, Statement};
use crate::types::{CompletionItem, Position, Schema};

/// Clause keywords offered anywhere inside a select.
const SELECT_KEYWORDS: &[&str] = &[
    "SELECT", "WHERE", "ORDER BY", "GROUP BY", "LIMIT", "--", "/*", "(",
];

/// Keywords that may follow the last select item.
const TRAILING_KEYWORDS: &[&str] = &["FROM", "AS"];

/// Candidates for `statement`, with `entries` being the from clause of the full document.
pub(crate) fn candidates(
    statement: &Statement,
    pos: Position,
    entries: &[FromEntry],
    schema: &Schema,
) -> Vec<CompletionItem> {
    match statement {
        Statement::Select(select) => select_candidates(select, pos, entries, schema),
        Statement::Delete(mutation) | Statement::Update(mutation) => {
            mutation_candidates(mutation, pos, schema)
        }
        Statement::Other => Vec::new(),
    }
}

fn mutation_candidates(
    mutation: &MutationStatement,
    pos: Position,
    schema: &Schema,
) -> Vec<CompletionItem> {
    if mutation.target.contains(pos) {
        return schema.tables.iter().map(CompletionItem::table).collect();
    }
    match &mutation.where_clause {
        Some(expr) if expr.location().contains(pos) => schema
            .tables
            .iter()
            .flat_map(|table| table.columns.iter().map(CompletionItem::column))
            .collect(),
        _ => Vec::new(),
    }
}

fn select_candidates(
    select: &SelectStatement,
    pos: Position,
    entries: &[FromEntry],
    schema: &Schema,
) -> Vec<CompletionItem> {
    let mut items: Vec<CompletionItem> = SELECT_KEYWORDS
        .iter()
        .copied()
        .map(CompletionItem::keyword)
        .collect();
    if !select.distinct {
        items.push(CompletionItem::keyword("DISTINCT"));
    }

    let last_item = select.columns.iter().max_by_key(|c| c.location.end.offset);
    if let Some(name) = last_item.and_then(|item| item.output_name()) {
        if name.location.contains(pos) {
            items.extend(
                TRAILING_KEYWORDS
                    .iter()
                    .filter(|keyword| keyword.starts_with(name.value.as_str()))
                    .map(|keyword| CompletionItem::keyword(*keyword)),
            );
        }
    }

    if let Some(column) = column_ref_at(select, pos) {
        #[cfg(feature = "tracing")]
        trace!(column = %column.qualified_name(), "Column reference under cursor");
        match &column.table {
            Some(_) => {
                let partial = column.qualified_name();
                let tables = scope_tables(&schema.tables, entries);
                items.extend(scoped_columns(entries, &tables, &partial));
            }
            None => {
                items.extend(aliases_by_prefix(entries, &column.column));
                items.extend(tables_by_prefix(&schema.tables, &column.column));
                items.extend(functions_by_prefix(&schema.functions, &column.column));
            }
        }
        return items;
    }

    let on_table = select.from.iter().find_map(|entry| match entry {
        FromEntry::Table { join, has_on, .. } if entry.location().contains(pos) => {
            Some(join.is_some() && !has_on)
        }
        _ => None,
    });
    if let Some(needs_on) = on_table {
        items.extend(schema.tables.iter().map(CompletionItem::table));
        items.push(CompletionItem::keyword("INNER JOIN"));
        items.push(CompletionItem::keyword("LEFT JOIN"));
        if needs_on {
            items.push(CompletionItem::keyword("ON"));
        }
    }
    items
}

fn column_ref_at(select: &SelectStatement, pos: Position) -> Option<&ColumnRef> {
    select
        .columns
        .iter()
        .filter_map(|item| item.expr.as_ref())
        .chain(select.where_clause.as_ref())
        .flat_map(|expr| expr.column_refs())
        .find(|column| column.location.contains(pos))
}
