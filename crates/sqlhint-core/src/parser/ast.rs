//! Statement model consumed by the completion resolver.
//!
//! Parsers translate their own syntax trees into this model. Only the parts the
//! resolver reasons about are kept: select lists, from-clause entries, filter
//! expressions and mutation targets, each with its source range.

use crate::types::SourceRange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Select(SelectStatement),
    Delete(MutationStatement),
    Update(MutationStatement),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub distinct: bool,
    pub columns: Vec<SelectColumn>,
    pub from: Vec<FromEntry>,
    pub where_clause: Option<Expression>,
}

/// One item of a select list. `expr` is `None` for wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectColumn {
    pub expr: Option<Expression>,
    pub alias: Option<Name>,
    pub location: SourceRange,
}

impl SelectColumn {
    /// The name this item exposes: its alias, else the column of a bare reference.
    pub fn output_name(&self) -> Option<Name> {
        if let Some(alias) = &self.alias {
            return Some(alias.clone());
        }
        match &self.expr {
            Some(Expression::ColumnRef(column)) => Some(Name {
                value: column.column.clone(),
                location: column.location,
            }),
            _ => None,
        }
    }
}

/// Target and filter of a `DELETE` or `UPDATE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationStatement {
    pub target: SourceRange,
    pub where_clause: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub value: String,
    pub location: SourceRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FromEntry {
    Table {
        database: Option<String>,
        table: String,
        alias: Option<String>,
        /// Join keyword sequence (`"INNER JOIN"`, `"JOIN"`, ...) for joined entries.
        join: Option<String>,
        has_on: bool,
        location: SourceRange,
    },
    Subquery {
        statement: Box<Statement>,
        alias: String,
        location: SourceRange,
    },
    /// A parenthesised subquery that failed to parse. `location.start` is the first
    /// character of `text`.
    IncompleteSubquery { text: String, location: SourceRange },
}

impl FromEntry {
    pub fn location(&self) -> SourceRange {
        match self {
            Self::Table { location, .. }
            | Self::Subquery { location, .. }
            | Self::IncompleteSubquery { location, .. } => *location,
        }
    }
}

/// A possibly qualified column reference. For `a.b.c`, `table` is `"a.b"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub column: String,
    pub location: SourceRange,
}

impl ColumnRef {
    /// `<table>.<column>` for qualified references, `column` otherwise.
    pub fn qualified_name(&self) -> String {
        match &self.table {
            Some(table) => format!("{table}.{}", self.column),
            None => self.column.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    ColumnRef(ColumnRef),
    /// Any other expression, with every column reference found inside it.
    Other {
        location: SourceRange,
        column_refs: Vec<ColumnRef>,
    },
}

impl Expression {
    pub fn location(&self) -> SourceRange {
        match self {
            Self::ColumnRef(column) => column.location,
            Self::Other { location, .. } => *location,
        }
    }

    pub fn column_refs(&self) -> &[ColumnRef] {
        match self {
            Self::ColumnRef(column) => std::slice::from_ref(column),
            Self::Other { column_refs, .. } => column_refs,
        }
    }
}
