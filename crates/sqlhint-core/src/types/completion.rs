use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Column, DbFunction, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum CompletionItemKind {
    Keyword,
    Table,
    Column,
    Alias,
    Function,
}

impl CompletionItemKind {
    /// Numeric `CompletionItemKind` of the Language Server Protocol.
    pub fn lsp_kind(self) -> u8 {
        match self {
            Self::Keyword => 1,
            Self::Table => 5,
            Self::Alias => 6,
            Self::Column => 8,
            Self::Function => 10,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Table => "table",
            Self::Column => "column",
            Self::Alias => "alias",
            Self::Function => "function",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Text the editor inserts instead of the label, usually the untyped remainder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
    /// Fully qualified `<scope>.<column>` used for prefix matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoped_column_name: Option<String>,
}

impl CompletionItem {
    pub fn keyword(label: impl Into<String>) -> Self {
        Self::plain(label.into(), CompletionItemKind::Keyword, None)
    }

    pub fn table(table: &Table) -> Self {
        Self::plain(
            table.table_name.clone(),
            CompletionItemKind::Table,
            Some("table".to_string()),
        )
    }

    pub fn alias(alias: impl Into<String>) -> Self {
        Self::plain(
            alias.into(),
            CompletionItemKind::Alias,
            Some("alias".to_string()),
        )
    }

    pub fn function(function: &DbFunction) -> Self {
        Self {
            documentation: Some(function.description.clone()),
            ..Self::plain(
                function.name.clone(),
                CompletionItemKind::Function,
                Some("function".to_string()),
            )
        }
    }

    /// A column without a scope, as offered in column-list positions.
    pub fn column(column: &Column) -> Self {
        Self::plain(
            column.column_name.clone(),
            CompletionItemKind::Column,
            Some(format!("column {}", column.description)),
        )
    }

    /// A column reached through `scope`, which is a table name or an alias.
    pub fn scoped_column(scope: &str, column: &Column) -> Self {
        Self {
            scoped_column_name: Some(format!("{scope}.{}", column.column_name)),
            ..Self::column(column)
        }
    }

    /// The text prefix matching is performed against.
    pub fn match_text(&self) -> &str {
        self.scoped_column_name.as_deref().unwrap_or(&self.label)
    }

    fn plain(label: String, kind: CompletionItemKind, detail: Option<String>) -> Self {
        Self {
            label,
            kind,
            detail,
            documentation: None,
            insert_text: None,
            scoped_column_name: None,
        }
    }
}

/// Describes the syntax error that made the resolver fall back to error recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
    pub label: String,
    pub detail: String,
    /// 1-based line of the error location.
    pub line: usize,
    /// Byte offset of the error location.
    pub offset: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResult {
    pub candidates: Vec<CompletionItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDescriptor>,
}

impl CompletionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.label.as_str()).collect()
    }
}
