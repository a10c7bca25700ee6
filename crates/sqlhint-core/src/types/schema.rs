//! Schema metadata supplied by the caller on every completion request.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tables and callable functions visible to the editor.
///
/// A schema is immutable input: the completer never mutates or caches it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub functions: Vec<DbFunction>,
}

impl Schema {
    pub fn new(tables: Vec<Table>, functions: Vec<DbFunction>) -> Self {
        Self { tables, functions }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    pub table_name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(table_name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            database: None,
            table_name: table_name.into(),
            columns,
        }
    }
}

/// A column of a table.
///
/// `column_name` may contain dots (`"abc.def.ghi"`) for nested fields. Such names
/// are matched as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub column_name: String,
    #[serde(default)]
    pub description: String,
}

impl Column {
    pub fn new(column_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DbFunction {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl DbFunction {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}
