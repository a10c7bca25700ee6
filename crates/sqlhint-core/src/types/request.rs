//! Request and configuration types for the completion API.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Position, Schema};

/// Default bound on how many incomplete subqueries the resolver descends into.
pub const DEFAULT_MAX_SUBQUERY_DEPTH: usize = 32;

/// A request to compute completion candidates at a cursor position.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    /// The full document text, including anything after the cursor
    pub sql: String,

    /// Cursor position (0-based line and character column)
    pub position: Position,

    /// Tables and functions available for completion
    #[serde(default)]
    pub schema: Schema,

    /// Optional resolver options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<CompletionOptions>,
}

/// Options controlling the completion behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOptions {
    /// SQL dialect used to tokenize and parse the document
    #[serde(default)]
    pub dialect: Dialect,

    /// Maximum nesting of incomplete subqueries followed by the resolver
    #[serde(default = "default_max_subquery_depth")]
    pub max_subquery_depth: usize,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            max_subquery_depth: DEFAULT_MAX_SUBQUERY_DEPTH,
        }
    }
}

fn default_max_subquery_depth() -> usize {
    DEFAULT_MAX_SUBQUERY_DEPTH
}

/// SQL dialect for tokenizing and parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Generic,
    Ansi,
    Bigquery,
    Clickhouse,
    Databricks,
    Duckdb,
    Hive,
    Mssql,
    Mysql,
    Postgres,
    Redshift,
    Snowflake,
    Sqlite,
}

impl Dialect {
    pub fn to_sqlparser_dialect(&self) -> Box<dyn sqlparser::dialect::Dialect> {
        use sqlparser::dialect::{
            AnsiDialect, BigQueryDialect, ClickHouseDialect, DatabricksDialect, DuckDbDialect,
            GenericDialect, HiveDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
            RedshiftSqlDialect, SQLiteDialect, SnowflakeDialect,
        };
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::Ansi => Box::new(AnsiDialect {}),
            Self::Bigquery => Box::new(BigQueryDialect {}),
            Self::Clickhouse => Box::new(ClickHouseDialect {}),
            Self::Databricks => Box::new(DatabricksDialect {}),
            Self::Duckdb => Box::new(DuckDbDialect {}),
            Self::Hive => Box::new(HiveDialect {}),
            Self::Mssql => Box::new(MsSqlDialect {}),
            Self::Mysql => Box::new(MySqlDialect {}),
            Self::Postgres => Box::new(PostgreSqlDialect {}),
            Self::Redshift => Box::new(RedshiftSqlDialect {}),
            Self::Snowflake => Box::new(SnowflakeDialect {}),
            Self::Sqlite => Box::new(SQLiteDialect {}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_deserialization() {
        let json = r#"{
            "sql": "SELECT t. FROM users t",
            "position": { "line": 0, "column": 9 },
            "schema": {
                "tables": [{ "tableName": "users", "columns": [{ "columnName": "id" }] }]
            },
            "options": { "dialect": "postgres" }
        }"#;

        let request: CompletionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.position, Position::new(0, 9));
        assert_eq!(request.schema.tables[0].table_name, "users");
        let options = request.options.unwrap();
        assert_eq!(options.dialect, Dialect::Postgres);
        assert_eq!(options.max_subquery_depth, DEFAULT_MAX_SUBQUERY_DEPTH);
    }

    #[test]
    fn test_completion_request_minimal() {
        let json = r#"{ "sql": "S", "position": { "line": 0, "column": 1 } }"#;
        let request: CompletionRequest = serde_json::from_str(json).unwrap();
        assert!(request.schema.tables.is_empty());
        assert!(request.options.is_none());
    }

    #[test]
    fn test_dialect_serialization() {
        let json = serde_json::to_string(&Dialect::Duckdb).unwrap();
        assert_eq!(json, "\"duckdb\"");
    }
}
