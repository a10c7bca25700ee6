//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use sqlhint_core::{CompletionOptions, Position, DEFAULT_MAX_SUBQUERY_DEPTH};
use std::path::PathBuf;

/// sqlhint - context-aware SQL completion
#[derive(Parser, Debug)]
#[command(name = "sqlhint")]
#[command(about = "Suggest SQL completions at a cursor position", long_about = None)]
#[command(version)]
pub struct Args {
    /// SQL file to complete (reads from stdin if not provided)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Zero-based cursor line
    #[arg(short, long)]
    pub line: usize,

    /// Zero-based cursor column, in characters
    #[arg(long)]
    pub column: usize,

    /// Schema JSON file with tables, columns and functions
    #[arg(short, long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// SQL dialect
    #[arg(short, long, default_value = "generic", value_enum)]
    pub dialect: DialectArg,

    /// Maximum nesting of incomplete subqueries to follow
    #[arg(long, default_value_t = DEFAULT_MAX_SUBQUERY_DEPTH)]
    pub max_depth: usize,

    /// Output format
    #[arg(short, long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,

    /// Log resolver decisions to stderr (filter with RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn options(&self) -> CompletionOptions {
        CompletionOptions {
            dialect: self.dialect.into(),
            max_subquery_depth: self.max_depth,
        }
    }
}

/// SQL dialect options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
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

impl From<DialectArg> for sqlhint_core::Dialect {
    fn from(d: DialectArg) -> Self {
        match d {
            DialectArg::Generic => sqlhint_core::Dialect::Generic,
            DialectArg::Ansi => sqlhint_core::Dialect::Ansi,
            DialectArg::Bigquery => sqlhint_core::Dialect::Bigquery,
            DialectArg::Clickhouse => sqlhint_core::Dialect::Clickhouse,
            DialectArg::Databricks => sqlhint_core::Dialect::Databricks,
            DialectArg::Duckdb => sqlhint_core::Dialect::Duckdb,
            DialectArg::Hive => sqlhint_core::Dialect::Hive,
            DialectArg::Mssql => sqlhint_core::Dialect::Mssql,
            DialectArg::Mysql => sqlhint_core::Dialect::Mysql,
            DialectArg::Postgres => sqlhint_core::Dialect::Postgres,
            DialectArg::Redshift => sqlhint_core::Dialect::Redshift,
            DialectArg::Snowflake => sqlhint_core::Dialect::Snowflake,
            DialectArg::Sqlite => sqlhint_core::Dialect::Sqlite,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table of candidates
    Table,
    /// JSON completion result
    Json,
}
