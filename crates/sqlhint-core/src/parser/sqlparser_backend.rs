//! [`SqlParser`] implementation on top of the `sqlparser` crate.

use sqlparser::ast::{
    self as sql, Expr, FromTable, Query, SelectItem, SetExpr, Spanned, TableFactor, TableWithJoins,
};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
#[cfg(feature = "tracing")]
use tracing::debug;

use super::ast::{
    ColumnRef, Expression, FromEntry, MutationStatement, Name, SelectColumn, SelectStatement,
    Statement,
};
use super::span::source_range;
use super::visit::visit_expr;
use super::{from_clause, syntax_error, ParseFailure, SqlParser};
use crate::types::{Dialect, SourceRange};

/// Parses with `sqlparser` in the configured [`Dialect`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SqlparserBackend {
    dialect: Dialect,
}

impl SqlparserBackend {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn parse_statements(&self, text: &str) -> Result<Vec<sql::Statement>, ParseFailure> {
        let dialect = self.dialect.to_sqlparser_dialect();
        match Parser::parse_sql(dialect.as_ref(), text) {
            Ok(statements) => Ok(statements),
            Err(primary_err) => {
                // Generic dialect frequently fails on Postgres-specific operators
                // (`::`, `->>`) that users type anyway.
                if matches!(self.dialect, Dialect::Generic) && looks_like_postgres_syntax(text) {
                    if let Ok(statements) = Parser::parse_sql(&PostgreSqlDialect {}, text) {
                        return Ok(statements);
                    }
                }
                #[cfg(feature = "tracing")]
                debug!(error = %primary_err, dialect = ?self.dialect, "Parse failed");
                Err(syntax_error::translate(text, primary_err, self.dialect))
            }
        }
    }
}

impl SqlParser for SqlparserBackend {
    fn parse(&self, text: &str) -> Result<Statement, ParseFailure> {
        let statements = self.parse_statements(text)?;
        match statements.last() {
            Some(statement) => Ok(convert_statement(text, statement)),
            None => Err(ParseFailure::Syntax(syntax_error::missing_statement(text))),
        }
    }

    fn parse_from_clause(&self, text: &str) -> Result<Vec<FromEntry>, ParseFailure> {
        from_clause::scan(text, self.dialect, self)
    }
}

fn looks_like_postgres_syntax(sql: &str) -> bool {
    sql.contains("::") || sql.contains("->") || sql.contains("?|") || sql.contains("?&")
}

fn convert_statement(sql: &str, statement: &sql::Statement) -> Statement {
    match statement {
        sql::Statement::Query(query) => convert_query(sql, query),
        sql::Statement::Delete(delete) => {
            let tables = match &delete.from {
                FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables) => tables,
            };
            Statement::Delete(MutationStatement {
                target: tables
                    .iter()
                    .map(|t| table_factor_range(sql, &t.relation))
                    .reduce(|a, b| a.union(&b))
                    .unwrap_or_default(),
                where_clause: delete.selection.as_ref().map(|e| convert_expr(sql, e)),
            })
        }
        sql::Statement::Update {
            table, selection, ..
        } => Statement::Update(MutationStatement {
            target: table_factor_range(sql, &table.relation),
            where_clause: selection.as_ref().map(|e| convert_expr(sql, e)),
        }),
        _ => Statement::Other,
    }
}

fn convert_query(sql: &str, query: &Query) -> Statement {
    convert_set_expr(sql, &query.body)
}

/// Set operations expose the leftmost select.
fn convert_set_expr(sql: &str, body: &SetExpr) -> Statement {
    match body {
        SetExpr::Select(select) => Statement::Select(SelectStatement {
            distinct: select.distinct.is_some(),
            columns: select
                .projection
                .iter()
                .map(|item| convert_select_item(sql, item))
                .collect(),
            from: select
                .from
                .iter()
                .flat_map(|table| table_with_joins_entries(sql, table))
                .collect(),
            where_clause: select.selection.as_ref().map(|e| convert_expr(sql, e)),
        }),
        SetExpr::Query(query) => convert_query(sql, query),
        SetExpr::SetOperation { left, .. } => convert_set_expr(sql, left),
        _ => Statement::Other,
    }
}

fn convert_select_item(sql: &str, item: &SelectItem) -> SelectColumn {
    match item {
        SelectItem::UnnamedExpr(expr) => SelectColumn {
            expr: Some(convert_expr(sql, expr)),
            alias: None,
            location: source_range(sql, expr.span()),
        },
        SelectItem::ExprWithAlias { expr, alias } => SelectColumn {
            expr: Some(convert_expr(sql, expr)),
            alias: Some(Name {
                value: alias.value.clone(),
                location: source_range(sql, alias.span),
            }),
            location: source_range(sql, expr.span().union(&alias.span)),
        },
        SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(..) => SelectColumn {
            expr: None,
            alias: None,
            location: SourceRange::default(),
        },
    }
}

fn convert_expr(sql: &str, expr: &Expr) -> Expression {
    if let Some(column) = column_ref(sql, expr) {
        return Expression::ColumnRef(column);
    }
    let mut column_refs = Vec::new();
    visit_expr(expr, &mut |e| {
        if let Some(column) = column_ref(sql, e) {
            column_refs.push(column);
        }
    });
    Expression::Other {
        location: source_range(sql, expr.span()),
        column_refs,
    }
}

fn column_ref(sql: &str, expr: &Expr) -> Option<ColumnRef> {
    match expr {
        Expr::Identifier(ident) => Some(ColumnRef {
            table: None,
            column: ident.value.clone(),
            location: source_range(sql, ident.span),
        }),
        Expr::CompoundIdentifier(idents) => {
            let (column, scope) = idents.split_last()?;
            let table = scope
                .iter()
                .map(|ident| ident.value.as_str())
                .collect::<Vec<_>>()
                .join(".");
            Some(ColumnRef {
                table: (!table.is_empty()).then_some(table),
                column: column.value.clone(),
                location: source_range(sql, expr.span()),
            })
        }
        _ => None,
    }
}

fn table_with_joins_entries(sql: &str, table: &TableWithJoins) -> Vec<FromEntry> {
    let mut entries = Vec::with_capacity(table.joins.len() + 1);
    entries.extend(table_factor_entry(sql, &table.relation, None, false));
    for join in &table.joins {
        let (label, has_on) = join_operator_label(&join.join_operator);
        entries.extend(table_factor_entry(
            sql,
            &join.relation,
            Some(label.to_string()),
            has_on,
        ));
    }
    entries
}

fn join_operator_label(op: &sql::JoinOperator) -> (&'static str, bool) {
    use sql::JoinOperator as J;
    let (label, constraint) = match op {
        J::Join(c) => ("JOIN", c),
        J::Inner(c) => ("INNER JOIN", c),
        J::Left(c) => ("LEFT JOIN", c),
        J::LeftOuter(c) => ("LEFT OUTER JOIN", c),
        J::Right(c) => ("RIGHT JOIN", c),
        J::RightOuter(c) => ("RIGHT OUTER JOIN", c),
        J::FullOuter(c) => ("FULL OUTER JOIN", c),
        J::CrossJoin(c) => ("CROSS JOIN", c),
        J::Semi(c) | J::LeftSemi(c) | J::RightSemi(c) => ("SEMI JOIN", c),
        J::Anti(c) | J::LeftAnti(c) | J::RightAnti(c) => ("ANTI JOIN", c),
        J::StraightJoin(c) => ("STRAIGHT_JOIN", c),
        J::AsOf { constraint, .. } => ("ASOF JOIN", constraint),
        J::CrossApply => return ("CROSS APPLY", true),
        J::OuterApply => return ("OUTER APPLY", true),
    };
    (label, !matches!(constraint, sql::JoinConstraint::None))
}

fn table_factor_entry(
    sql: &str,
    factor: &TableFactor,
    join: Option<String>,
    has_on: bool,
) -> Option<FromEntry> {
    match factor {
        TableFactor::Table { name, alias, .. } => {
            let mut parts: Vec<String> = name
                .0
                .iter()
                .filter_map(|part| part.as_ident().map(|ident| ident.value.clone()))
                .collect();
            let table = parts.pop()?;
            Some(FromEntry::Table {
                database: (!parts.is_empty()).then(|| parts.join(".")),
                table,
                alias: alias.as_ref().map(|a| a.name.value.clone()),
                join,
                has_on,
                location: table_factor_range(sql, factor),
            })
        }
        TableFactor::Derived {
            subquery, alias, ..
        } => Some(FromEntry::Subquery {
            statement: Box::new(convert_query(sql, subquery)),
            alias: alias
                .as_ref()
                .map(|a| a.name.value.clone())
                .unwrap_or_default(),
            location: table_factor_range(sql, factor),
        }),
        _ => None,
    }
}

fn table_factor_range(sql: &str, factor: &TableFactor) -> SourceRange {
    let span = match factor {
        TableFactor::Table { name, alias, .. } => match alias {
            Some(alias) => name.span().union(&alias.name.span),
            None => name.span(),
        },
        TableFactor::Derived {
            subquery, alias, ..
        } => match alias {
            Some(alias) => subquery.body.span().union(&alias.name.span),
            None => subquery.body.span(),
        },
        _ => return SourceRange::default(),
    };
    source_range(sql, span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ExpectedKind, SyntaxError};

    fn parse(sql: &str) -> Statement {
        SqlparserBackend::default().parse(sql).unwrap()
    }

    fn parse_err(sql: &str) -> SyntaxError {
        match SqlparserBackend::default().parse(sql) {
            Err(ParseFailure::Syntax(error)) => error,
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    fn select(sql: &str) -> SelectStatement {
        match parse(sql) {
            Statement::Select(select) => select,
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn test_select_column_ref_location() {
        let select = select("SELECT T");
        let Some(Expression::ColumnRef(column)) = &select.columns[0].expr else {
            panic!("expected column ref");
        };
        assert_eq!(column.column, "T");
        assert_eq!(column.table, None);
        assert_eq!(
            (column.location.start.column, column.location.end.column),
            (8, 9)
        );
        assert!(!select.distinct);
    }

    #[test]
    fn test_compound_identifier_scope() {
        let select = select("SELECT TABLE1.abc.d");
        let Some(Expression::ColumnRef(column)) = &select.columns[0].expr else {
            panic!("expected column ref");
        };
        assert_eq!(column.table.as_deref(), Some("TABLE1.abc"));
        assert_eq!(column.column, "d");
        assert_eq!(column.qualified_name(), "TABLE1.abc.d");
    }

    #[test]
    fn test_select_alias_and_from() {
        let select = select("SELECT DISTINCT d, f AS ff FROM TABLE1 AS tab");
        assert!(select.distinct);
        let alias = select.columns[1].alias.as_ref().unwrap();
        assert_eq!(alias.value, "ff");
        match &select.from[0] {
            FromEntry::Table {
                table, alias, join, ..
            } => {
                assert_eq!(table, "TABLE1");
                assert_eq!(alias.as_deref(), Some("tab"));
                assert!(join.is_none());
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_join_without_constraint() {
        let select = select("SELECT * FROM TABLE1 INNER JOIN TABLE2 O");
        match &select.from[1] {
            FromEntry::Table {
                table,
                alias,
                join,
                has_on,
                ..
            } => {
                assert_eq!(table, "TABLE2");
                assert_eq!(alias.as_deref(), Some("O"));
                assert_eq!(join.as_deref(), Some("INNER JOIN"));
                assert!(!has_on);
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_where_expression_collects_column_refs() {
        let select = select("SELECT * FROM t WHERE a = 1 AND UPPER(t.b) LIKE 'x%'");
        let where_clause = select.where_clause.unwrap();
        let names: Vec<String> = where_clause
            .column_refs()
            .iter()
            .map(ColumnRef::qualified_name)
            .collect();
        assert_eq!(names, vec!["a", "t.b"]);
    }

    #[test]
    fn test_derived_table_becomes_subquery() {
        let select = select("SELECT * FROM (SELECT e.employee_id sub_id FROM employees e) sub");
        match &select.from[0] {
            FromEntry::Subquery {
                statement, alias, ..
            } => {
                assert_eq!(alias, "sub");
                let Statement::Select(inner) = statement.as_ref() else {
                    panic!("expected select");
                };
                assert_eq!(inner.columns[0].output_name().unwrap().value, "sub_id");
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_delete_target_and_where() {
        let Statement::Delete(delete) = parse("DELETE FROM T WHERE C") else {
            panic!("expected delete");
        };
        assert_eq!((delete.target.start.column, delete.target.end.column), (13, 14));
        let where_clause = delete.where_clause.unwrap();
        assert_eq!(where_clause.location().start.column, 21);
    }

    #[test]
    fn test_update_statement() {
        let Statement::Update(update) = parse("UPDATE users SET a = 1 WHERE b = 2") else {
            panic!("expected update");
        };
        assert_eq!(update.target.start.column, 8);
        assert!(update.where_clause.is_some());
    }

    #[test]
    fn test_other_statement() {
        assert_eq!(parse("INSERT INTO t VALUES (1)"), Statement::Other);
    }

    #[test]
    fn test_last_statement_wins() {
        let select = select("SELECT a FROM x; SELECT b");
        assert!(select.from.is_empty());
    }

    #[test]
    fn test_unknown_statement_keyword() {
        let error = parse_err("S");
        let literals: Vec<&str> = error.expected_literals().collect();
        assert!(literals.contains(&"SELECT"));
        assert!(literals.contains(&"INSERT"));
    }

    #[test]
    fn test_blank_input_expects_statement() {
        let error = parse_err("  ");
        assert!(error
            .expected
            .iter()
            .all(|token| token.kind == ExpectedKind::Literal));
        assert_eq!(error.expected.len(), 5);
        assert_eq!(error.location.column, 3);
    }

    #[test]
    fn test_unterminated_string_is_syntax_error() {
        let error = parse_err("SELECT 'hoge.");
        assert_eq!(error.expected_literals().collect::<Vec<_>>(), vec!["'"]);
    }

    #[test]
    fn test_postgres_fallback_for_generic_dialect() {
        let select = select("SELECT a::text FROM t");
        assert_eq!(select.columns.len(), 1);
    }
}
