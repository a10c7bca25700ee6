//! Resolution of dotted partial identifiers against tables and aliases.
//!
//! Every function here is a pure lookup. Matching is case-sensitive
//! `starts_with`, and results keep schema order, then from-clause order.

use crate::parser::{FromEntry, Statement};
use crate::types::{Column, CompletionItem, DbFunction, Table};

/// Columns of every table whose `<name>.` prefixes `partial`, scoped to the table name.
pub fn columns_by_table_scope(tables: &[Table], partial: &str) -> Vec<CompletionItem> {
    tables
        .iter()
        .filter(|table| has_scope(partial, &table.table_name))
        .flat_map(|table| {
            table
                .columns
                .iter()
                .map(|column| CompletionItem::scoped_column(&table.table_name, column))
        })
        .collect()
}

/// Columns reached through a from-clause alias whose `<alias>.` prefixes `partial`.
///
/// Two aliases of the same base table each contribute their own column set.
pub fn columns_by_alias_scope(
    entries: &[FromEntry],
    tables: &[Table],
    partial: &str,
) -> Vec<CompletionItem> {
    let mut items = Vec::new();
    for entry in entries {
        let FromEntry::Table {
            table,
            alias: Some(alias),
            ..
        } = entry
        else {
            continue;
        };
        if !has_scope(partial, alias) {
            continue;
        }
        for base in tables.iter().filter(|t| &t.table_name == table) {
            items.extend(
                base.columns
                    .iter()
                    .map(|column| CompletionItem::scoped_column(alias, column)),
            );
        }
    }
    items
}

/// Columns for a dotted `partial`, through table names and from-clause aliases.
///
/// An alias shadows a table of the same name, so `t.` after `FROM a t` never
/// reaches the columns of a table named `t`.
pub fn scoped_columns(
    entries: &[FromEntry],
    tables: &[Table],
    partial: &str,
) -> Vec<CompletionItem> {
    let shadowed: Vec<&str> = entries
        .iter()
        .filter_map(|entry| match entry {
            FromEntry::Table {
                alias: Some(alias), ..
            } if has_scope(partial, alias) => Some(alias.as_str()),
            _ => None,
        })
        .collect();
    let visible: Vec<Table> = tables
        .iter()
        .filter(|table| !shadowed.contains(&table.table_name.as_str()))
        .cloned()
        .collect();

    let mut items = columns_by_table_scope(&visible, partial);
    items.extend(columns_by_alias_scope(entries, tables, partial));
    items
}

/// From-clause aliases starting with `partial`, in source order.
pub fn aliases_by_prefix(entries: &[FromEntry], partial: &str) -> Vec<CompletionItem> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            FromEntry::Table {
                alias: Some(alias), ..
            } if alias.starts_with(partial) => Some(CompletionItem::alias(alias.as_str())),
            _ => None,
        })
        .collect()
}

pub fn tables_by_prefix(tables: &[Table], partial: &str) -> Vec<CompletionItem> {
    tables
        .iter()
        .filter(|table| table.table_name.starts_with(partial))
        .map(CompletionItem::table)
        .collect()
}

pub fn functions_by_prefix(functions: &[DbFunction], partial: &str) -> Vec<CompletionItem> {
    functions
        .iter()
        .filter(|function| function.name.starts_with(partial))
        .map(CompletionItem::function)
        .collect()
}

/// Synthetic tables for parsed subqueries in the from clause.
///
/// Each subquery becomes a table named after its alias with one column per
/// top-level select item: the alias, else the bare column name, else `""`.
pub fn pseudo_tables(entries: &[FromEntry]) -> Vec<Table> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            FromEntry::Subquery {
                statement, alias, ..
            } => Some(Table::new(alias.clone(), pseudo_columns(statement))),
            _ => None,
        })
        .collect()
}

fn pseudo_columns(statement: &Statement) -> Vec<Column> {
    let Statement::Select(select) = statement else {
        return Vec::new();
    };
    select
        .columns
        .iter()
        .map(|item| {
            let name = item.output_name().map(|n| n.value).unwrap_or_default();
            Column::new(name, "alias")
        })
        .collect()
}

/// Schema tables followed by the pseudo-tables of `entries`.
pub(crate) fn scope_tables(tables: &[Table], entries: &[FromEntry]) -> Vec<Table> {
    let mut scope = tables.to_vec();
    scope.extend(pseudo_tables(entries));
    scope
}

fn has_scope(partial: &str, scope: &str) -> bool {
    partial
        .strip_prefix(scope)
        .is_some_and(|rest| rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Expression, SelectColumn, SelectStatement};
    use crate::types::{CompletionItemKind, SourceRange};

    fn table_entry(table: &str, alias: Option<&str>) -> FromEntry {
        FromEntry::Table {
            database: None,
            table: table.to_string(),
            alias: alias.map(str::to_string),
            join: None,
            has_on: false,
            location: SourceRange::default(),
        }
    }

    fn tables() -> Vec<Table> {
        vec![
            Table::new(
                "TABLE1",
                vec![Column::new("COLUMN1", ""), Column::new("COLUMN2", "")],
            ),
            Table::new("TABLE2", vec![Column::new("abc.def.ghi", "")]),
        ]
    }

    fn scoped(items: &[CompletionItem]) -> Vec<&str> {
        items.iter().map(CompletionItem::match_text).collect()
    }

    #[test]
    fn test_columns_by_table_scope() {
        let items = columns_by_table_scope(&tables(), "TABLE1.C");
        assert_eq!(scoped(&items), vec!["TABLE1.COLUMN1", "TABLE1.COLUMN2"]);
        assert!(columns_by_table_scope(&tables(), "TABLE1").is_empty());
        assert!(columns_by_table_scope(&tables(), "table1.").is_empty());
    }

    #[test]
    fn test_nested_column_names_are_opaque() {
        let items = columns_by_table_scope(&tables(), "TABLE2.abc.d");
        assert_eq!(scoped(&items), vec!["TABLE2.abc.def.ghi"]);
    }

    #[test]
    fn test_columns_by_alias_scope_keeps_duplicates() {
        let entries = vec![
            table_entry("TABLE1", Some("t")),
            table_entry("TABLE1", Some("t")),
            table_entry("TABLE2", Some("u")),
        ];
        let items = columns_by_alias_scope(&entries, &tables(), "t.");
        assert_eq!(
            scoped(&items),
            vec!["t.COLUMN1", "t.COLUMN2", "t.COLUMN1", "t.COLUMN2"]
        );
    }

    #[test]
    fn test_alias_scope_ignores_unaliased_entries() {
        let entries = vec![table_entry("TABLE1", None)];
        assert!(columns_by_alias_scope(&entries, &tables(), "TABLE1.").is_empty());
    }

    #[test]
    fn test_alias_shadows_table_of_same_name() {
        let entries = vec![table_entry("TABLE1", Some("TABLE2"))];
        let items = scoped_columns(&entries, &tables(), "TABLE2.");
        assert_eq!(scoped(&items), vec!["TABLE2.COLUMN1", "TABLE2.COLUMN2"]);

        let items = scoped_columns(&entries, &tables(), "TABLE1.C");
        assert_eq!(scoped(&items), vec!["TABLE1.COLUMN1", "TABLE1.COLUMN2"]);
    }

    #[test]
    fn test_aliases_by_prefix() {
        let entries = vec![
            table_entry("TABLE1", Some("ta")),
            table_entry("TABLE2", None),
            table_entry("TABLE2", Some("tb")),
            table_entry("TABLE2", Some("x")),
        ];
        let items = aliases_by_prefix(&entries, "t");
        assert_eq!(scoped(&items), vec!["ta", "tb"]);
        assert!(items.iter().all(|i| i.kind == CompletionItemKind::Alias));
    }

    #[test]
    fn test_tables_and_functions_by_prefix() {
        let functions = vec![
            DbFunction::new("array_concat()", "concat"),
            DbFunction::new("count()", ""),
        ];
        assert_eq!(scoped(&tables_by_prefix(&tables(), "TABLE")).len(), 2);
        let items = functions_by_prefix(&functions, "arr");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].documentation.as_deref(), Some("concat"));
    }

    #[test]
    fn test_pseudo_tables_from_subquery() {
        let column = |name: &str| SelectColumn {
            expr: Some(Expression::ColumnRef(crate::parser::ColumnRef {
                table: Some("e".to_string()),
                column: name.to_string(),
                location: SourceRange::default(),
            })),
            alias: None,
            location: SourceRange::default(),
        };
        let entries = vec![
            table_entry("employees", Some("e")),
            FromEntry::Subquery {
                statement: Box::new(Statement::Select(SelectStatement {
                    distinct: false,
                    columns: vec![
                        column("employee_id"),
                        SelectColumn {
                            expr: None,
                            alias: None,
                            location: SourceRange::default(),
                        },
                    ],
                    from: Vec::new(),
                    where_clause: None,
                })),
                alias: "sub".to_string(),
                location: SourceRange::default(),
            },
        ];

        let pseudo = pseudo_tables(&entries);
        assert_eq!(pseudo.len(), 1);
        assert_eq!(pseudo[0].table_name, "sub");
        let names: Vec<&str> = pseudo[0]
            .columns
            .iter()
            .map(|c| c.column_name.as_str())
            .collect();
        assert_eq!(names, vec!["employee_id", ""]);
        assert_eq!(pseudo[0].columns[0].description, "alias");

        let scope = scope_tables(&tables(), &entries);
        assert_eq!(scope.len(), 3);
        assert_eq!(
            scoped(&columns_by_table_scope(&scope, "sub.e")),
            vec!["sub.employee_id", "sub."]
        );
    }
}
