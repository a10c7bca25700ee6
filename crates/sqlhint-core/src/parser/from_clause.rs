//! Token-level scan of the first `FROM` clause of a document.
//!
//! The full parser gives up on the first syntax error, which while typing usually
//! sits before the `FROM` clause. This scan only needs the tokenizer, so table
//! references, aliases and subqueries stay visible for scope resolution even when
//! the statement as a whole does not parse.

use sqlparser::keywords::{Keyword, RESERVED_FOR_TABLE_ALIAS};
use sqlparser::tokenizer::{Token, TokenWithSpan, Tokenizer, Word};
#[cfg(feature = "tracing")]
use tracing::debug;

use super::span::{end_location, source_location};
use super::{syntax_error, FromEntry, ParseFailure, SqlParser};
use crate::types::{Dialect, SourceLocation, SourceRange};

/// Keywords that end a `FROM` clause.
const CLAUSE_END: &[Keyword] = &[
    Keyword::WHERE,
    Keyword::GROUP,
    Keyword::ORDER,
    Keyword::HAVING,
    Keyword::LIMIT,
    Keyword::UNION,
    Keyword::EXCEPT,
    Keyword::INTERSECT,
    Keyword::WINDOW,
    Keyword::QUALIFY,
    Keyword::OFFSET,
    Keyword::FETCH,
    Keyword::SET,
    Keyword::RETURNING,
];

/// Keywords that may start a join operator.
const JOIN_START: &[Keyword] = &[
    Keyword::JOIN,
    Keyword::INNER,
    Keyword::LEFT,
    Keyword::RIGHT,
    Keyword::FULL,
    Keyword::CROSS,
    Keyword::NATURAL,
    Keyword::OUTER,
];

pub(crate) fn scan<P: SqlParser + ?Sized>(
    sql: &str,
    dialect: Dialect,
    parser: &P,
) -> Result<Vec<FromEntry>, ParseFailure> {
    let dialect_impl = dialect.to_sqlparser_dialect();
    let tokens: Vec<TokenWithSpan> = Tokenizer::new(&*dialect_impl, sql)
        .tokenize_with_location()
        .map_err(|err| syntax_error::translate(sql, err.into(), dialect))?
        .into_iter()
        .filter(|t| !matches!(t.token, Token::Whitespace(_) | Token::EOF))
        .collect();

    let Some(from) = first_top_level_from(&tokens) else {
        return Ok(Vec::new());
    };

    let mut scanner = Scanner {
        sql,
        tokens: &tokens,
        pos: from + 1,
        parser,
        entries: Vec::new(),
    };
    scanner.scan_entries();

    #[cfg(feature = "tracing")]
    debug!(entries = scanner.entries.len(), "Scanned FROM clause");

    Ok(scanner.entries)
}

fn first_top_level_from(tokens: &[TokenWithSpan]) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, t) in tokens.iter().enumerate() {
        match &t.token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            Token::Word(w) if depth == 0 && is_keyword(w, Keyword::FROM) => return Some(idx),
            _ => {}
        }
    }
    None
}

fn is_keyword(word: &Word, keyword: Keyword) -> bool {
    word.quote_style.is_none() && word.keyword == keyword
}

fn is_alias(word: &Word) -> bool {
    word.quote_style.is_some()
        || !(RESERVED_FOR_TABLE_ALIAS.contains(&word.keyword)
            || CLAUSE_END.contains(&word.keyword)
            || JOIN_START.contains(&word.keyword))
}

struct Scanner<'a, P: ?Sized> {
    sql: &'a str,
    tokens: &'a [TokenWithSpan],
    pos: usize,
    parser: &'a P,
    entries: Vec<FromEntry>,
}

impl<P: SqlParser + ?Sized> Scanner<'_, P> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn peek_word(&self) -> Option<&Word> {
        match self.peek() {
            Some(Token::Word(w)) => Some(w),
            _ => None,
        }
    }

    fn peek_keyword(&self, keyword: Keyword) -> bool {
        self.peek_word().is_some_and(|w| is_keyword(w, keyword))
    }

    fn location_at(&self, idx: usize, end: bool) -> SourceLocation {
        match self.tokens.get(idx) {
            Some(t) if end => source_location(self.sql, t.span.end),
            Some(t) => source_location(self.sql, t.span.start),
            None => end_location(self.sql),
        }
    }

    fn scan_entries(&mut self) {
        let mut join: Option<String> = None;
        loop {
            if !self.scan_factor(join.take()) {
                return;
            }
            loop {
                match self.peek() {
                    Some(Token::Comma) => {
                        self.pos += 1;
                        break;
                    }
                    Some(Token::Word(w)) if is_keyword(w, Keyword::ON) => {
                        self.mark_constrained();
                        self.pos += 1;
                        self.skip_join_condition();
                    }
                    Some(Token::Word(w)) if is_keyword(w, Keyword::USING) => {
                        self.mark_constrained();
                        self.pos += 1;
                        if matches!(self.peek(), Some(Token::LParen)) {
                            self.skip_group();
                        }
                    }
                    Some(Token::Word(w))
                        if w.quote_style.is_none() && JOIN_START.contains(&w.keyword) =>
                    {
                        match self.scan_join_operator() {
                            Some(label) => {
                                join = Some(label);
                                break;
                            }
                            None => return,
                        }
                    }
                    _ => return,
                }
            }
        }
    }

    /// Consumes `[NATURAL] [INNER | LEFT | RIGHT | FULL | CROSS] [OUTER] JOIN`.
    fn scan_join_operator(&mut self) -> Option<String> {
        let mut words = Vec::new();
        while let Some(w) = self.peek_word() {
            if w.quote_style.is_some() || !JOIN_START.contains(&w.keyword) {
                break;
            }
            let is_join = w.keyword == Keyword::JOIN;
            words.push(w.value.to_uppercase());
            self.pos += 1;
            if is_join {
                return Some(words.join(" "));
            }
        }
        None
    }

    fn mark_constrained(&mut self) {
        if let Some(FromEntry::Table { has_on, .. }) = self.entries.last_mut() {
            *has_on = true;
        }
    }

    /// Skips an `ON` condition up to the next join, list separator or clause end.
    fn skip_join_condition(&mut self) {
        while let Some(token) = self.peek() {
            match token {
                Token::LParen => self.skip_group(),
                Token::RParen | Token::Comma | Token::SemiColon => return,
                Token::Word(w)
                    if w.quote_style.is_none()
                        && (JOIN_START.contains(&w.keyword) || CLAUSE_END.contains(&w.keyword)) =>
                {
                    return
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Skips a parenthesised group starting at the current token.
    fn skip_group(&mut self) {
        match self.matching_paren(self.pos) {
            Some(close) => self.pos = close + 1,
            None => self.pos = self.tokens.len(),
        }
    }

    fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (idx, t) in self.tokens.iter().enumerate().skip(open) {
            match t.token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(idx);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Scans one table factor. Returns false when the clause ends here.
    fn scan_factor(&mut self, join: Option<String>) -> bool {
        if self.peek_keyword(Keyword::LATERAL) {
            self.pos += 1;
        }
        match self.peek() {
            Some(Token::LParen) => self.scan_parenthesized(),
            Some(Token::Word(w)) if w.quote_style.is_some() || is_alias(w) => {
                self.scan_table(join);
                true
            }
            _ => false,
        }
    }

    fn scan_table(&mut self, join: Option<String>) {
        let first = self.pos;
        let mut parts = Vec::new();
        let mut last = self.pos;
        while let Some(w) = self.peek_word() {
            parts.push(w.value.clone());
            last = self.pos;
            self.pos += 1;
            if !matches!(self.peek(), Some(Token::Period)) {
                break;
            }
            // A trailing dot still belongs to the reference being typed.
            last = self.pos;
            self.pos += 1;
        }

        // Table functions such as `generate_series(1, 3)`.
        if matches!(self.peek(), Some(Token::LParen)) {
            last = self.matching_paren(self.pos).unwrap_or(self.tokens.len() - 1);
            self.skip_group();
        }

        let alias = self.scan_alias();
        if alias.is_some() {
            last = self.pos - 1;
        }

        let table = parts.pop().unwrap_or_default();
        let database = if parts.is_empty() {
            None
        } else {
            Some(parts.join("."))
        };
        self.entries.push(FromEntry::Table {
            database,
            table,
            alias,
            join,
            has_on: false,
            location: SourceRange::new(self.location_at(first, false), self.location_at(last, true)),
        });
    }

    fn scan_alias(&mut self) -> Option<String> {
        let explicit = self.peek_keyword(Keyword::AS);
        if explicit {
            self.pos += 1;
        }
        match self.peek_word() {
            Some(w) if explicit || is_alias(w) => {
                let alias = w.value.clone();
                self.pos += 1;
                Some(alias)
            }
            _ => None,
        }
    }

    /// Scans `( ... ) [AS alias]`. Returns false when the clause cannot continue.
    fn scan_parenthesized(&mut self) -> bool {
        let open = self.pos;
        let is_query = matches!(
            self.tokens.get(open + 1).map(|t| &t.token),
            Some(Token::Word(w)) if is_keyword(w, Keyword::SELECT) || is_keyword(w, Keyword::WITH)
        );
        let close = self.matching_paren(open);

        if !is_query {
            // Nested join group; its tables are not tracked individually.
            self.skip_group();
            self.scan_alias();
            return close.is_some();
        }

        let start = self.location_at(open, true);
        let end = match close {
            Some(close) => self.location_at(close, false),
            None => end_location(self.sql),
        };
        let text = self.sql[start.offset..end.offset].to_string();

        let Some(close) = close else {
            self.entries.push(FromEntry::IncompleteSubquery {
                text,
                location: SourceRange::new(start, end),
            });
            self.pos = self.tokens.len();
            return false;
        };

        self.pos = close + 1;
        let alias = self.scan_alias();
        match self.parser.parse(&text) {
            Ok(statement) => {
                let last = if alias.is_some() { self.pos - 1 } else { close };
                self.entries.push(FromEntry::Subquery {
                    statement: Box::new(statement),
                    alias: alias.unwrap_or_default(),
                    location: SourceRange::new(
                        self.location_at(open, false),
                        self.location_at(last, true),
                    ),
                });
            }
            Err(_) => self.entries.push(FromEntry::IncompleteSubquery {
                text,
                location: SourceRange::new(start, end),
            }),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{SqlparserBackend, Statement};

    fn scan_generic(sql: &str) -> Vec<FromEntry> {
        let backend = SqlparserBackend::default();
        scan(sql, Dialect::Generic, &backend).unwrap()
    }

    fn table(entry: &FromEntry) -> (&str, Option<&str>) {
        match entry {
            FromEntry::Table { table, alias, .. } => (table.as_str(), alias.as_deref()),
            other => panic!("expected table entry, got {other:?}"),
        }
    }

    #[test]
    fn test_no_from_clause() {
        assert!(scan_generic("SELECT 1").is_empty());
        assert!(scan_generic("SELECT COUNT(").is_empty());
    }

    #[test]
    fn test_tables_and_aliases() {
        let entries = scan_generic("SELECT * FROM a, b AS bb, c cc WHERE x = 1");
        let names: Vec<_> = entries.iter().map(table).collect();
        assert_eq!(
            names,
            vec![("a", None), ("b", Some("bb")), ("c", Some("cc"))]
        );
    }

    #[test]
    fn test_qualified_table_name() {
        let entries = scan_generic("SELECT * FROM db.schema.users u");
        match &entries[0] {
            FromEntry::Table {
                database,
                table,
                alias,
                ..
            } => {
                assert_eq!(database.as_deref(), Some("db.schema"));
                assert_eq!(table, "users");
                assert_eq!(alias.as_deref(), Some("u"));
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_join_chain() {
        let sql = "SELECT * FROM employees e JOIN jobs j ON e.job_id = j.job_id \
                   LEFT OUTER JOIN departments d ON d.id = e.department_id INNER JOIN regions r";
        let entries = scan_generic(sql);
        assert_eq!(entries.len(), 4);
        let joins: Vec<_> = entries
            .iter()
            .map(|e| match e {
                FromEntry::Table { join, has_on, .. } => (join.clone(), *has_on),
                other => panic!("unexpected entry {other:?}"),
            })
            .collect();
        assert_eq!(
            joins,
            vec![
                (None, false),
                (Some("JOIN".to_string()), true),
                (Some("LEFT OUTER JOIN".to_string()), true),
                (Some("INNER JOIN".to_string()), false),
            ]
        );
        assert_eq!(table(&entries[3]), ("regions", Some("r")));
    }

    #[test]
    fn test_alias_does_not_swallow_keywords() {
        let entries = scan_generic("SELECT * FROM t1 INNER JOIN t2 ON t1.a = t2.a WHERE 1 = 1");
        assert_eq!(table(&entries[0]), ("t1", None));
        assert_eq!(table(&entries[1]), ("t2", None));
    }

    #[test]
    fn test_table_location() {
        let entries = scan_generic("SELECT * FROM FOO W");
        let location = entries[0].location();
        assert_eq!((location.start.line, location.start.column), (1, 15));
        assert_eq!((location.end.line, location.end.column), (1, 20));
    }

    #[test]
    fn test_trailing_dot_extends_location() {
        let entries = scan_generic("SELECT TABLE1.COLUMN1 FROM TABLE1.");
        assert_eq!(table(&entries[0]), ("TABLE1", None));
        assert_eq!(entries[0].location().end.column, 35);
    }

    #[test]
    fn test_complete_subquery() {
        let entries =
            scan_generic("SELECT sub. FROM (SELECT e.employee_id sub_id FROM employees e) sub");
        match &entries[0] {
            FromEntry::Subquery {
                statement, alias, ..
            } => {
                assert_eq!(alias, "sub");
                assert!(matches!(**statement, Statement::Select(_)));
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_incomplete_subquery() {
        let entries = scan_generic("SELECT sub FROM (SELECT e. FROM employees e) sub");
        match &entries[0] {
            FromEntry::IncompleteSubquery { text, location } => {
                assert_eq!(text, "SELECT e. FROM employees e");
                assert_eq!((location.start.line, location.start.column), (1, 18));
                assert_eq!(location.start.offset, 17);
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_subquery_runs_to_end() {
        let entries = scan_generic("SELECT * FROM (SELECT a FROM t WHERE ");
        match &entries[0] {
            FromEntry::IncompleteSubquery { text, .. } => {
                assert_eq!(text, "SELECT a FROM t WHERE ");
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_from_inside_function_is_ignored() {
        let entries = scan_generic("SELECT EXTRACT(YEAR FROM d) FROM events ev");
        assert_eq!(entries.len(), 1);
        assert_eq!(table(&entries[0]), ("events", Some("ev")));
    }
}
