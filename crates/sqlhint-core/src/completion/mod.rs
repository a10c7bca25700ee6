//! SQL completion resolver.
//!
//! Completion first truncates the document at the cursor and tries a full
//! parse. A parsed statement is walked for the element under the cursor
//! ([`ast_candidates`]); a syntax error is mined for expected tokens and the
//! partially typed identifier ([`error_candidates`]). Cursors inside a
//! subquery that does not parse re-enter the resolver on the subquery text.
//! Every candidate is finally filtered against the token being typed.

mod ast_candidates;
pub mod cursor;
mod error_candidates;
pub mod scope;

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::error::CompletionError;
use crate::parser::{FromEntry, ParseFailure, SqlParser, SqlparserBackend, SyntaxError};
use crate::types::{
    CompletionItem, CompletionOptions, CompletionRequest, CompletionResult, ErrorDescriptor,
    Position, Schema,
};

pub use cursor::{last_token, truncate_to_cursor};

/// Maximum SQL input size (10MB) to prevent memory exhaustion.
pub const MAX_SQL_LENGTH: usize = 10 * 1024 * 1024;

const SYNTAX_ERROR_LABEL: &str = "SyntaxError";

/// Completion resolver over a [`SqlParser`].
///
/// Holds no per-call state; one instance can serve any number of documents.
#[derive(Debug, Clone, Default)]
pub struct Completer<P> {
    parser: P,
    options: CompletionOptions,
}

impl<P: SqlParser> Completer<P> {
    pub fn new(parser: P, options: CompletionOptions) -> Self {
        Self { parser, options }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn options(&self) -> &CompletionOptions {
        &self.options
    }

    /// Computes the candidates for the cursor at `pos` in `sql`.
    pub fn complete(
        &self,
        sql: &str,
        pos: Position,
        schema: &Schema,
    ) -> Result<CompletionResult, CompletionError> {
        if sql.len() > MAX_SQL_LENGTH {
            return Err(CompletionError::InputTooLarge {
                len: sql.len(),
                max: MAX_SQL_LENGTH,
            });
        }

        let (candidates, error) = self.resolve(sql, pos, schema, 0)?;
        let target = truncate_to_cursor(sql, pos);
        let token = last_token(&target);

        #[cfg(feature = "tracing")]
        debug!(
            token,
            unfiltered = candidates.len(),
            syntax_error = error.is_some(),
            "Filtering completion candidates"
        );

        Ok(CompletionResult {
            candidates: filter_by_token(candidates, token),
            error,
        })
    }

    /// Unfiltered candidates plus the syntax error of the full parse, if any.
    fn resolve(
        &self,
        sql: &str,
        pos: Position,
        schema: &Schema,
        depth: usize,
    ) -> Result<(Vec<CompletionItem>, Option<ErrorDescriptor>), CompletionError> {
        let target = truncate_to_cursor(sql, pos);

        let error = match self.parser.parse(&target) {
            Ok(statement) => {
                let entries = self.from_clause(sql);
                let candidates = ast_candidates::candidates(&statement, pos, &entries, schema);
                return Ok((candidates, None));
            }
            Err(ParseFailure::Syntax(error)) => error,
            Err(ParseFailure::Other(message)) => return Err(CompletionError::Parser(message)),
        };

        #[cfg(feature = "tracing")]
        debug!(message = %error.message, depth, "Recovering from syntax error");

        let entries = self.from_clause(sql);
        let incomplete = entries.iter().find_map(|entry| match entry {
            FromEntry::IncompleteSubquery { text, location } if location.contains(pos) => {
                Some((text, location.start))
            }
            _ => None,
        });

        let candidates = match incomplete {
            Some((text, start)) => {
                if depth >= self.options.max_subquery_depth {
                    return Err(CompletionError::SubqueryDepthExceeded {
                        limit: self.options.max_subquery_depth,
                    });
                }
                let line = pos.line.saturating_sub(start.line.saturating_sub(1));
                // Columns only shift on the line the subquery starts on.
                let column = if line == 0 {
                    (pos.column + 1).saturating_sub(start.column)
                } else {
                    pos.column
                };
                self.resolve(text, Position::new(line, column), schema, depth + 1)?
                    .0
            }
            None => error_candidates::candidates(
                &self.parser,
                &error,
                &target,
                pos,
                &entries,
                schema,
            ),
        };

        Ok((candidates, Some(error_descriptor(&error))))
    }

    /// From-clause entries of the whole document; failures mean "none known".
    fn from_clause(&self, sql: &str) -> Vec<FromEntry> {
        match self.parser.parse_from_clause(sql) {
            Ok(entries) => entries,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                debug!(error = ?_err, "From clause unavailable");
                Vec::new()
            }
        }
    }
}

fn error_descriptor(error: &SyntaxError) -> ErrorDescriptor {
    ErrorDescriptor {
        label: SYNTAX_ERROR_LABEL.to_string(),
        detail: error.message.clone(),
        line: error.location.line,
        offset: error.location.offset,
    }
}

/// Keeps candidates matching `token` and computes the remaining text to insert
/// for scoped columns.
fn filter_by_token(candidates: Vec<CompletionItem>, token: &str) -> Vec<CompletionItem> {
    candidates
        .into_iter()
        .filter(|candidate| candidate.match_text().starts_with(token))
        .map(|mut candidate| {
            if let Some(rest) = candidate
                .scoped_column_name
                .as_deref()
                .and_then(|scoped| scoped.strip_prefix(token))
            {
                candidate.insert_text = Some(rest.to_string());
            }
            candidate
        })
        .collect()
}

/// Completes with the default `sqlparser` backend and options.
pub fn complete(
    sql: &str,
    pos: Position,
    schema: &Schema,
) -> Result<CompletionResult, CompletionError> {
    Completer::new(SqlparserBackend::default(), CompletionOptions::default())
        .complete(sql, pos, schema)
}

/// Completes a JSON-style [`CompletionRequest`].
pub fn completion_items(request: &CompletionRequest) -> Result<CompletionResult, CompletionError> {
    let options = request.options.unwrap_or_default();
    Completer::new(SqlparserBackend::new(options.dialect), options).complete(
        &request.sql,
        request.position,
        &request.schema,
    )
}
