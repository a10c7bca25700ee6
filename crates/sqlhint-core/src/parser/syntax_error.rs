//! Translation of sqlparser failures into [`ParseFailure`]s.
//!
//! sqlparser reports problems as formatted strings such as
//! `"sql parser error: Expected: SET, found: EOF"`. The parts the completion resolver
//! needs (the expected tokens and the error location) are recovered here, so the rest
//! of the crate never depends on sqlparser's wording.

use std::sync::OnceLock;

use regex::Regex;
use sqlparser::keywords::Keyword;
use sqlparser::parser::ParserError;
use sqlparser::tokenizer::{Token, Tokenizer, Word};
#[cfg(feature = "tracing")]
use tracing::trace;

use super::span::{end_location, line_col_to_offset};
use super::{ExpectedToken, ParseFailure, SyntaxError};
use crate::types::{Dialect, SourceLocation};

/// Message reported when the cursor sits where a column name of an `INSERT` column
/// list or an `UPDATE ... SET` assignment is expected.
pub const EXPECTED_COLUMN_NAME: &str = "EXPECTED COLUMN NAME";

/// Expected-token descriptions that do not spell out their keywords.
const DESCRIPTION_TOKENS: &[(&str, &[&str])] = &[
    (
        "an SQL statement",
        &["SELECT", "INSERT", "UPDATE", "DELETE", "WITH"],
    ),
    (
        "end of statement",
        &["FROM", "WHERE", "GROUP", "ORDER", "HAVING", "LIMIT", "UNION"],
    ),
];

/// Upper-case words of a description that are prose rather than keywords.
const DESCRIPTION_NOISE: &[&str] = &["SQL", "EOF"];

pub(crate) fn translate(sql: &str, err: ParserError, dialect: Dialect) -> ParseFailure {
    match err {
        ParserError::RecursionLimitExceeded => ParseFailure::Other(err.to_string()),
        ParserError::TokenizerError(message) => {
            let expected = unterminated_quote(sql)
                .map(|quote| vec![ExpectedToken::literal(quote.to_string())])
                .unwrap_or_default();
            let location = error_location(sql, &message);
            ParseFailure::Syntax(SyntaxError {
                message,
                expected,
                location,
            })
        }
        ParserError::ParserError(message) => {
            ParseFailure::Syntax(translate_parser_message(sql, message, dialect))
        }
    }
}

/// Syntax error for text that holds no statement at all.
pub(crate) fn missing_statement(sql: &str) -> SyntaxError {
    SyntaxError {
        message: "Expected: an SQL statement, found: EOF".to_string(),
        expected: description_tokens("an SQL statement"),
        location: end_location(sql),
    }
}

fn translate_parser_message(sql: &str, message: String, dialect: Dialect) -> SyntaxError {
    let location = error_location(sql, &message);
    let tokens = significant_tokens(sql, dialect);

    if in_column_name_position(&tokens) {
        return SyntaxError {
            message: EXPECTED_COLUMN_NAME.to_string(),
            expected: Vec::new(),
            location,
        };
    }

    let Some((description, found)) = split_expected_found(&message) else {
        return SyntaxError {
            message,
            expected: Vec::new(),
            location,
        };
    };

    let mut expected = description_tokens(&description);
    if insert_without_into(&tokens) {
        expected.push(ExpectedToken::literal("INTO"));
    }
    // A name at the very end may still be the first part of a qualified name.
    if found == "EOF" && matches!(tokens.last(), Some(Token::Word(w)) if is_identifier(w)) {
        expected.push(ExpectedToken::literal("."));
    }

    SyntaxError {
        message,
        expected,
        location,
    }
}

fn split_expected_found(message: &str) -> Option<(String, String)> {
    static EXPECTED_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = EXPECTED_REGEX.get_or_init(|| {
        Regex::new(r"(?s)Expected:\s*(.+?),\s*found:\s*(.+?)(?:\s+at Line:\s*\d+\s*,\s*Column:\s*\d+)?$")
            .expect("Invalid regex pattern")
    });
    let caps = re.captures(message)?;
    Some((
        caps.get(1)?.as_str().trim().to_string(),
        caps.get(2)?.as_str().trim().to_string(),
    ))
}

fn description_tokens(description: &str) -> Vec<ExpectedToken> {
    if let Some((_, keywords)) = DESCRIPTION_TOKENS
        .iter()
        .find(|(known, _)| *known == description)
    {
        return keywords.iter().map(|k| ExpectedToken::literal(*k)).collect();
    }

    if !description.is_empty() && description.chars().all(|c| c.is_ascii_punctuation()) {
        return vec![ExpectedToken::literal(description)];
    }

    let keywords: Vec<ExpectedToken> = description
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|word| {
            word.len() > 1
                && word.chars().all(|c| c.is_ascii_uppercase() || c == '_')
                && !DESCRIPTION_NOISE.contains(word)
        })
        .map(ExpectedToken::literal)
        .collect();

    if keywords.is_empty() {
        vec![ExpectedToken::other(description)]
    } else {
        keywords
    }
}

/// Parses the position from sqlparser's `"... at Line: X, Column: Y"` suffix.
///
/// Errors at end of input carry no position; they are placed after the last character.
fn error_location(sql: &str, message: &str) -> SourceLocation {
    static POSITION_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = POSITION_REGEX.get_or_init(|| {
        Regex::new(r"Line:\s*(\d+)\s*,\s*Column:\s*(\d+)").expect("Invalid regex pattern")
    });

    let parsed = re.captures(message).and_then(|caps| {
        let line: usize = caps.get(1)?.as_str().parse().ok()?;
        let column: usize = caps.get(2)?.as_str().parse().ok()?;
        let offset = line_col_to_offset(sql, line, column)?;
        Some(SourceLocation::new(offset, line, column))
    });

    #[cfg(feature = "tracing")]
    if parsed.is_none() && message.contains("Line") {
        trace!(
            "Failed to parse position from error message that appears to contain position info: {}",
            message
        );
    }

    parsed.unwrap_or_else(|| end_location(sql))
}

/// Tokens of `sql` without whitespace and comments. Empty when tokenizing fails.
fn significant_tokens(sql: &str, dialect: Dialect) -> Vec<Token> {
    let dialect_impl = dialect.to_sqlparser_dialect();
    let mut tokenizer = Tokenizer::new(&*dialect_impl, sql);
    match tokenizer.tokenize() {
        Ok(tokens) => tokens
            .into_iter()
            .filter(|token| !matches!(token, Token::Whitespace(_) | Token::EOF))
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn is_identifier(word: &Word) -> bool {
    word.quote_style.is_some() || word.keyword == Keyword::NoKeyword
}

/// `INSERT <word>`: sqlparser reads the word as the table name because `INTO` is
/// optional, so it never asks for `INTO` itself.
fn insert_without_into(tokens: &[Token]) -> bool {
    match tokens {
        [Token::Word(insert), Token::Word(word)] => {
            insert.keyword == Keyword::INSERT
                && word.quote_style.is_none()
                && word.keyword != Keyword::INTO
        }
        _ => false,
    }
}

/// True when the text ends inside an `INSERT INTO t (` column list or in the target
/// of an `UPDATE t SET` assignment.
fn in_column_name_position(tokens: &[Token]) -> bool {
    match tokens.first() {
        Some(Token::Word(w)) if w.keyword == Keyword::INSERT => in_insert_column_list(tokens),
        Some(Token::Word(w)) if w.keyword == Keyword::UPDATE => in_update_assignment_target(tokens),
        _ => false,
    }
}

fn in_insert_column_list(tokens: &[Token]) -> bool {
    // The column list is the first parenthesis, and only if it precedes the source.
    let Some(open) = tokens.iter().position(|t| match t {
        Token::LParen => true,
        Token::Word(w) => matches!(
            w.keyword,
            Keyword::VALUES | Keyword::SELECT | Keyword::DEFAULT
        ),
        _ => false,
    }) else {
        return false;
    };
    if tokens[open] != Token::LParen {
        return false;
    }

    let mut depth = 0usize;
    for token in &tokens[open..] {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    depth > 0
        && matches!(
            tokens.last(),
            Some(Token::Word(_) | Token::Comma | Token::LParen)
        )
}

fn in_update_assignment_target(tokens: &[Token]) -> bool {
    let mut depth = 0usize;
    let mut after_set = false;
    let mut saw_assignment = false;
    for token in tokens {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            Token::Word(w) if depth == 0 && w.keyword == Keyword::SET && w.quote_style.is_none() => {
                after_set = true;
                saw_assignment = false;
            }
            Token::Word(w)
                if depth == 0
                    && after_set
                    && w.quote_style.is_none()
                    && matches!(w.keyword, Keyword::WHERE | Keyword::FROM | Keyword::RETURNING) =>
            {
                return false;
            }
            Token::Comma if depth == 0 && after_set => saw_assignment = false,
            Token::Eq if depth == 0 && after_set => saw_assignment = true,
            _ => {}
        }
    }
    after_set && !saw_assignment
}

/// The quote character left open at the end of `sql`, if any.
pub(crate) fn unterminated_quote(sql: &str) -> Option<char> {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Quoted(char),
        LineComment,
        BlockComment,
    }

    let mut state = State::Code;
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '\'' | '"' | '`' => state = State::Quoted(c),
                '-' if chars.peek() == Some(&'-') => state = State::LineComment,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                }
                _ => {}
            },
            State::Quoted(quote) if c == quote => {
                // A doubled quote is an escaped quote.
                if chars.peek() == Some(&quote) {
                    chars.next();
                } else {
                    state = State::Code;
                }
            }
            State::Quoted(_) => {}
            State::LineComment if c == '\n' => state = State::Code,
            State::LineComment => {}
            State::BlockComment if c == '*' && chars.peek() == Some(&'/') => {
                chars.next();
                state = State::Code;
            }
            State::BlockComment => {}
        }
    }

    match state {
        State::Quoted(quote) => Some(quote),
        _ => None,
    }
}
