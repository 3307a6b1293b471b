//! Comment removal for T-SQL text.
//!
//! Comments are located with the sqlparser tokenizer rather than a regex so
//! that `--` inside string literals and bracketed identifiers survives.

use crate::error::{SqlError, SqlResult};
use sqlparser::dialect::MsSqlDialect;
use sqlparser::tokenizer::{Location, Token, Tokenizer, Whitespace};

/// Remove `--` and `/* */` comments from `sql`.
///
/// A line comment becomes a newline and a block comment a single space, so
/// tokens on either side never fuse. The result is trimmed.
pub fn strip_comments(sql: &str) -> SqlResult<String> {
    let dialect = MsSqlDialect {};
    let tokens = Tokenizer::new(&dialect, sql)
        .tokenize_with_location()
        .map_err(|e| SqlError::TokenizeError(e.to_string()))?;

    let line_starts = line_starts(sql);
    let mut out = String::with_capacity(sql.len());
    let mut cursor = 0;

    for token in &tokens {
        let replacement = match &token.token {
            Token::Whitespace(Whitespace::SingleLineComment { .. }) => "\n",
            Token::Whitespace(Whitespace::MultiLineComment(_)) => " ",
            _ => continue,
        };
        let start = byte_offset(sql, &line_starts, token.span.start);
        let end = byte_offset(sql, &line_starts, token.span.end);
        if start < cursor || end < start {
            continue;
        }
        out.push_str(&sql[cursor..start]);
        out.push_str(replacement);
        cursor = end;
    }
    out.push_str(&sql[cursor..]);

    Ok(out.trim().to_string())
}

/// Byte offset at which each line begins.
fn line_starts(sql: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(sql.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// Convert a 1-based line/column location into a byte offset.
///
/// Columns count characters. Locations past the end clamp to `sql.len()`.
fn byte_offset(sql: &str, line_starts: &[usize], location: Location) -> usize {
    let Some(&start) = (location.line as usize)
        .checked_sub(1)
        .and_then(|idx| line_starts.get(idx))
    else {
        return sql.len();
    };
    let column = (location.column as usize).saturating_sub(1);
    sql[start..]
        .char_indices()
        .nth(column)
        .map(|(i, _)| start + i)
        .unwrap_or(sql.len())
}

#[cfg(test)]
#[path = "comments_test.rs"]
mod tests;
