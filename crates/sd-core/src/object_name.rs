//! Schema-qualified database object names.
//!
//! Names reach the resolver from three places that format them differently:
//! the catalog (`dbo.Orders`), create scripts (`[dbo].[Orders]`) and routine
//! text (`"dbo".Orders`, `#Staging`). [`ObjectName`] parses all of them into
//! the same shape and exposes case-insensitive keys for comparison.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A database object name, optionally qualified by its schema.
///
/// Delimiters (`[...]`, `"..."`, `` `...` ``) are stripped from each part on
/// parse. Server and database prefixes beyond `schema.name` are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectName {
    schema: Option<String>,
    name: String,
}

impl ObjectName {
    /// Create a schema-qualified name.
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        let schema = schema.into();
        Self {
            schema: if schema.is_empty() { None } else { Some(schema) },
            name: name.into(),
        }
    }

    /// Create a name without a schema.
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Parse a possibly delimited, possibly qualified identifier.
    ///
    /// Returns `None` when no object name remains after stripping.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = split_parts(raw);
        let name = parts.pop().filter(|n| !n.is_empty())?;
        let schema = parts.pop().filter(|s| !s.is_empty());
        Some(Self { schema, name })
    }

    /// Schema part, if present.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Unqualified object name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return this name qualified with `default_schema` when it has no schema.
    pub fn with_default_schema(&self, default_schema: &str) -> Self {
        match self.schema {
            Some(_) => self.clone(),
            None => Self::qualified(default_schema, self.name.clone()),
        }
    }

    /// Case-insensitive key for the full name (`schema.name` or `name`).
    pub fn canonical_key(&self) -> String {
        self.to_string().to_lowercase()
    }

    /// Case-insensitive key for the trailing name component only.
    pub fn trailing_key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Whether this names a SQL Server temporary table (`#t` or `##t`).
    pub fn is_temporary(&self) -> bool {
        self.name.starts_with('#')
    }

    /// Bracket-quoted form used in generated T-SQL (`[schema].[name]`).
    pub fn bracketed(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", bracket(schema), bracket(&self.name)),
            None => bracket(&self.name),
        }
    }

    /// Whether the `schema.name` form would not parse back to this name.
    fn needs_delimiters(&self) -> bool {
        self.schema
            .iter()
            .chain(std::iter::once(&self.name))
            .any(|part| part.contains(['.', '[', ']', '"', '`', '\'']))
    }
}

/// Quote a T-SQL identifier with brackets, escaping embedded `]`.
pub fn bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

/// Split on `.` outside of delimiters and strip delimiters from each part.
///
/// Stray brackets and quotes are trimmed from undelimited parts only.
fn split_parts(raw: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut delimited = false;
    let mut chars = raw.trim().chars().peekable();
    let mut closing: Option<char> = None;

    while let Some(c) = chars.next() {
        match closing {
            Some(close) if c == close => {
                // Doubled closing delimiter is an escaped literal.
                if chars.peek() == Some(&close) {
                    current.push(close);
                    chars.next();
                } else {
                    closing = None;
                }
            }
            Some(_) => current.push(c),
            None => match c {
                '[' | '"' | '`' if current.trim().is_empty() => {
                    closing = Some(if c == '[' { ']' } else { c });
                    delimited = true;
                }
                '[' => closing = Some(']'),
                '"' => closing = Some('"'),
                '`' => closing = Some('`'),
                '.' => {
                    parts.push(finish_part(std::mem::take(&mut current), delimited));
                    delimited = false;
                }
                _ => current.push(c),
            },
        }
    }
    parts.push(finish_part(current, delimited));
    parts
}

fn finish_part(part: String, delimited: bool) -> String {
    if delimited {
        part
    } else {
        part.trim()
            .trim_matches(|c| matches!(c, '\'' | ']' | '['))
            .to_string()
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl Serialize for ObjectName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.needs_delimiters() {
            serializer.serialize_str(&self.bracketed())
        } else {
            serializer.collect_str(self)
        }
    }
}

impl<'de> Deserialize<'de> for ObjectName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ObjectName::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid object name: {raw:?}")))
    }
}

#[cfg(test)]
#[path = "object_name_test.rs"]
mod tests;
