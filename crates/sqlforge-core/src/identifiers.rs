//! Identifier quoting, unquoting, and normalization.
//!
//! Command text is assembled from caller-supplied table and column names, so
//! every identifier passes through here before it reaches SQL text. Lookup
//! keys are normalized the same way, which is what makes schema lookups
//! case- and quote-insensitive.

use std::sync::OnceLock;

use regex::Regex;

use crate::dialect::Dialect;
use crate::error::{Error, Result};

/// Pattern for identifiers that are safe to render into SQL text.
///
/// Plain names, optionally schema-qualified, with spaces allowed inside
/// quoted names after unquoting. Quote characters themselves are rejected;
/// quoting is applied by this module, never carried in the input.
fn ident_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_ $]*$").expect("identifier pattern is valid")
    })
}

/// Strip one level of surrounding quotes from an identifier, if present.
///
/// Recognizes `"name"`, `` `name` ``, and `[name]` so that names coming from
/// any dialect normalize identically.
#[must_use]
pub fn unquote_ident(name: &str) -> &str {
    let name = name.trim();
    let bytes = name.as_bytes();
    if bytes.len() >= 2 {
        let stripped = match (bytes[0], bytes[bytes.len() - 1]) {
            (b'"', b'"') | (b'`', b'`') => Some(&name[1..name.len() - 1]),
            (b'[', b']') => Some(&name[1..name.len() - 1]),
            _ => None,
        };
        if let Some(inner) = stripped {
            return inner;
        }
    }
    name
}

/// Normalize an identifier for case/quote-insensitive comparison.
///
/// Two names refer to the same column when their normalized forms are equal.
#[must_use]
pub fn normalize_ident(name: &str) -> String {
    unquote_ident(name).to_lowercase()
}

/// Check whether an identifier (after unquoting) is safe to render.
#[must_use]
pub fn is_valid_ident(name: &str) -> bool {
    let inner = unquote_ident(name);
    !inner.is_empty() && ident_pattern().is_match(inner)
}

/// Quote a single identifier for a dialect, doubling any embedded quotes.
#[must_use]
pub fn quote_ident(name: &str, dialect: Dialect) -> String {
    let (open, close) = dialect.quote_chars();
    let inner = unquote_ident(name);
    let mut out = String::with_capacity(inner.len() + 2);
    out.push(open);
    for c in inner.chars() {
        out.push(c);
        if c == close {
            out.push(close);
        }
    }
    out.push(close);
    out
}

/// Quote a possibly schema-qualified table name (`schema.table`).
///
/// Each dot-separated part is validated and quoted independently.
pub fn quote_table(name: &str, dialect: Dialect) -> Result<String> {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.is_empty() || parts.iter().any(|p| !is_valid_ident(p)) {
        return Err(Error::InvalidIdentifier {
            name: name.to_string(),
        });
    }
    Ok(parts
        .iter()
        .map(|p| quote_ident(p, dialect))
        .collect::<Vec<_>>()
        .join("."))
}
