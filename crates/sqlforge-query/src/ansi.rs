//! Shared ANSI SQL assembly.
//!
//! Everything Postgres and SQLite render identically lives here; the dialect
//! modules keep only what genuinely differs (inserts, merges, truncation).
//! All functions take the dialect explicitly so placeholder and quoting
//! conventions stay consistent with the calling builder.

use sqlforge_core::{DbField, Dialect, Error, Result, normalize_ident, quote_ident, quote_table};

use crate::builder::ResolvedCommand;
use crate::clause::OrderField;

/// Comma-joined quoted column list.
pub(crate) fn field_list(fields: &[DbField], dialect: Dialect) -> String {
    fields
        .iter()
        .map(|f| quote_ident(&f.name, dialect))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `" WHERE ..."` for a non-empty filter tree, empty string otherwise.
pub(crate) fn where_clause(cmd: &ResolvedCommand<'_>, dialect: Dialect, position: &mut usize) -> String {
    match cmd.where_group {
        Some(group) if !group.is_empty() => {
            format!(" WHERE {}", group.to_sql(dialect, position))
        }
        _ => String::new(),
    }
}

/// `" ORDER BY ..."` for a non-empty order list, empty string otherwise.
pub(crate) fn order_clause(order_by: &[OrderField], dialect: Dialect) -> String {
    if order_by.is_empty() {
        return String::new();
    }
    let terms: Vec<String> = order_by.iter().map(|o| o.to_sql(dialect)).collect();
    format!(" ORDER BY {}", terms.join(", "))
}

/// Reject hints for dialects without hint syntax.
pub(crate) fn reject_hints(cmd: &ResolvedCommand<'_>, dialect: Dialect) -> Result<()> {
    if cmd.hints.is_some() {
        return Err(Error::HintsNotSupported { dialect });
    }
    Ok(())
}

/// Fields the caller may send values for.
pub(crate) fn writable_fields<'a>(cmd: &ResolvedCommand<'a>) -> Vec<&'a DbField> {
    cmd.fields.iter().filter(|f| f.is_writable()).collect()
}

/// Whether `name` matches any of `names`, case/quote-insensitively.
pub(crate) fn name_in(name: &str, names: &[String]) -> bool {
    let normalized = normalize_ident(name);
    names.iter().any(|n| normalize_ident(n) == normalized)
}

/// `($1, $2), ($3, $4), ...`: `rows` groups of `columns` placeholders with
/// continuous numbering.
pub(crate) fn values_rows(columns: usize, rows: usize, dialect: Dialect) -> String {
    let mut groups = Vec::with_capacity(rows);
    let mut position = 1;
    for _ in 0..rows {
        let placeholders: Vec<String> = (position..position + columns)
            .map(|i| dialect.placeholder(i))
            .collect();
        position += columns;
        groups.push(format!("({})", placeholders.join(", ")));
    }
    groups.join(", ")
}

/// SELECT with optional filter, ordering, and row limit.
pub(crate) fn build_query(cmd: &ResolvedCommand<'_>, dialect: Dialect) -> Result<String> {
    if cmd.fields.is_empty() {
        return Err(Error::EmptyFields {
            table: cmd.table.to_string(),
        });
    }
    let table = quote_table(cmd.table, dialect)?;
    let mut position = 1;
    let mut sql = format!(
        "SELECT {} FROM {}{}{}",
        field_list(cmd.fields, dialect),
        table,
        where_clause(cmd, dialect, &mut position),
        order_clause(cmd.order_by, dialect),
    );
    if let Some(top) = cmd.top {
        sql.push_str(&format!(" LIMIT {}", top));
    }
    Ok(sql)
}

/// Paged SELECT by page number; ordering is mandatory.
pub(crate) fn build_batch_query(cmd: &ResolvedCommand<'_>, dialect: Dialect) -> Result<String> {
    if cmd.order_by.is_empty() {
        return Err(Error::OrderByRequired {
            table: cmd.table.to_string(),
        });
    }
    let rows = cmd.rows_per_batch.unwrap_or(10);
    let page = cmd.page.unwrap_or(0);
    let base = build_query(&ResolvedCommand { top: None, ..*cmd }, dialect)?;
    Ok(format!("{} LIMIT {} OFFSET {}", base, rows, page * rows))
}

/// Paged SELECT by skip count; ordering is mandatory.
///
/// `missing_limit` is rendered when the dialect cannot express OFFSET
/// without LIMIT (SQLite wants `LIMIT -1`).
pub(crate) fn build_skip_query(
    cmd: &ResolvedCommand<'_>,
    dialect: Dialect,
    missing_limit: Option<&str>,
) -> Result<String> {
    if cmd.order_by.is_empty() {
        return Err(Error::OrderByRequired {
            table: cmd.table.to_string(),
        });
    }
    let mut sql = build_query(&ResolvedCommand { top: None, ..*cmd }, dialect)?;
    match (cmd.top, missing_limit) {
        (Some(top), _) => sql.push_str(&format!(" LIMIT {}", top)),
        (None, Some(fallback)) => sql.push_str(&format!(" LIMIT {}", fallback)),
        (None, None) => {}
    }
    sql.push_str(&format!(" OFFSET {}", cmd.skip.unwrap_or(0)));
    Ok(sql)
}

/// `SELECT COUNT(*) AS "CountValue" ...`.
pub(crate) fn build_count(cmd: &ResolvedCommand<'_>, dialect: Dialect) -> Result<String> {
    let table = quote_table(cmd.table, dialect)?;
    let mut position = 1;
    Ok(format!(
        "SELECT COUNT(*) AS {} FROM {}{}",
        quote_ident("CountValue", dialect),
        table,
        where_clause(cmd, dialect, &mut position),
    ))
}

/// `SELECT 1 AS "ExistsValue" ... LIMIT 1`.
pub(crate) fn build_exists(cmd: &ResolvedCommand<'_>, dialect: Dialect) -> Result<String> {
    let table = quote_table(cmd.table, dialect)?;
    let mut position = 1;
    Ok(format!(
        "SELECT 1 AS {} FROM {}{} LIMIT 1",
        quote_ident("ExistsValue", dialect),
        table,
        where_clause(cmd, dialect, &mut position),
    ))
}

/// `SELECT {func}("field") AS "{alias}" ...` over exactly one target field.
pub(crate) fn build_aggregate(
    cmd: &ResolvedCommand<'_>,
    dialect: Dialect,
    func: &str,
    alias: &str,
) -> Result<String> {
    let Some(field) = cmd.fields.first() else {
        return Err(Error::EmptyFields {
            table: cmd.table.to_string(),
        });
    };
    let table = quote_table(cmd.table, dialect)?;
    let mut position = 1;
    Ok(format!(
        "SELECT {}({}) AS {} FROM {}{}",
        func,
        quote_ident(&field.name, dialect),
        quote_ident(alias, dialect),
        table,
        where_clause(cmd, dialect, &mut position),
    ))
}

/// `DELETE FROM ...` with an optional filter tree.
pub(crate) fn build_delete(cmd: &ResolvedCommand<'_>, dialect: Dialect) -> Result<String> {
    let table = quote_table(cmd.table, dialect)?;
    let mut position = 1;
    Ok(format!(
        "DELETE FROM {}{}",
        table,
        where_clause(cmd, dialect, &mut position),
    ))
}

/// Key-matched equality conditions: `"k1" = $n AND "k2" = $n+1`.
fn key_match(keys: &[&DbField], dialect: Dialect, position: &mut usize) -> String {
    let mut parts = Vec::with_capacity(keys.len());
    for key in keys {
        parts.push(format!(
            "{} = {}",
            quote_ident(&key.name, dialect),
            dialect.placeholder(*position)
        ));
        *position += 1;
    }
    parts.join(" AND ")
}

/// UPDATE with SET over writable non-key fields; matched by the filter tree
/// when present, by the reconciled key fields otherwise.
pub(crate) fn build_update(cmd: &ResolvedCommand<'_>, dialect: Dialect) -> Result<String> {
    let key_names: Vec<String> = cmd.key_fields.iter().map(|k| k.name.clone()).collect();
    let set_fields: Vec<&DbField> = writable_fields(cmd)
        .into_iter()
        .filter(|f| !name_in(&f.name, &key_names))
        .collect();
    if set_fields.is_empty() {
        return Err(Error::EmptyFields {
            table: cmd.table.to_string(),
        });
    }

    let table = quote_table(cmd.table, dialect)?;
    let mut position = 1;
    let sets: Vec<String> = set_fields
        .iter()
        .map(|f| {
            let clause = format!(
                "{} = {}",
                quote_ident(&f.name, dialect),
                dialect.placeholder(position)
            );
            position += 1;
            clause
        })
        .collect();

    let filtered = where_clause(cmd, dialect, &mut position);
    if !filtered.is_empty() {
        return Ok(format!("UPDATE {} SET {}{}", table, sets.join(", "), filtered));
    }
    if cmd.key_fields.is_empty() {
        return Err(Error::KeyFieldsNotFound {
            table: cmd.table.to_string(),
        });
    }
    tracing::trace!(table = cmd.table, "update matching on reconciled key fields");
    let keys: Vec<&DbField> = cmd.key_fields.iter().collect();
    Ok(format!(
        "UPDATE {} SET {} WHERE {}",
        table,
        sets.join(", "),
        key_match(&keys, dialect, &mut position),
    ))
}

/// Qualifier-matched UPDATE; qualifiers default to the reconciled keys.
pub(crate) fn build_update_all(cmd: &ResolvedCommand<'_>, dialect: Dialect) -> Result<String> {
    let qualifier_names: Vec<String> = if cmd.qualifiers.is_empty() {
        cmd.key_fields.iter().map(|k| k.name.clone()).collect()
    } else {
        cmd.qualifiers.to_vec()
    };
    if qualifier_names.is_empty() {
        return Err(Error::KeyFieldsNotFound {
            table: cmd.table.to_string(),
        });
    }

    let set_fields: Vec<&DbField> = writable_fields(cmd)
        .into_iter()
        .filter(|f| !name_in(&f.name, &qualifier_names))
        .collect();
    if set_fields.is_empty() {
        return Err(Error::EmptyFields {
            table: cmd.table.to_string(),
        });
    }

    let table = quote_table(cmd.table, dialect)?;
    let mut position = 1;
    let sets: Vec<String> = set_fields
        .iter()
        .map(|f| {
            let clause = format!(
                "{} = {}",
                quote_ident(&f.name, dialect),
                dialect.placeholder(position)
            );
            position += 1;
            clause
        })
        .collect();
    let matches: Vec<String> = qualifier_names
        .iter()
        .map(|q| {
            let clause = format!(
                "{} = {}",
                quote_ident(q, dialect),
                dialect.placeholder(position)
            );
            position += 1;
            clause
        })
        .collect();
    Ok(format!(
        "UPDATE {} SET {} WHERE {}",
        table,
        sets.join(", "),
        matches.join(" AND "),
    ))
}
