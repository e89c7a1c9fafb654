//! Target-field filtering and order-field validation.

use sqlforge_core::{DbField, DbFieldCollection, Error, Result};
use sqlforge_query::OrderField;

/// Keep only requested fields that exist in schema, preserving request order.
///
/// Non-existent names are dropped silently: callers routinely pass a field
/// list derived from a class shape wider than the physical table, and
/// dropping a computed or non-persisted member from a write is safer than
/// failing the whole operation. An empty request list returns empty; the
/// caller wants "all fields" and downstream decides that default.
#[must_use]
pub fn filter_fields(requested: &[String], schema: &DbFieldCollection) -> Vec<DbField> {
    requested
        .iter()
        .filter_map(|name| schema.get(name).cloned())
        .collect()
}

/// Fail when any order-by field has no schema counterpart.
///
/// Unlike target-field filtering, silently dropping an ordering column would
/// silently change result ordering, a programming error the caller must see
/// immediately. The error names every unmatched field at once.
pub fn validate_order_fields(
    order_by: &[OrderField],
    schema: &DbFieldCollection,
    table: &str,
) -> Result<()> {
    let missing: Vec<String> = order_by
        .iter()
        .filter(|o| !schema.contains(&o.field))
        .map(|o| o.field.clone())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingFields {
            table: table.to_string(),
            fields: missing,
        })
    }
}

/// Fail when any merge/update-all qualifier has no schema counterpart.
///
/// A qualifier that matches nothing would silently change which rows a merge
/// targets, so qualifiers get the strict treatment order fields get.
pub fn validate_qualifiers(
    qualifiers: &[String],
    schema: &DbFieldCollection,
    table: &str,
) -> Result<()> {
    let missing: Vec<String> = qualifiers
        .iter()
        .filter(|q| !schema.contains(q))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingFields {
            table: table.to_string(),
            fields: missing,
        })
    }
}
