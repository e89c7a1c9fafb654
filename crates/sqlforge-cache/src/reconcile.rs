//! Key-field reconciliation.
//!
//! Code-level key declarations and live schema flags can disagree: an entity
//! may declare a primary key the schema does not mark, or an identity column
//! the schema reports as plain. Reconciliation merges both sources into one
//! consistent ordered key list using fixed precedence: attribute declarations
//! win over schema flags, and mismatches that cannot be resolved degrade to
//! "no key field" rather than erroring, since a keyless table is a valid
//! configuration for insert-only workloads.

use sqlforge_core::{DbField, DbFieldCollection, EntityShape, KeyColumnReturnBehavior};

use crate::attribute_cache::AttributeCache;

/// Resolve the ordered key-field list for one table.
///
/// Without an entity shape the key fields are exactly the schema-declared
/// primary/identity fields. With a shape, attribute-declared primary and
/// identity properties patch the matching schema fields (copies, never
/// in-place). The tie-break `behavior` then moves the single "return" field
/// (the one whose generated value is reported back after an insert or merge)
/// to the front; all other key fields stay in schema order for WHERE-clause
/// matching.
///
/// This function never fails and is idempotent: the same inputs always yield
/// field-for-field identical output.
#[must_use]
pub fn resolve_key_fields(
    entity: Option<&EntityShape>,
    schema: &DbFieldCollection,
    attributes: &AttributeCache,
    behavior: KeyColumnReturnBehavior,
) -> Vec<DbField> {
    let mut fields: Vec<DbField> = schema.iter().cloned().collect();

    if let Some(shape) = entity {
        let primary = attributes.primary(shape);
        let identity = attributes.identity(shape);

        if let Some(primary_prop) = &primary {
            let column = primary_prop.mapped_name();
            if let Some(index) = fields.iter().position(|f| f.name_matches(column)) {
                let also_identity = identity
                    .as_ref()
                    .is_some_and(|i| fields[index].name_matches(i.mapped_name()));
                if !fields[index].is_primary {
                    fields[index] = fields[index].as_primary(also_identity);
                }
            } else {
                // Declared keys without a physical counterpart are ignored;
                // views and schema-less tables legitimately hit this path.
                tracing::debug!(
                    entity = shape.type_name(),
                    column = column,
                    "attribute-declared primary has no schema counterpart"
                );
            }
        }

        if let Some(identity_prop) = &identity {
            let column = identity_prop.mapped_name();
            if let Some(index) = fields.iter().position(|f| f.name_matches(column)) {
                if !fields[index].is_identity {
                    fields[index] = fields[index].as_identity();
                }
            } else {
                tracing::debug!(
                    entity = shape.type_name(),
                    column = column,
                    "attribute-declared identity has no schema counterpart"
                );
            }
        }
    }

    let mut keys: Vec<DbField> = fields.into_iter().filter(DbField::is_key).collect();

    if keys.len() > 1 {
        let front = match behavior {
            KeyColumnReturnBehavior::PreferIdentity => keys.iter().position(|f| f.is_identity),
            KeyColumnReturnBehavior::PreferPrimary => keys.iter().position(|f| f.is_primary),
            KeyColumnReturnBehavior::FirstDeclared => None,
        };
        if let Some(position) = front {
            if position > 0 {
                let chosen = keys.remove(position);
                keys.insert(0, chosen);
            }
        }
    }

    keys
}
