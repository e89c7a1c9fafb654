//! Attribute-versus-schema key reconciliation through the public surface.

use std::sync::Arc;

use sqlforge::prelude::*;
use sqlforge::{AttributeCache, resolve_key_fields};

struct Hero;
struct Document;

fn registry() -> EntityRegistry {
    EntityRegistry::new()
}

fn attributes(registry: EntityRegistry) -> AttributeCache {
    AttributeCache::new(Arc::new(registry))
}

#[test]
fn schema_only_resolution_without_entity_shape() {
    let schema = DbFieldCollection::new(vec![
        DbField::new("Id", SqlType::BigInt).primary(true).identity(true),
        DbField::new("Name", SqlType::Text),
    ]);
    let attributes = attributes(registry());

    let keys = resolve_key_fields(None, &schema, &attributes, KeyColumnReturnBehavior::default());
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].name, "Id");
}

#[test]
fn attribute_primary_wins_over_unmarked_schema() {
    // Property Code maps to column Code, which schema does not mark primary
    let schema = DbFieldCollection::new(vec![
        DbField::new("Code", SqlType::Text),
        DbField::new("Title", SqlType::Text),
    ]);
    let registry = registry();
    registry.register::<Document>(Some(ClassProperty::new("Code")), None);
    let attributes = attributes(registry);
    let shape = EntityShape::of::<Document>();

    let keys = resolve_key_fields(
        Some(&shape),
        &schema,
        &attributes,
        KeyColumnReturnBehavior::default(),
    );
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].name, "Code");
    assert!(keys[0].is_primary);
}

#[test]
fn mapped_primary_onto_already_primary_column_changes_nothing() {
    // Property Code maps to Id, which is already primary: reconciliation
    // must neither duplicate nor reorder anything
    let schema = DbFieldCollection::new(vec![
        DbField::new("Id", SqlType::BigInt).primary(true).identity(true),
        DbField::new("Name", SqlType::Text),
        DbField::new("Age", SqlType::Integer),
    ]);
    let registry = registry();
    registry.register::<Hero>(Some(ClassProperty::mapped("Code", "Id")), None);
    let attributes = attributes(registry);
    let shape = EntityShape::of::<Hero>();

    let keys = resolve_key_fields(
        Some(&shape),
        &schema,
        &attributes,
        KeyColumnReturnBehavior::default(),
    );
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].name, "Id");
    assert_eq!(keys[0], *schema.get("Id").unwrap());
}

#[test]
fn tie_break_is_deterministic_regardless_of_declaration_order() {
    let forward = DbFieldCollection::new(vec![
        DbField::new("Code", SqlType::Text).primary(true),
        DbField::new("Seq", SqlType::BigInt).identity(true),
        DbField::new("Name", SqlType::Text),
    ]);
    let backward = DbFieldCollection::new(vec![
        DbField::new("Seq", SqlType::BigInt).identity(true),
        DbField::new("Code", SqlType::Text).primary(true),
        DbField::new("Name", SqlType::Text),
    ]);
    let attributes = attributes(registry());

    for schema in [&forward, &backward] {
        let keys = resolve_key_fields(
            None,
            schema,
            &attributes,
            KeyColumnReturnBehavior::PreferIdentity,
        );
        assert_eq!(keys[0].name, "Seq", "identity always leads the key list");
        assert_eq!(keys.len(), 2);
    }
}

#[test]
fn unmatched_declarations_never_error() {
    let schema = DbFieldCollection::new(vec![DbField::new("Note", SqlType::Text)]);
    let registry = registry();
    registry.register::<Document>(
        Some(ClassProperty::mapped("Key", "DoesNotExist")),
        Some(ClassProperty::new("AlsoMissing")),
    );
    let attributes = attributes(registry);
    let shape = EntityShape::of::<Document>();

    let keys = resolve_key_fields(
        Some(&shape),
        &schema,
        &attributes,
        KeyColumnReturnBehavior::default(),
    );
    assert!(keys.is_empty(), "degrades to keyless, not an error");
}

#[test]
fn reconciliation_is_idempotent() {
    let schema = DbFieldCollection::new(vec![
        DbField::new("Id", SqlType::BigInt),
        DbField::new("Name", SqlType::Text),
    ]);
    let registry = registry();
    registry.register::<Hero>(
        Some(ClassProperty::new("Id")),
        Some(ClassProperty::new("Id")),
    );
    let attributes = attributes(registry);
    let shape = EntityShape::of::<Hero>();

    let first = resolve_key_fields(
        Some(&shape),
        &schema,
        &attributes,
        KeyColumnReturnBehavior::default(),
    );
    let second = resolve_key_fields(
        Some(&shape),
        &schema,
        &attributes,
        KeyColumnReturnBehavior::default(),
    );
    assert_eq!(first, second);
    assert!(first[0].is_primary && first[0].is_identity && first[0].is_generated);
}
