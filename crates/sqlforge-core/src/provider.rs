//! Metadata provider contracts.
//!
//! These are the two independent sources of truth the command-text layer
//! reconciles: live schema introspected through a connection, and code-level
//! key declarations attached to an entity shape. Both are contracts here;
//! caching wrappers live in `sqlforge-cache`.

use crate::connection::{Connection, Transaction};
use crate::entity::{ClassProperty, EntityShape};
use crate::error::Result;
use crate::field::DbFieldCollection;
use crate::{Cx, Error, Outcome};

/// Introspects the column descriptors of a table over a live connection.
///
/// Implementations hit the database (the only blocking I/O in this
/// subsystem); results are cached by the caller per
/// (dialect, database, table), so `get_fields` should simply introspect and
/// return. Lookups are assumed idempotent; this layer adds no retry logic.
pub trait SchemaProvider<C: Connection>: Send + Sync {
    /// Fetch the ordered column descriptors of `table`.
    fn get_fields(
        &self,
        connection: &C,
        table: &str,
        transaction: Option<&dyn Transaction>,
    ) -> Result<DbFieldCollection>;

    /// Async variant of [`SchemaProvider::get_fields`] with cancellation.
    ///
    /// The default implementation delegates to the blocking variant, for
    /// providers whose introspection is not truly asynchronous.
    fn get_fields_async(
        &self,
        cx: &Cx,
        connection: &C,
        table: &str,
        transaction: Option<&dyn Transaction>,
    ) -> impl Future<Output = Outcome<DbFieldCollection, Error>> + Send {
        let _ = cx;
        let result = self.get_fields(connection, table, transaction);
        async move {
            match result {
                Ok(fields) => Outcome::Ok(fields),
                Err(e) => Outcome::Err(e),
            }
        }
    }
}

/// Resolves code-level key declarations for an entity shape.
///
/// Returns the declared primary property and declared identity property,
/// each independently optional. Implementations may be backed by generated
/// code or explicit registration; the reconciliation algorithm is agnostic.
pub trait AttributeProvider: Send + Sync {
    /// The attribute-declared primary property of `shape`, if any.
    fn primary(&self, shape: &EntityShape) -> Option<ClassProperty>;

    /// The attribute-declared identity property of `shape`, if any.
    fn identity(&self, shape: &EntityShape) -> Option<ClassProperty>;
}

/// Explicit-registration [`AttributeProvider`].
///
/// The batteries-included implementation: entity shapes register their
/// declared primary and identity properties up front, and lookups are plain
/// map reads. Registration is expected at startup; re-registering a shape
/// replaces its previous declarations.
#[derive(Default)]
pub struct EntityRegistry {
    entries: std::sync::RwLock<
        std::collections::HashMap<std::any::TypeId, (Option<ClassProperty>, Option<ClassProperty>)>,
    >,
}

impl EntityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the declared primary and identity properties of `T`.
    pub fn register<T: 'static>(
        &self,
        primary: Option<ClassProperty>,
        identity: Option<ClassProperty>,
    ) {
        let shape = EntityShape::of::<T>();
        tracing::debug!(entity = shape.type_name(), "registered entity key declarations");
        self.entries
            .write()
            .unwrap()
            .insert(shape.type_id(), (primary, identity));
    }
}

impl AttributeProvider for EntityRegistry {
    fn primary(&self, shape: &EntityShape) -> Option<ClassProperty> {
        self.entries
            .read()
            .unwrap()
            .get(&shape.type_id())
            .and_then(|(primary, _)| primary.clone())
    }

    fn identity(&self, shape: &EntityShape) -> Option<ClassProperty> {
        self.entries
            .read()
            .unwrap()
            .get(&shape.type_id())
            .and_then(|(_, identity)| identity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Person;
    struct Unregistered;

    #[test]
    fn test_registry_roundtrip() {
        let registry = EntityRegistry::new();
        registry.register::<Person>(
            Some(ClassProperty::new("Id")),
            Some(ClassProperty::new("Id")),
        );

        let shape = EntityShape::of::<Person>();
        assert_eq!(registry.primary(&shape).unwrap().mapped_name(), "Id");
        assert_eq!(registry.identity(&shape).unwrap().mapped_name(), "Id");
    }

    #[test]
    fn test_registry_unknown_shape() {
        let registry = EntityRegistry::new();
        let shape = EntityShape::of::<Unregistered>();
        assert!(registry.primary(&shape).is_none());
        assert!(registry.identity(&shape).is_none());
    }

    #[test]
    fn test_registry_partial_declaration() {
        let registry = EntityRegistry::new();
        registry.register::<Person>(Some(ClassProperty::mapped("Code", "Id")), None);

        let shape = EntityShape::of::<Person>();
        assert_eq!(registry.primary(&shape).unwrap().mapped_name(), "Id");
        assert!(registry.identity(&shape).is_none());
    }
}
