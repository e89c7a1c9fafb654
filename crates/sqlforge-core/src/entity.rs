//! Entity-shape descriptors for attribute metadata lookup.

use std::any::TypeId;

/// A statically-known entity type, used to look up code-level key declarations.
///
/// Schema-less (table-name-only) operations simply carry no shape; every
/// consumer of `Option<EntityShape>` short-circuits to schema-only resolution
/// when the shape is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityShape {
    type_id: TypeId,
    type_name: &'static str,
}

impl EntityShape {
    /// The shape of a concrete Rust type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Stable identity of the underlying type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Human-readable type name, for diagnostics only.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// A declared entity property plus its database column mapping.
///
/// Only the mapping matters to this layer: reconciliation uses the mapped
/// column name to find the schema field an entity-level primary/identity
/// annotation refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassProperty {
    /// The property name as declared on the entity.
    pub name: String,
    /// The database column the property maps to, when it differs from `name`.
    pub column: Option<String>,
}

impl ClassProperty {
    /// A property whose column name equals the property name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: None,
        }
    }

    /// A property with an explicit column mapping.
    pub fn mapped(name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: Some(column.into()),
        }
    }

    /// The column name this property resolves to in schema.
    #[must_use]
    pub fn mapped_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Customer;
    struct Order;

    #[test]
    fn test_shape_identity() {
        assert_eq!(EntityShape::of::<Customer>(), EntityShape::of::<Customer>());
        assert_ne!(EntityShape::of::<Customer>(), EntityShape::of::<Order>());
    }

    #[test]
    fn test_shape_name() {
        assert!(EntityShape::of::<Customer>().type_name().ends_with("Customer"));
    }

    #[test]
    fn test_mapped_name_defaults_to_property_name() {
        let prop = ClassProperty::new("Id");
        assert_eq!(prop.mapped_name(), "Id");
    }

    #[test]
    fn test_mapped_name_prefers_mapping() {
        let prop = ClassProperty::mapped("Code", "Id");
        assert_eq!(prop.mapped_name(), "Id");
    }
}
