//! Schema field descriptors and the per-table field collection.

use std::collections::HashMap;

use serde::Serialize;

use crate::dialect::Dialect;
use crate::identifiers::normalize_ident;
use crate::types::SqlType;

/// One column of live schema, as introspected from a database connection.
///
/// A `DbField` is immutable once constructed. When key-field reconciliation
/// needs to override a flag it produces a patched *copy* via [`DbField::as_primary`]
/// or [`DbField::as_identity`]; the original is never mutated in place, which is
/// what lets collections be shared read-only across threads without locks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbField {
    /// Column name as reported by the database.
    pub name: String,
    /// Whether this column is part of the primary key.
    pub is_primary: bool,
    /// Whether the database engine assigns this column's value (auto-increment).
    pub is_identity: bool,
    /// Whether this column accepts NULL.
    pub is_nullable: bool,
    /// Normalized declared type.
    pub sql_type: SqlType,
    /// Declared size (character length or byte width), when reported.
    pub size: Option<u32>,
    /// Precision for DECIMAL/NUMERIC columns.
    pub precision: Option<u8>,
    /// Scale for DECIMAL/NUMERIC columns.
    pub scale: Option<u8>,
    /// Raw vendor type name, carried through untouched.
    pub database_type: Option<String>,
    /// Whether the column has a server-side default value.
    pub has_default: bool,
    /// Whether the server computes this column's value; callers must never send it.
    pub is_generated: bool,
    /// The dialect this descriptor was introspected from.
    pub dialect: Dialect,
}

impl DbField {
    /// Create a new field descriptor with minimal required data.
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            is_primary: false,
            is_identity: false,
            is_nullable: false,
            sql_type,
            size: None,
            precision: None,
            scale: None,
            database_type: None,
            has_default: false,
            is_generated: false,
            dialect: Dialect::default(),
        }
    }

    /// Set the primary-key flag.
    #[must_use]
    pub fn primary(mut self, value: bool) -> Self {
        self.is_primary = value;
        self
    }

    /// Set the identity flag. Identity columns are server-generated.
    #[must_use]
    pub fn identity(mut self, value: bool) -> Self {
        self.is_identity = value;
        if value {
            self.is_generated = true;
        }
        self
    }

    /// Set the nullable flag.
    #[must_use]
    pub fn nullable(mut self, value: bool) -> Self {
        self.is_nullable = value;
        self
    }

    /// Set the declared size.
    #[must_use]
    pub fn size(mut self, value: u32) -> Self {
        self.size = Some(value);
        self
    }

    /// Set precision and scale for DECIMAL/NUMERIC columns.
    #[must_use]
    pub fn decimal_precision(mut self, precision: u8, scale: u8) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Set the raw vendor type name.
    #[must_use]
    pub fn database_type(mut self, value: impl Into<String>) -> Self {
        self.database_type = Some(value.into());
        self
    }

    /// Set the has-default flag.
    #[must_use]
    pub fn has_default(mut self, value: bool) -> Self {
        self.has_default = value;
        self
    }

    /// Set the server-generated flag.
    #[must_use]
    pub fn generated(mut self, value: bool) -> Self {
        self.is_generated = value;
        self
    }

    /// Set the dialect tag.
    #[must_use]
    pub fn dialect(mut self, value: Dialect) -> Self {
        self.dialect = value;
        self
    }

    /// Produce a patched copy flagged as primary.
    ///
    /// When `also_identity` is set (the attribute-declared primary property is
    /// also the declared identity), the copy is flagged identity and
    /// server-generated as well.
    #[must_use]
    pub fn as_primary(&self, also_identity: bool) -> Self {
        let mut patched = self.clone();
        patched.is_primary = true;
        if also_identity {
            patched.is_identity = true;
            patched.is_generated = true;
        }
        patched
    }

    /// Produce a patched copy flagged as identity and server-generated.
    #[must_use]
    pub fn as_identity(&self) -> Self {
        let mut patched = self.clone();
        patched.is_identity = true;
        patched.is_generated = true;
        patched
    }

    /// Whether this field qualifies as a key field.
    #[must_use]
    pub fn is_key(&self) -> bool {
        self.is_primary || self.is_identity
    }

    /// Whether a caller may send a value for this column on writes.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        !self.is_generated
    }

    /// Case/quote-insensitive name comparison.
    #[must_use]
    pub fn name_matches(&self, other: &str) -> bool {
        normalize_ident(&self.name) == normalize_ident(other)
    }
}

/// An ordered, name-indexed, immutable view over the fields of one table.
///
/// Lookup by name is case- and quote-insensitive: `"Id"`, `id`, and `[ID]`
/// all resolve to the same column. Collections are built once per
/// (dialect, database, table) and shared read-only for the process lifetime.
#[derive(Debug, Clone, Serialize)]
pub struct DbFieldCollection {
    fields: Vec<DbField>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl DbFieldCollection {
    /// Build a collection from introspected fields, preserving schema order.
    ///
    /// If two fields normalize to the same name, the first declaration wins.
    #[must_use]
    pub fn new(fields: Vec<DbField>) -> Self {
        let mut by_name = HashMap::with_capacity(fields.len());
        for (idx, field) in fields.iter().enumerate() {
            by_name.entry(normalize_ident(&field.name)).or_insert(idx);
        }
        Self { fields, by_name }
    }

    /// Look up a field by name, case/quote-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DbField> {
        self.by_name
            .get(&normalize_ident(name))
            .map(|&idx| &self.fields[idx])
    }

    /// Whether a field with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&normalize_ident(name))
    }

    /// The first field flagged primary, if any.
    #[must_use]
    pub fn get_primary(&self) -> Option<&DbField> {
        self.fields.iter().find(|f| f.is_primary)
    }

    /// The first field flagged identity, if any.
    #[must_use]
    pub fn get_identity(&self) -> Option<&DbField> {
        self.fields.iter().find(|f| f.is_identity)
    }

    /// All fields, in schema order.
    #[must_use]
    pub fn as_slice(&self) -> &[DbField] {
        &self.fields
    }

    /// Iterate fields in schema order.
    pub fn iter(&self) -> std::slice::Iter<'_, DbField> {
        self.fields.iter()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the collection holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a DbFieldCollection {
    type Item = &'a DbField;
    type IntoIter = std::slice::Iter<'a, DbField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl FromIterator<DbField> for DbFieldCollection {
    fn from_iter<I: IntoIterator<Item = DbField>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
