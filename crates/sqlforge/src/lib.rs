//! SQLForge: schema-aware SQL command text generation with key-field
//! reconciliation.
//!
//! SQLForge turns a logical database operation ("query table T with filter
//! F", "insert rows with these fields", "merge on these qualifiers") into
//! dialect-specific SQL text, transparently resolving discrepancies between
//! code-level key declarations and the live introspected schema, and
//! memoizing everything that is expensive along the way.
//!
//! # Architecture
//!
//! - [`sqlforge_core`]: schema descriptors, entity metadata, provider
//!   contracts, errors.
//! - [`sqlforge_query`]: filter/order trees, the [`StatementBuilder`]
//!   contract, PostgreSQL and SQLite builders.
//! - [`sqlforge_cache`]: the [`Request`] value model, schema/attribute
//!   caches, key-field reconciliation, and the [`CommandTextCache`].
//!
//! This facade re-exports the public surface of all three.
//!
//! # Example
//!
//! ```ignore
//! use sqlforge::prelude::*;
//!
//! let cache = CommandTextCache::new(my_schema_provider, Arc::new(EntityRegistry::new()));
//! let request = Request::query("heroes")
//!     .fields(["Id", "Name"])
//!     .where_group(QueryGroup::all(vec![QueryField::new("Age", Operation::GreaterThan, 18)]))
//!     .top(10);
//! let sql = cache.query_text(&connection, None, &request)?;
//! ```

pub use sqlforge_cache::{
    AttributeCache, CacheSnapshot, CommandTextCache, Request, SchemaCache, filter_fields,
    resolve_key_fields, validate_order_fields, validate_qualifiers,
};
pub use sqlforge_core::{
    AttributeProvider, ClassProperty, Connection, Cx, DbField, DbFieldCollection, Dialect,
    EntityRegistry, EntityShape, Error, KeyColumnReturnBehavior, Outcome, Result, SchemaProvider,
    SqlType, Transaction, Value, is_valid_ident, normalize_ident, quote_ident, quote_table,
    unquote_ident,
};
pub use sqlforge_query::{
    CommandKind, Conjunction, Operation, Order, OrderField, PostgresStatementBuilder, QueryField,
    QueryGroup, ResolvedCommand, SqliteStatementBuilder, StatementBuilder, default_builder,
};

/// Everything most applications need.
pub mod prelude {
    pub use crate::{
        ClassProperty, CommandKind, CommandTextCache, Connection, Cx, DbField, DbFieldCollection,
        Dialect, EntityRegistry, EntityShape, Error, KeyColumnReturnBehavior, Operation, Order,
        OrderField, Outcome, QueryField, QueryGroup, Request, Result, SchemaProvider, SqlType,
        StatementBuilder, Transaction, Value,
    };
}
