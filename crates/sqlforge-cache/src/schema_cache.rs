//! Process-wide schema metadata cache.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

use asupersync::{Cx, Outcome};
use sqlforge_core::{
    Connection, DbFieldCollection, Dialect, Error, Result, SchemaProvider, Transaction,
    normalize_ident,
};

/// Cache key: one table of one database in one dialect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SchemaKey {
    dialect: Dialect,
    database: String,
    table: String,
}

impl SchemaKey {
    fn new<C: Connection>(connection: &C, table: &str) -> Self {
        Self {
            dialect: connection.dialect(),
            database: connection.database().to_string(),
            table: normalize_ident(table),
        }
    }
}

/// Caches introspected [`DbFieldCollection`]s per (dialect, database, table).
///
/// Schema introspection is the only blocking I/O in this subsystem, so it is
/// cached aggressively: once a table's fields are known they are shared
/// read-only for the process lifetime, or until an explicit [`SchemaCache::flush`].
/// The compute-if-absent here is relaxed: two threads missing the same key
/// may both introspect, but exactly one collection is retained and every
/// caller observes a consistent value. Introspection is idempotent, so the
/// duplicate work is harmless.
pub struct SchemaCache<C: Connection, S: SchemaProvider<C>> {
    provider: S,
    tables: RwLock<HashMap<SchemaKey, Arc<DbFieldCollection>>>,
    _connection: PhantomData<fn(&C)>,
}

impl<C: Connection, S: SchemaProvider<C>> SchemaCache<C, S> {
    /// Wrap a provider in a cache.
    pub fn new(provider: S) -> Self {
        Self {
            provider,
            tables: RwLock::new(HashMap::new()),
            _connection: PhantomData,
        }
    }

    fn lookup(&self, key: &SchemaKey) -> Option<Arc<DbFieldCollection>> {
        self.tables.read().unwrap().get(key).cloned()
    }

    fn store(&self, key: SchemaKey, fields: DbFieldCollection) -> Arc<DbFieldCollection> {
        let mut tables = self.tables.write().unwrap();
        let entry = tables.entry(key).or_insert_with(|| Arc::new(fields));
        Arc::clone(entry)
    }

    /// The field collection for `table`, introspecting on first use.
    pub fn get(
        &self,
        connection: &C,
        table: &str,
        transaction: Option<&dyn Transaction>,
    ) -> Result<Arc<DbFieldCollection>> {
        let key = SchemaKey::new(connection, table);
        if let Some(fields) = self.lookup(&key) {
            return Ok(fields);
        }
        tracing::debug!(table = table, database = connection.database(), "introspecting schema");
        let fields = self.provider.get_fields(connection, table, transaction)?;
        Ok(self.store(key, fields))
    }

    /// Async variant of [`SchemaCache::get`] with cancellation.
    pub async fn get_async(
        &self,
        cx: &Cx,
        connection: &C,
        table: &str,
        transaction: Option<&dyn Transaction>,
    ) -> Outcome<Arc<DbFieldCollection>, Error> {
        let key = SchemaKey::new(connection, table);
        if let Some(fields) = self.lookup(&key) {
            return Outcome::Ok(fields);
        }
        tracing::debug!(table = table, database = connection.database(), "introspecting schema");
        match self
            .provider
            .get_fields_async(cx, connection, table, transaction)
            .await
        {
            Outcome::Ok(fields) => Outcome::Ok(self.store(key, fields)),
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }

    /// Number of cached tables.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.tables.read().unwrap().len()
    }

    /// Drop every cached collection; readers repopulate on next use.
    pub fn flush(&self) {
        tracing::info!("flushing schema cache");
        self.tables.write().unwrap().clear();
    }
}
