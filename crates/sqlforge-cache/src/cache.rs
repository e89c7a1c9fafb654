//! The request-keyed command-text cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use asupersync::{Cx, Outcome};
use serde::Serialize;
use sqlforge_core::{
    AttributeProvider, Connection, DbField, DbFieldCollection, Dialect, Error,
    KeyColumnReturnBehavior, Result, SchemaProvider, Transaction,
};
use sqlforge_query::{CommandKind, ResolvedCommand, StatementBuilder, default_builder};

use crate::attribute_cache::AttributeCache;
use crate::reconcile;
use crate::request::Request;
use crate::schema_cache::SchemaCache;
use crate::validate;

/// A point-in-time view of cache effectiveness.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSnapshot {
    /// Distinct requests with memoized text.
    pub tracked: usize,
    /// Lookups served from memoized text.
    pub hits: u64,
    /// Lookups that ran the resolution pipeline.
    pub misses: u64,
}

/// Generate the per-kind sync/async text accessors.
macro_rules! per_kind_text {
    ($(($kind:ident, $sync:ident, $async_fn:ident)),* $(,)?) => {
        $(
            #[doc = concat!("Memoized text for a [`CommandKind::", stringify!($kind), "`] request.")]
            pub fn $sync(
                &self,
                connection: &C,
                transaction: Option<&dyn Transaction>,
                request: &Request,
            ) -> Result<Arc<str>> {
                debug_assert_eq!(request.kind, CommandKind::$kind);
                self.text(connection, transaction, request)
            }

            #[doc = concat!("Async memoized text for a [`CommandKind::", stringify!($kind), "`] request.")]
            pub async fn $async_fn(
                &self,
                cx: &Cx,
                connection: &C,
                transaction: Option<&dyn Transaction>,
                request: &Request,
            ) -> Outcome<Arc<str>, Error> {
                debug_assert_eq!(request.kind, CommandKind::$kind);
                self.text_async(cx, connection, transaction, request).await
            }
        )*
    };
}

/// Memoizes generated command text per [`Request`].
///
/// On a hit the text returns immediately. On a miss the cache pulls schema
/// and attribute metadata, reconciles key fields, validates target and order
/// fields, delegates to the dialect's statement builder, and memoizes the
/// result under the request key.
///
/// # Concurrency
///
/// The memoization map is compute-if-absent without single-flight: threads
/// missing the same request concurrently may each run the resolution
/// pipeline, but exactly one text is retained and every caller observes a
/// consistent value. This is sound because resolution is a pure function of
/// (schema, attributes, request) with no external side effects; keep it
/// that way, or add true single-flight before making resolution impure.
/// Flushing races harmlessly with readers, who simply repopulate.
///
/// Nothing is cached when validation or the builder fails; errors always
/// re-run the pipeline.
pub struct CommandTextCache<C: Connection, S: SchemaProvider<C>> {
    schema: SchemaCache<C, S>,
    attributes: AttributeCache,
    builders: RwLock<HashMap<Dialect, Arc<dyn StatementBuilder>>>,
    behavior: KeyColumnReturnBehavior,
    texts: RwLock<HashMap<Request, Arc<str>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<C: Connection, S: SchemaProvider<C>> CommandTextCache<C, S> {
    /// Create a cache over the two metadata providers, with the bundled
    /// statement builders pre-registered.
    pub fn new(schema_provider: S, attribute_provider: Arc<dyn AttributeProvider>) -> Self {
        let mut builders: HashMap<Dialect, Arc<dyn StatementBuilder>> = HashMap::new();
        for dialect in [Dialect::Postgres, Dialect::Sqlite, Dialect::Mysql] {
            if let Some(builder) = default_builder(dialect) {
                builders.insert(dialect, builder);
            }
        }
        Self {
            schema: SchemaCache::new(schema_provider),
            attributes: AttributeCache::new(attribute_provider),
            builders: RwLock::new(builders),
            behavior: KeyColumnReturnBehavior::default(),
            texts: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Select the key-column return behavior used by reconciliation.
    #[must_use]
    pub fn with_behavior(mut self, behavior: KeyColumnReturnBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Register (or replace) the statement builder for its dialect.
    pub fn register_builder(&self, builder: Arc<dyn StatementBuilder>) {
        self.builders.write().unwrap().insert(builder.dialect(), builder);
    }

    /// The schema cache, for independent flushing.
    pub fn schema_cache(&self) -> &SchemaCache<C, S> {
        &self.schema
    }

    /// The attribute cache, for independent flushing.
    pub fn attribute_cache(&self) -> &AttributeCache {
        &self.attributes
    }

    fn lookup(&self, request: &Request) -> Option<Arc<str>> {
        let text = self.texts.read().unwrap().get(request).cloned();
        if text.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(table = request.name.as_str(), "command text cache hit");
        }
        text
    }

    /// Memoized command text for any request kind.
    #[tracing::instrument(level = "debug", skip(self, connection, transaction, request), fields(table = request.name.as_str()))]
    pub fn text(
        &self,
        connection: &C,
        transaction: Option<&dyn Transaction>,
        request: &Request,
    ) -> Result<Arc<str>> {
        if let Some(text) = self.lookup(request) {
            return Ok(text);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let schema = self.schema.get(connection, &request.name, transaction)?;
        self.resolve_and_store(request, &schema)
    }

    /// Async variant of [`CommandTextCache::text`] with cancellation.
    ///
    /// Cancellation only applies before text is produced; once memoized, a
    /// cancelled caller has no effect on other in-flight callers for the
    /// same key.
    #[tracing::instrument(level = "debug", skip(self, cx, connection, transaction, request), fields(table = request.name.as_str()))]
    pub async fn text_async(
        &self,
        cx: &Cx,
        connection: &C,
        transaction: Option<&dyn Transaction>,
        request: &Request,
    ) -> Outcome<Arc<str>, Error> {
        if let Some(text) = self.lookup(request) {
            return Outcome::Ok(text);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let schema = match self
            .schema
            .get_async(cx, connection, &request.name, transaction)
            .await
        {
            Outcome::Ok(schema) => schema,
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        };
        match self.resolve_and_store(request, &schema) {
            Ok(text) => Outcome::Ok(text),
            Err(e) => Outcome::Err(e),
        }
    }

    /// Run the full resolution pipeline and memoize the result.
    fn resolve_and_store(
        &self,
        request: &Request,
        schema: &DbFieldCollection,
    ) -> Result<Arc<str>> {
        let fields: Vec<DbField> = if request.fields.is_empty() {
            schema.as_slice().to_vec()
        } else {
            validate::filter_fields(&request.fields, schema)
        };
        validate::validate_order_fields(&request.order_by, schema, &request.name)?;
        validate::validate_qualifiers(&request.qualifiers, schema, &request.name)?;

        let key_fields: Vec<DbField> = if request.kind.is_write() {
            reconcile::resolve_key_fields(
                request.entity.as_ref(),
                schema,
                &self.attributes,
                self.behavior,
            )
        } else {
            Vec::new()
        };

        let builder = self
            .builders
            .read()
            .unwrap()
            .get(&request.dialect)
            .cloned()
            .ok_or(Error::NoBuilder {
                dialect: request.dialect,
            })?;

        let cmd = ResolvedCommand {
            table: &request.name,
            fields: &fields,
            key_fields: &key_fields,
            where_group: request.where_group.as_ref(),
            order_by: &request.order_by,
            hints: request.hints.as_deref(),
            top: request.top,
            page: request.page,
            rows_per_batch: request.rows_per_batch,
            skip: request.skip,
            batch_size: request.batch_size,
            qualifiers: &request.qualifiers,
        };
        let text = builder.build(request.kind, &cmd)?;

        // Concurrent misses race to this insert; the first text wins and all
        // callers share the retained one.
        let mut texts = self.texts.write().unwrap();
        let entry = texts
            .entry(request.clone())
            .or_insert_with(|| Arc::from(text));
        Ok(Arc::clone(entry))
    }

    /// Clear all memoized text.
    ///
    /// The schema and attribute caches are untouched; flush those through
    /// [`CommandTextCache::schema_cache`] and
    /// [`CommandTextCache::attribute_cache`] when the underlying metadata
    /// itself has changed.
    pub fn flush(&self) {
        let dropped = {
            let mut texts = self.texts.write().unwrap();
            let dropped = texts.len();
            texts.clear();
            dropped
        };
        tracing::info!(dropped = dropped, "flushed command text cache");
    }

    /// Current cache statistics.
    #[must_use]
    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            tracked: self.texts.read().unwrap().len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    per_kind_text! {
        (Query, query_text, query_text_async),
        (QueryAll, query_all_text, query_all_text_async),
        (BatchQuery, batch_query_text, batch_query_text_async),
        (SkipQuery, skip_query_text, skip_query_text_async),
        (Insert, insert_text, insert_text_async),
        (InsertAll, insert_all_text, insert_all_text_async),
        (Update, update_text, update_text_async),
        (UpdateAll, update_all_text, update_all_text_async),
        (Merge, merge_text, merge_text_async),
        (MergeAll, merge_all_text, merge_all_text_async),
        (Delete, delete_text, delete_text_async),
        (DeleteAll, delete_all_text, delete_all_text_async),
        (Count, count_text, count_text_async),
        (CountAll, count_all_text, count_all_text_async),
        (Exists, exists_text, exists_text_async),
        (Average, average_text, average_text_async),
        (AverageAll, average_all_text, average_all_text_async),
        (Max, max_text, max_text_async),
        (MaxAll, max_all_text, max_all_text_async),
        (Min, min_text, min_text_async),
        (MinAll, min_all_text, min_all_text_async),
        (Sum, sum_text, sum_text_async),
        (SumAll, sum_all_text, sum_all_text_async),
        (Truncate, truncate_text, truncate_text_async),
        (QueryMultiple, query_multiple_text, query_multiple_text_async),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlforge_core::{ClassProperty, EntityRegistry, SqlType};
    use std::sync::atomic::AtomicUsize;

    struct Hero;

    struct FakeConnection {
        dialect: Dialect,
        database: String,
    }

    impl Connection for FakeConnection {
        fn dialect(&self) -> Dialect {
            self.dialect
        }

        fn database(&self) -> &str {
            &self.database
        }
    }

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    impl SchemaProvider<FakeConnection> for CountingProvider {
        fn get_fields(
            &self,
            _connection: &FakeConnection,
            _table: &str,
            _transaction: Option<&dyn Transaction>,
        ) -> Result<DbFieldCollection> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(DbFieldCollection::new(vec![
                DbField::new("Id", SqlType::BigInt).primary(true).identity(true),
                DbField::new("Name", SqlType::Text),
                DbField::new("Age", SqlType::Integer),
            ]))
        }
    }

    fn cache() -> (Arc<AtomicUsize>, CommandTextCache<FakeConnection, CountingProvider>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CountingProvider {
            calls: Arc::clone(&calls),
        };
        (calls, CommandTextCache::new(provider, Arc::new(EntityRegistry::new())))
    }

    fn conn() -> FakeConnection {
        FakeConnection {
            dialect: Dialect::Postgres,
            database: "app".to_string(),
        }
    }

    #[test]
    fn test_memoization_equal_requests_share_text() {
        let (calls, cache) = cache();
        let connection = conn();
        let a = Request::query_all("heroes");
        let b = Request::query_all("heroes");

        let first = cache.text(&connection, None, &a).unwrap();
        let second = cache.text(&connection, None, &b).unwrap();
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.tracked, 1);
        assert_eq!(snapshot.hits, 1);
        assert_eq!(snapshot.misses, 1);
    }

    #[test]
    fn test_insert_scenario_resolves_fields_and_key() {
        // Schema [Id(pk, identity), Name, Age]; no attribute metadata;
        // requested fields include a ghost column
        let (_, cache) = cache();
        let connection = conn();
        let request = Request::insert("heroes").fields(["Name", "Age", "Ghost"]);

        let text = cache.insert_text(&connection, None, &request).unwrap();
        assert_eq!(
            &*text,
            "INSERT INTO \"heroes\" (\"Name\", \"Age\") VALUES ($1, $2) RETURNING \"Id\""
        );
    }

    #[test]
    fn test_order_field_validation_fails_and_is_not_cached() {
        let (_, cache) = cache();
        let connection = conn();
        let request = Request::query("heroes").order_by([
            sqlforge_query::OrderField::ascending("Ghost"),
        ]);

        assert!(cache.text(&connection, None, &request).is_err());
        assert_eq!(cache.snapshot().tracked, 0);
    }

    #[test]
    fn test_flush_clears_only_text() {
        let (calls, cache) = cache();
        let connection = conn();
        let request = Request::count_all("heroes");

        cache.text(&connection, None, &request).unwrap();
        cache.flush();
        assert_eq!(cache.snapshot().tracked, 0);

        // Schema cache survives the text flush: no new introspection
        cache.text(&connection, None, &request).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_builder_for_dialect() {
        let (_, cache) = cache();
        let connection = conn();
        let request = Request::query_all("heroes").dialect(Dialect::Mysql);
        let err = cache.text(&connection, None, &request).unwrap_err();
        assert!(matches!(err, Error::NoBuilder { dialect: Dialect::Mysql }));
    }

    #[test]
    fn test_attribute_declared_primary_reaches_builder() {
        // Schema marks nothing primary; the entity declares Code as primary
        struct PlainProvider;
        impl SchemaProvider<FakeConnection> for PlainProvider {
            fn get_fields(
                &self,
                _connection: &FakeConnection,
                _table: &str,
                _transaction: Option<&dyn Transaction>,
            ) -> Result<DbFieldCollection> {
                Ok(DbFieldCollection::new(vec![
                    DbField::new("Code", SqlType::Text),
                    DbField::new("Name", SqlType::Text),
                ]))
            }
        }

        let registry = EntityRegistry::new();
        registry.register::<Hero>(Some(ClassProperty::new("Code")), None);
        let cache = CommandTextCache::new(PlainProvider, Arc::new(registry));
        let connection = conn();

        let request = Request::update("lookup").entity::<Hero>();
        let text = cache.update_text(&connection, None, &request).unwrap();
        assert_eq!(
            &*text,
            "UPDATE \"lookup\" SET \"Name\" = $1 WHERE \"Code\" = $2"
        );
    }

    #[test]
    fn test_concurrent_misses_converge_on_one_text() {
        let (_, cache) = cache();
        let connection = conn();
        let cache = &cache;
        let connection = &connection;

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(move || {
                        let request = Request::query_all("heroes");
                        cache.text(connection, None, &request).unwrap()
                    })
                })
                .collect();
            let texts: Vec<Arc<str>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            let first = &texts[0];
            assert!(texts.iter().all(|t| t == first));
        });

        assert_eq!(cache.snapshot().tracked, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let (_, cache) = cache();
        let json = serde_json::to_string(&cache.snapshot()).unwrap();
        assert!(json.contains("\"tracked\":0"));
    }
}
