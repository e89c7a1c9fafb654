//! The typed request value describing one logical database operation.

use sqlforge_core::{Dialect, EntityShape};
use sqlforge_query::{CommandKind, OrderField, QueryGroup};

/// An immutable description of one logical database operation.
///
/// A `Request` is the cache key for generated command text, so its identity
/// is **content-based**: two requests with the same kind, table, field set,
/// filter structure, paging, ordering, and hints compare equal and hash
/// identically. Execution context (connection, transaction) is deliberately
/// not part of a request; it travels alongside the request into the cache
/// call, so a logically repeated operation hits the cache no matter which
/// connection carries it.
///
/// Construct with the per-kind constructors and builder-style setters:
///
/// ```ignore
/// let request = Request::query("heroes")
///     .entity::<Hero>()
///     .fields(["Id", "Name"])
///     .where_group(QueryGroup::all(vec![QueryField::new("Age", Operation::GreaterThan, 18)]))
///     .top(10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    /// The command kind this request describes.
    pub kind: CommandKind,
    /// Target table or view name.
    pub name: String,
    /// The dialect the generated text targets; selects the statement builder.
    pub dialect: Dialect,
    /// Statically-known entity type for attribute metadata lookup; absent for
    /// schema-less (table-name-only) operations.
    pub entity: Option<EntityShape>,
    /// Requested columns; empty means "all fields" and lets the schema decide.
    pub fields: Vec<String>,
    /// Filter tree for filtered kinds.
    pub where_group: Option<QueryGroup>,
    /// Ordering terms for read kinds.
    pub order_by: Vec<OrderField>,
    /// Dialect-specific query hints.
    pub hints: Option<String>,
    /// Row limit for query kinds.
    pub top: Option<usize>,
    /// Zero-based page number for batch queries.
    pub page: Option<usize>,
    /// Rows per batch for batch queries.
    pub rows_per_batch: Option<usize>,
    /// Rows to skip for skip queries.
    pub skip: Option<usize>,
    /// Row count for multi-row insert/merge.
    pub batch_size: Option<usize>,
    /// Fields used to match existing rows during merge and update-all.
    pub qualifiers: Vec<String>,
}

impl Request {
    /// A request of an arbitrary kind with only a table name set.
    pub fn new(kind: CommandKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            dialect: Dialect::default(),
            entity: None,
            fields: Vec::new(),
            where_group: None,
            order_by: Vec::new(),
            hints: None,
            top: None,
            page: None,
            rows_per_batch: None,
            skip: None,
            batch_size: None,
            qualifiers: Vec::new(),
        }
    }

    /// Filtered select.
    pub fn query(name: impl Into<String>) -> Self {
        Self::new(CommandKind::Query, name)
    }

    /// Unfiltered select.
    pub fn query_all(name: impl Into<String>) -> Self {
        Self::new(CommandKind::QueryAll, name)
    }

    /// Paged select by page number and batch size.
    pub fn batch_query(name: impl Into<String>) -> Self {
        Self::new(CommandKind::BatchQuery, name)
    }

    /// Paged select by skip count.
    pub fn skip_query(name: impl Into<String>) -> Self {
        Self::new(CommandKind::SkipQuery, name)
    }

    /// Single-row insert.
    pub fn insert(name: impl Into<String>) -> Self {
        Self::new(CommandKind::Insert, name)
    }

    /// Multi-row insert.
    pub fn insert_all(name: impl Into<String>) -> Self {
        Self::new(CommandKind::InsertAll, name)
    }

    /// Filtered or key-matched update.
    pub fn update(name: impl Into<String>) -> Self {
        Self::new(CommandKind::Update, name)
    }

    /// Qualifier-matched update.
    pub fn update_all(name: impl Into<String>) -> Self {
        Self::new(CommandKind::UpdateAll, name)
    }

    /// Single-row upsert.
    pub fn merge(name: impl Into<String>) -> Self {
        Self::new(CommandKind::Merge, name)
    }

    /// Multi-row upsert.
    pub fn merge_all(name: impl Into<String>) -> Self {
        Self::new(CommandKind::MergeAll, name)
    }

    /// Filtered delete.
    pub fn delete(name: impl Into<String>) -> Self {
        Self::new(CommandKind::Delete, name)
    }

    /// Unfiltered delete.
    pub fn delete_all(name: impl Into<String>) -> Self {
        Self::new(CommandKind::DeleteAll, name)
    }

    /// Filtered row count.
    pub fn count(name: impl Into<String>) -> Self {
        Self::new(CommandKind::Count, name)
    }

    /// Unfiltered row count.
    pub fn count_all(name: impl Into<String>) -> Self {
        Self::new(CommandKind::CountAll, name)
    }

    /// Existence probe.
    pub fn exists(name: impl Into<String>) -> Self {
        Self::new(CommandKind::Exists, name)
    }

    /// Filtered AVG over one field.
    pub fn average(name: impl Into<String>) -> Self {
        Self::new(CommandKind::Average, name)
    }

    /// Unfiltered AVG over one field.
    pub fn average_all(name: impl Into<String>) -> Self {
        Self::new(CommandKind::AverageAll, name)
    }

    /// Filtered MAX over one field.
    pub fn max(name: impl Into<String>) -> Self {
        Self::new(CommandKind::Max, name)
    }

    /// Unfiltered MAX over one field.
    pub fn max_all(name: impl Into<String>) -> Self {
        Self::new(CommandKind::MaxAll, name)
    }

    /// Filtered MIN over one field.
    pub fn min(name: impl Into<String>) -> Self {
        Self::new(CommandKind::Min, name)
    }

    /// Unfiltered MIN over one field.
    pub fn min_all(name: impl Into<String>) -> Self {
        Self::new(CommandKind::MinAll, name)
    }

    /// Filtered SUM over one field.
    pub fn sum(name: impl Into<String>) -> Self {
        Self::new(CommandKind::Sum, name)
    }

    /// Unfiltered SUM over one field.
    pub fn sum_all(name: impl Into<String>) -> Self {
        Self::new(CommandKind::SumAll, name)
    }

    /// Table truncation.
    pub fn truncate(name: impl Into<String>) -> Self {
        Self::new(CommandKind::Truncate, name)
    }

    /// One select of a multi-statement batch.
    pub fn query_multiple(name: impl Into<String>) -> Self {
        Self::new(CommandKind::QueryMultiple, name)
    }

    /// Attach the entity shape of `T` for attribute metadata lookup.
    #[must_use]
    pub fn entity<T: 'static>(mut self) -> Self {
        self.entity = Some(EntityShape::of::<T>());
        self
    }

    /// Attach an already-built entity shape.
    #[must_use]
    pub fn entity_shape(mut self, shape: EntityShape) -> Self {
        self.entity = Some(shape);
        self
    }

    /// Target a specific dialect (defaults to the workspace default).
    #[must_use]
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the requested columns.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the filter tree.
    #[must_use]
    pub fn where_group(mut self, group: QueryGroup) -> Self {
        self.where_group = Some(group);
        self
    }

    /// Set the ordering terms.
    #[must_use]
    pub fn order_by<I>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = OrderField>,
    {
        self.order_by = order.into_iter().collect();
        self
    }

    /// Set dialect-specific query hints.
    #[must_use]
    pub fn hints(mut self, hints: impl Into<String>) -> Self {
        self.hints = Some(hints.into());
        self
    }

    /// Set the row limit.
    #[must_use]
    pub fn top(mut self, top: usize) -> Self {
        self.top = Some(top);
        self
    }

    /// Set the zero-based page number.
    #[must_use]
    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the rows-per-batch count.
    #[must_use]
    pub fn rows_per_batch(mut self, rows: usize) -> Self {
        self.rows_per_batch = Some(rows);
        self
    }

    /// Set the skip count.
    #[must_use]
    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Set the multi-row batch size.
    #[must_use]
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    /// Set the merge/update-all qualifier fields.
    #[must_use]
    pub fn qualifiers<I, S>(mut self, qualifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.qualifiers = qualifiers.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlforge_query::{Operation, QueryField};
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    struct Hero;

    fn hash_of(request: &Request) -> u64 {
        let mut hasher = DefaultHasher::new();
        request.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_content_equality() {
        let a = Request::query("heroes")
            .entity::<Hero>()
            .fields(["Id", "Name"])
            .top(10);
        let b = Request::query("heroes")
            .entity::<Hero>()
            .fields(["Id", "Name"])
            .top(10);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_kind_differentiates() {
        let a = Request::query("heroes");
        let b = Request::query_all("heroes");
        assert_ne!(a, b);
    }

    #[test]
    fn test_filter_values_do_not_differentiate() {
        let a = Request::query("heroes").where_group(QueryGroup::all(vec![QueryField::new(
            "Age",
            Operation::GreaterThan,
            18,
        )]));
        let b = Request::query("heroes").where_group(QueryGroup::all(vec![QueryField::new(
            "Age",
            Operation::GreaterThan,
            99,
        )]));
        // Text carries placeholders only, so these are the same operation
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_in_list_arity_differentiates() {
        let a = Request::query("heroes").where_group(QueryGroup::all(vec![QueryField::new(
            "Id",
            Operation::In,
            vec![1, 2],
        )]));
        let b = Request::query("heroes").where_group(QueryGroup::all(vec![QueryField::new(
            "Id",
            Operation::In,
            vec![1, 2, 3],
        )]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_paging_differentiates() {
        let a = Request::batch_query("heroes").page(0).rows_per_batch(20);
        let b = Request::batch_query("heroes").page(1).rows_per_batch(20);
        assert_ne!(a, b);
    }

    #[test]
    fn test_dialect_differentiates() {
        let a = Request::truncate("heroes");
        let b = Request::truncate("heroes").dialect(Dialect::Sqlite);
        assert_ne!(a, b);
    }
}
