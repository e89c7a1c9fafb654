//! The statement builder contract.

use serde::Serialize;
use sqlforge_core::{DbField, Dialect, Result};

use crate::clause::{OrderField, QueryGroup};

/// Every command kind this layer can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    /// Filtered select.
    Query,
    /// Unfiltered select.
    QueryAll,
    /// Paged select by page number and batch size.
    BatchQuery,
    /// Paged select by skip count.
    SkipQuery,
    /// Single-row insert.
    Insert,
    /// Multi-row insert.
    InsertAll,
    /// Filtered or key-matched update.
    Update,
    /// Qualifier-matched update.
    UpdateAll,
    /// Single-row upsert.
    Merge,
    /// Multi-row upsert.
    MergeAll,
    /// Filtered delete.
    Delete,
    /// Unfiltered delete.
    DeleteAll,
    /// Filtered row count.
    Count,
    /// Unfiltered row count.
    CountAll,
    /// Existence probe.
    Exists,
    /// Filtered AVG over one field.
    Average,
    /// Unfiltered AVG over one field.
    AverageAll,
    /// Filtered MAX over one field.
    Max,
    /// Unfiltered MAX over one field.
    MaxAll,
    /// Filtered MIN over one field.
    Min,
    /// Unfiltered MIN over one field.
    MinAll,
    /// Filtered SUM over one field.
    Sum,
    /// Unfiltered SUM over one field.
    SumAll,
    /// Table truncation.
    Truncate,
    /// One select of a multi-statement batch; rendered like [`CommandKind::Query`].
    QueryMultiple,
}

impl CommandKind {
    /// Whether this kind writes rows and therefore needs key-field resolution.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        matches!(
            self,
            CommandKind::Insert
                | CommandKind::InsertAll
                | CommandKind::Update
                | CommandKind::UpdateAll
                | CommandKind::Merge
                | CommandKind::MergeAll
                | CommandKind::Delete
                | CommandKind::DeleteAll
        )
    }
}

/// A fully resolved command, ready for text emission.
///
/// Everything here has already been validated against live schema: `fields`
/// exist in the table, `key_fields` are the reconciled key list (the
/// tie-broken "return" field first), and order fields have been checked.
/// Builders only assemble text from it.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedCommand<'a> {
    /// Target table or view name (possibly schema-qualified).
    pub table: &'a str,
    /// Resolved target fields, in request order.
    pub fields: &'a [DbField],
    /// Reconciled key fields; the return field is first.
    pub key_fields: &'a [DbField],
    /// Filter tree, when the kind is filtered.
    pub where_group: Option<&'a QueryGroup>,
    /// Ordering terms.
    pub order_by: &'a [OrderField],
    /// Dialect-specific query hints.
    pub hints: Option<&'a str>,
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
    pub qualifiers: &'a [String],
}

impl<'a> ResolvedCommand<'a> {
    /// A command with only a table name; everything else empty.
    #[must_use]
    pub fn new(table: &'a str) -> Self {
        Self {
            table,
            fields: &[],
            key_fields: &[],
            where_group: None,
            order_by: &[],
            hints: None,
            top: None,
            page: None,
            rows_per_batch: None,
            skip: None,
            batch_size: None,
            qualifiers: &[],
        }
    }
}

/// Renders one command kind into dialect-specific SQL text.
///
/// Builders must be **pure**: the same resolved command always yields the
/// same text. The command-text cache relies on this to memoize safely, and
/// it is why a builder never consults the connection or any other ambient
/// state. Swapping dialects means passing a different builder; nothing in
/// the resolution pipeline is dialect-aware.
pub trait StatementBuilder: Send + Sync {
    /// The dialect this builder emits.
    fn dialect(&self) -> Dialect;

    /// Emit SQL text for one command kind.
    fn build(&self, kind: CommandKind, cmd: &ResolvedCommand<'_>) -> Result<String>;
}
