//! Filter trees and dialect statement builders for SQLForge.
//!
//! `sqlforge-query` is the **text emission layer**. It models structured
//! filters and ordering, defines the [`StatementBuilder`] contract, and ships
//! the PostgreSQL and SQLite implementations of it.
//!
//! # Role In The Architecture
//!
//! - **Filter model**: [`QueryGroup`] / [`QueryField`] arrive pre-structured
//!   from the caller and render into placeholder-only SQL fragments.
//! - **Builder contract**: [`StatementBuilder`] turns a fully resolved
//!   command into dialect-specific SQL text; it is pure, which is what lets
//!   the cache layer memoize its output.
//! - **Dialect support**: [`PostgresStatementBuilder`] and
//!   [`SqliteStatementBuilder`]; swapping dialects means passing a
//!   different builder instance.
//!
//! The resolution pipeline that feeds builders lives in `sqlforge-cache`.
//! Most users access both through the `sqlforge` facade crate.

mod ansi;
pub mod builder;
pub mod clause;
pub mod postgres;
pub mod sqlite;

pub use builder::{CommandKind, ResolvedCommand, StatementBuilder};
pub use clause::{Conjunction, Operation, Order, OrderField, QueryField, QueryGroup};
pub use postgres::PostgresStatementBuilder;
pub use sqlite::SqliteStatementBuilder;

/// The default statement builder for a dialect, when one is bundled.
#[must_use]
pub fn default_builder(
    dialect: sqlforge_core::Dialect,
) -> Option<std::sync::Arc<dyn StatementBuilder>> {
    match dialect {
        sqlforge_core::Dialect::Postgres => {
            Some(std::sync::Arc::new(PostgresStatementBuilder::new()))
        }
        sqlforge_core::Dialect::Sqlite => Some(std::sync::Arc::new(SqliteStatementBuilder::new())),
        sqlforge_core::Dialect::Mysql => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlforge_core::Dialect;

    #[test]
    fn test_default_builder_per_dialect() {
        assert!(default_builder(Dialect::Postgres).is_some());
        assert!(default_builder(Dialect::Sqlite).is_some());
        assert!(default_builder(Dialect::Mysql).is_none());
    }
}
