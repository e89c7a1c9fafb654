//! Core types and contracts for SQLForge.
//!
//! `sqlforge-core` is the **foundation layer** for the entire ecosystem. It defines
//! the schema descriptors, entity metadata contracts, and error types that all
//! other crates build on.
//!
//! # Role In The Architecture
//!
//! - **Schema model**: [`DbField`] and [`DbFieldCollection`] describe live table
//!   columns as introspected from a database connection.
//! - **Attribute model**: [`EntityShape`] and [`ClassProperty`] describe code-level
//!   key declarations attached to an entity type.
//! - **Contracts**: [`SchemaProvider`] and [`AttributeProvider`] are the two
//!   metadata sources the command-text layer reconciles; [`Connection`] and
//!   [`Transaction`] are the execution-context handles used only to reach them.
//! - **Structured concurrency**: re-exports `Cx` and `Outcome` from asupersync so
//!   every async metadata lookup is cancel-correct and budget-aware.
//!
//! # Who Uses This Crate
//!
//! - `sqlforge-query` consumes [`DbField`] and [`Dialect`] to render SQL text.
//! - `sqlforge-cache` consumes the provider contracts to resolve and memoize
//!   command text per request.
//!
//! Most applications should use the `sqlforge` facade; reach for `sqlforge-core`
//! directly when implementing providers or advanced integrations.

// Re-export asupersync primitives for structured concurrency
pub use asupersync::{Cx, Outcome};

pub mod config;
pub mod connection;
pub mod dialect;
pub mod entity;
pub mod error;
pub mod field;
pub mod identifiers;
pub mod provider;
pub mod types;
pub mod value;

pub use config::KeyColumnReturnBehavior;
pub use connection::{Connection, Transaction};
pub use dialect::Dialect;
pub use entity::{ClassProperty, EntityShape};
pub use error::{Error, Result};
pub use field::{DbField, DbFieldCollection};
pub use identifiers::{is_valid_ident, normalize_ident, quote_ident, quote_table, unquote_ident};
pub use provider::{AttributeProvider, EntityRegistry, SchemaProvider};
pub use types::SqlType;
pub use value::Value;
