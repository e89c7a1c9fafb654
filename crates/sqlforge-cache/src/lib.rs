//! Request model, metadata reconciliation, and command-text memoization.
//!
//! `sqlforge-cache` is the **orchestration layer**. A typed [`Request`]
//! arrives describing one logical database operation; the
//! [`CommandTextCache`] either returns memoized SQL text or runs the
//! resolution pipeline: introspect schema (cached), reconcile code-level key
//! declarations with live schema flags, validate target and order fields,
//! and delegate to the dialect's statement builder.
//!
//! # Design Philosophy
//!
//! - **Content-keyed**: requests are values; equal operations share text no
//!   matter which connection carries them.
//! - **Immutable metadata**: nothing cached is ever mutated in place, so
//!   readers never need locks around the cached objects themselves.
//! - **Relaxed memoization**: duplicate concurrent computation is tolerated
//!   because resolution is pure; exactly one result is retained.
//! - **Graceful keys, strict ordering**: key reconciliation never errors,
//!   order-field validation always does when a column is missing.
//!
//! # Example
//!
//! ```ignore
//! let cache = CommandTextCache::new(provider, Arc::new(EntityRegistry::new()));
//! let request = Request::insert("heroes").entity::<Hero>().fields(["Name", "Age"]);
//! let sql = cache.insert_text(&connection, None, &request)?;
//! ```

pub mod attribute_cache;
pub mod cache;
pub mod reconcile;
pub mod request;
pub mod schema_cache;
pub mod validate;

pub use attribute_cache::AttributeCache;
pub use cache::{CacheSnapshot, CommandTextCache};
pub use reconcile::resolve_key_fields;
pub use request::Request;
pub use schema_cache::SchemaCache;
pub use validate::{filter_fields, validate_order_fields, validate_qualifiers};
