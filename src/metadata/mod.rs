//! Metadata source module.
//!
//! Raw catalog records, the traits that produce them, and the store-owned
//! identifier rules.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 SchemaStore (async, live database)               │
//! │  - read_snapshot()   one connection per catalog query            │
//! │  - execute()         generated-artifact round trips              │
//! └─────────────────────────────────────────────────────────────────┘
//!                           │ CatalogSnapshot (materialized)
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 MetadataSource (sync, in memory)                 │
//! │  - tables() / columns() / column_nullability()                   │
//! │  - key_memberships() / unique_constraints() / foreign_keys()     │
//! │  - annotations() / routines() / custom_types()                   │
//! └─────────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//!                     DomainBuilder
//! ```
//!
//! # Example
//!
//! ```ignore
//! use schemagen::metadata::{PostgresCatalog, SchemaStore};
//!
//! let store = PostgresCatalog::new("postgres://localhost/app");
//! let snapshot = store.read_snapshot(&["audit".to_string()]).await?;
//! snapshot.save("catalog.json")?;
//! ```

mod error;
mod naming;
mod postgres;
mod records;
mod snapshot;
mod source;

pub use error::{MetadataError, MetadataResult};
pub use naming::{sanitize_name, StoreNaming, POSTGRES_IDENTIFIER_LIMIT, POSTGRES_RESERVED_WORDS};
pub use postgres::PostgresCatalog;
pub use records::*;
pub use snapshot::{CatalogSnapshot, CustomTypeSnapshot, SnapshotBuilder, TableBuilder, TableSnapshot};
pub use source::{MetadataSource, SchemaStore};

/// Schemas that never contain application tables.
pub static BLOCKED_SCHEMAS: &[&str] = &["pg_catalog", "pg_toast", "information_schema"];

/// True for system schemas that are always skipped.
pub fn is_blocked_schema(schema: &str) -> bool {
    BLOCKED_SCHEMAS.contains(&schema) || schema.starts_with("pg_toast")
}
