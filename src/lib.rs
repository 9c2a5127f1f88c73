//! # schemagen
//!
//! Reads a Postgres schema and resolves it into a typed domain model for
//! code generators.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            Schema store (Postgres catalog)               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [metadata]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Raw records (tables, columns, keys, FKs,          │
//! │        annotations, routines, custom types)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [builder: passes 1-4]
//! ┌─────────────────────────────────────────────────────────┐
//! │      Application types + fields + references             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [resolver]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Domain (types, operations, result types)             │
//! │     + sanity advisories                                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//!                      renderers
//! ```

pub mod attributes;
pub mod builder;
pub mod config;
pub mod error;
pub mod generated;
pub mod metadata;
pub mod model;
pub mod naming;
pub mod resolver;
pub mod sanity;
pub mod types;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::attributes::{read_attributes, Attributes, OptionalAttributes};
    pub use crate::builder::DomainBuilder;
    pub use crate::error::{ModelError, ModelResult};
    pub use crate::metadata::{CatalogSnapshot, MetadataSource};
    pub use crate::model::{
        ApplicationType, DeleteType, Domain, DomainOptions, Field, Operation, OperationReturn,
        Parameter, ResultType,
    };
    pub use crate::types::{ScalarType, SemanticType, TypeMapper};
}
