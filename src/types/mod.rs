//! Type mapping.
//!
//! Provider type names (`integer`, `timestamp with time zone`, `uuid`) are
//! mapped to canonical [`ScalarType`]s. Nullability rides alongside in
//! [`SemanticType`], which also knows its target-language spellings.
//!
//! ```text
//! "integer" ──[TypeMapper]──▶ Int32 ──[nullable column]──▶ int?
//! "text"    ──[TypeMapper]──▶ Text  ──[nullable column]──▶ string
//! ```

mod mapper;
mod scalar;

pub use mapper::{parse_type_and_size, TypeMapper};
pub use scalar::{ScalarType, SemanticType};
