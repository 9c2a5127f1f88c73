//! Metadata source traits.
//!
//! [`MetadataSource`] is the read seam the domain builder depends on. It is
//! synchronous and returns fully materialized records, so model
//! construction is a plain ordered sequence of calls.
//!
//! [`SchemaStore`] is the live side: it produces a materialized
//! [`CatalogSnapshot`] and executes statements for the generated-artifact
//! hooks.

use async_trait::async_trait;

use super::error::MetadataResult;
use super::naming::StoreNaming;
use super::records::*;
use super::snapshot::CatalogSnapshot;

/// Read access to raw catalog metadata.
///
/// Implementations return records for every schema they know about; the
/// builder applies the exclusion list.
pub trait MetadataSource {
    // =========================================================================
    // Tables
    // =========================================================================

    /// All tables, in a stable order.
    fn tables(&self) -> MetadataResult<Vec<TableRecord>>;

    /// Columns of one table, in ordinal order.
    fn columns(&self, schema: &str, table: &str) -> MetadataResult<Vec<ColumnRecord>>;

    /// Information-schema nullability for one table.
    fn column_nullability(&self, schema: &str, table: &str)
        -> MetadataResult<Vec<NullabilityRecord>>;

    /// Key-constraint memberships for one table.
    fn key_memberships(&self, schema: &str, table: &str)
        -> MetadataResult<Vec<KeyMembershipRecord>>;

    /// Unique constraints for one table.
    fn unique_constraints(
        &self,
        schema: &str,
        table: &str,
    ) -> MetadataResult<Vec<UniqueConstraintRecord>>;

    /// Outgoing foreign-key edges for one table.
    fn foreign_keys(&self, schema: &str, table: &str) -> MetadataResult<Vec<ForeignKeyRecord>>;

    /// Comments on tables and columns.
    fn annotations(&self) -> MetadataResult<Vec<AnnotationRecord>>;

    // =========================================================================
    // Routines and custom types
    // =========================================================================

    fn routines(&self) -> MetadataResult<Vec<RoutineRecord>>;

    fn custom_types(&self) -> MetadataResult<Vec<CustomTypeRecord>>;

    /// A single custom type, if it exists.
    fn custom_type(&self, schema: &str, name: &str) -> MetadataResult<Option<CustomTypeRecord>> {
        Ok(self
            .custom_types()?
            .into_iter()
            .find(|t| t.schema == schema && t.name == name))
    }

    /// Attributes of a custom type, in ordinal order.
    fn custom_type_columns(
        &self,
        schema: &str,
        name: &str,
    ) -> MetadataResult<Vec<CustomTypeColumnRecord>>;

    // =========================================================================
    // Identifier rules
    // =========================================================================

    fn naming(&self) -> StoreNaming {
        StoreNaming::postgres()
    }
}

/// A live schema store.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Read every catalog record outside the excluded schemas.
    async fn read_snapshot(&self, excluded_schemas: &[String]) -> MetadataResult<CatalogSnapshot>;

    /// Execute statement text, discarding any rows. The text may hold more
    /// than one statement.
    async fn execute(&self, statement: &str) -> MetadataResult<()>;
}
