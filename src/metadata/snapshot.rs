//! In-memory catalog snapshot.
//!
//! A [`CatalogSnapshot`] is a complete, serializable copy of the catalog
//! records a build needs. It is what [`SchemaStore::read_snapshot`]
//! produces, what `schemagen snapshot` writes to disk, and what tests build
//! by hand:
//!
//! ```ignore
//! use schemagen::metadata::CatalogSnapshot;
//!
//! let snapshot = CatalogSnapshot::builder()
//!     .table("public", "customer", |t| {
//!         t.column("id", "integer").primary_key("id").nullable("name", "text")
//!     })
//!     .routine("public", "customer_select_all", "", "SETOF customer")
//!     .build();
//! ```
//!
//! [`SchemaStore::read_snapshot`]: super::SchemaStore::read_snapshot

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::MetadataResult;
use super::records::*;
use super::source::MetadataSource;

/// Everything known about one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSnapshot {
    pub schema: String,
    pub name: String,
    pub columns: Vec<ColumnRecord>,
    pub nullability: Vec<NullabilityRecord>,
    pub keys: Vec<KeyMembershipRecord>,
    pub unique_constraints: Vec<UniqueConstraintRecord>,
    pub foreign_keys: Vec<ForeignKeyRecord>,
}

/// A custom composite type with its attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomTypeSnapshot {
    pub schema: String,
    pub name: String,
    pub description: Option<String>,
    pub columns: Vec<CustomTypeColumnRecord>,
}

/// A materialized catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    pub tables: Vec<TableSnapshot>,
    pub annotations: Vec<AnnotationRecord>,
    pub routines: Vec<RoutineRecord>,
    pub custom_types: Vec<CustomTypeSnapshot>,
}

impl CatalogSnapshot {
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    pub fn from_json(json: &str) -> MetadataResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> MetadataResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> MetadataResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> MetadataResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    fn table(&self, schema: &str, name: &str) -> Option<&TableSnapshot> {
        self.tables
            .iter()
            .find(|t| t.schema == schema && t.name == name)
    }

    fn table_records<T: Clone>(
        &self,
        schema: &str,
        name: &str,
        select: impl FnOnce(&TableSnapshot) -> &Vec<T>,
    ) -> Vec<T> {
        self.table(schema, name)
            .map(|t| select(t).clone())
            .unwrap_or_default()
    }
}

impl MetadataSource for CatalogSnapshot {
    fn tables(&self) -> MetadataResult<Vec<TableRecord>> {
        Ok(self
            .tables
            .iter()
            .map(|t| TableRecord {
                schema: t.schema.clone(),
                name: t.name.clone(),
            })
            .collect())
    }

    fn columns(&self, schema: &str, table: &str) -> MetadataResult<Vec<ColumnRecord>> {
        let mut columns = self.table_records(schema, table, |t| &t.columns);
        columns.sort_by_key(|c| c.ordinal);
        Ok(columns)
    }

    fn column_nullability(
        &self,
        schema: &str,
        table: &str,
    ) -> MetadataResult<Vec<NullabilityRecord>> {
        Ok(self.table_records(schema, table, |t| &t.nullability))
    }

    fn key_memberships(
        &self,
        schema: &str,
        table: &str,
    ) -> MetadataResult<Vec<KeyMembershipRecord>> {
        Ok(self.table_records(schema, table, |t| &t.keys))
    }

    fn unique_constraints(
        &self,
        schema: &str,
        table: &str,
    ) -> MetadataResult<Vec<UniqueConstraintRecord>> {
        Ok(self.table_records(schema, table, |t| &t.unique_constraints))
    }

    fn foreign_keys(&self, schema: &str, table: &str) -> MetadataResult<Vec<ForeignKeyRecord>> {
        Ok(self.table_records(schema, table, |t| &t.foreign_keys))
    }

    fn annotations(&self) -> MetadataResult<Vec<AnnotationRecord>> {
        Ok(self.annotations.clone())
    }

    fn routines(&self) -> MetadataResult<Vec<RoutineRecord>> {
        Ok(self.routines.clone())
    }

    fn custom_types(&self) -> MetadataResult<Vec<CustomTypeRecord>> {
        Ok(self
            .custom_types
            .iter()
            .map(|t| CustomTypeRecord {
                schema: t.schema.clone(),
                name: t.name.clone(),
                description: t.description.clone(),
            })
            .collect())
    }

    fn custom_type_columns(
        &self,
        schema: &str,
        name: &str,
    ) -> MetadataResult<Vec<CustomTypeColumnRecord>> {
        let mut columns = self
            .custom_types
            .iter()
            .find(|t| t.schema == schema && t.name == name)
            .map(|t| t.columns.clone())
            .unwrap_or_default();
        columns.sort_by_key(|c| c.ordinal);
        Ok(columns)
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Fluent construction of a [`CatalogSnapshot`].
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    snapshot: CatalogSnapshot,
}

impl SnapshotBuilder {
    /// Add a table, configured by `build`.
    pub fn table(
        mut self,
        schema: &str,
        name: &str,
        build: impl FnOnce(TableBuilder) -> TableBuilder,
    ) -> Self {
        let builder = build(TableBuilder::new(schema, name));
        self.snapshot.annotations.extend(builder.annotations);
        self.snapshot.tables.push(builder.table);
        self
    }

    pub fn routine(mut self, schema: &str, name: &str, arguments: &str, result_type: &str) -> Self {
        self.snapshot.routines.push(RoutineRecord {
            schema: schema.to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
            result_type: result_type.to_string(),
            description: None,
        });
        self
    }

    /// Add a routine with a comment (usually a JSON annotation).
    pub fn annotated_routine(
        mut self,
        schema: &str,
        name: &str,
        arguments: &str,
        result_type: &str,
        description: &str,
    ) -> Self {
        self.snapshot.routines.push(RoutineRecord {
            schema: schema.to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
            result_type: result_type.to_string(),
            description: Some(description.to_string()),
        });
        self
    }

    /// Add a custom composite type. Columns are `(name, data_type)` pairs.
    pub fn custom_type(
        mut self,
        schema: &str,
        name: &str,
        description: Option<&str>,
        columns: &[(&str, &str)],
    ) -> Self {
        self.snapshot.custom_types.push(CustomTypeSnapshot {
            schema: schema.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            columns: columns
                .iter()
                .enumerate()
                .map(|(i, (col, data_type))| CustomTypeColumnRecord {
                    name: col.to_string(),
                    data_type: data_type.to_string(),
                    ordinal: i as i32 + 1,
                    is_required: false,
                    description: None,
                })
                .collect(),
        });
        self
    }

    /// Add a free-standing annotation record.
    pub fn annotation(mut self, schema: &str, table: &str, column: Option<&str>, text: &str) -> Self {
        self.snapshot.annotations.push(AnnotationRecord {
            schema: schema.to_string(),
            table: table.to_string(),
            column: column.map(str::to_string),
            text: text.to_string(),
        });
        self
    }

    pub fn build(self) -> CatalogSnapshot {
        self.snapshot
    }
}

/// Fluent construction of one [`TableSnapshot`].
#[derive(Debug)]
pub struct TableBuilder {
    table: TableSnapshot,
    annotations: Vec<AnnotationRecord>,
}

impl TableBuilder {
    fn new(schema: &str, name: &str) -> Self {
        Self {
            table: TableSnapshot {
                schema: schema.to_string(),
                name: name.to_string(),
                ..Default::default()
            },
            annotations: Vec::new(),
        }
    }

    fn push_column(mut self, name: &str, provider_type: &str, size: Option<i32>, nullable: bool) -> Self {
        let ordinal = self.table.columns.len() as i32;
        self.table.columns.push(ColumnRecord {
            name: name.to_string(),
            ordinal,
            provider_type: provider_type.to_string(),
            size,
        });
        self.table.nullability.push(NullabilityRecord {
            column: name.to_string(),
            is_nullable: nullable,
        });
        self
    }

    /// A NOT NULL column.
    pub fn column(self, name: &str, provider_type: &str) -> Self {
        self.push_column(name, provider_type, None, false)
    }

    /// A nullable column.
    pub fn nullable(self, name: &str, provider_type: &str) -> Self {
        self.push_column(name, provider_type, None, true)
    }

    /// A NOT NULL column with a declared size.
    pub fn sized(self, name: &str, provider_type: &str, size: i32) -> Self {
        self.push_column(name, provider_type, Some(size), false)
    }

    pub fn primary_key(mut self, column: &str) -> Self {
        self.table.keys.push(KeyMembershipRecord {
            column: column.to_string(),
            constraint_type: "PRIMARY KEY".to_string(),
        });
        self
    }

    pub fn unique(mut self, name: &str, definition: &str) -> Self {
        self.table.unique_constraints.push(UniqueConstraintRecord {
            name: name.to_string(),
            definition: definition.to_string(),
        });
        self
    }

    /// A foreign key from `column` to `schema.table(referenced_column)`.
    pub fn references(mut self, column: &str, schema: &str, table: &str, referenced_column: &str) -> Self {
        self.table.foreign_keys.push(ForeignKeyRecord {
            constraint_name: format!("fk_{}_{}", self.table.name, column),
            column: column.to_string(),
            referenced_schema: schema.to_string(),
            referenced_table: table.to_string(),
            referenced_column: referenced_column.to_string(),
        });
        self
    }

    /// Comment on the table itself.
    pub fn comment(mut self, text: &str) -> Self {
        self.annotations.push(AnnotationRecord {
            schema: self.table.schema.clone(),
            table: self.table.name.clone(),
            column: None,
            text: text.to_string(),
        });
        self
    }

    pub fn column_comment(mut self, column: &str, text: &str) -> Self {
        self.annotations.push(AnnotationRecord {
            schema: self.table.schema.clone(),
            table: self.table.name.clone(),
            column: Some(column.to_string()),
            text: text.to_string(),
        });
        self
    }
}
