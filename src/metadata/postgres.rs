//! Live Postgres catalog reader.
//!
//! Each catalog query opens its own connection, drains its rows, and drops
//! the client before the next query runs. Nothing is held open across
//! queries and nothing is retried: the first failure aborts the read.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, error};

use super::error::{MetadataError, MetadataResult};
use super::naming::sanitize_name;
use super::records::*;
use super::snapshot::{CatalogSnapshot, CustomTypeSnapshot, TableSnapshot};
use super::source::SchemaStore;

const TABLES: &str = include_str!("queries/tables.sql");
const COLUMNS: &str = include_str!("queries/columns.sql");
const NULLABILITY: &str = include_str!("queries/nullability.sql");
const KEYS: &str = include_str!("queries/keys.sql");
const UNIQUE_CONSTRAINTS: &str = include_str!("queries/unique_constraints.sql");
const FOREIGN_KEYS: &str = include_str!("queries/foreign_keys.sql");
const ANNOTATIONS: &str = include_str!("queries/annotations.sql");
const ROUTINES: &str = include_str!("queries/routines.sql");
const CUSTOM_TYPES: &str = include_str!("queries/custom_types.sql");
const CUSTOM_TYPE_COLUMNS: &str = include_str!("queries/custom_type_columns.sql");

/// A Postgres database addressed by connection string.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    connection_string: String,
}

impl PostgresCatalog {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }

    async fn connect(&self) -> MetadataResult<Client> {
        let (client, connection) = tokio_postgres::connect(&self.connection_string, NoTls).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "postgres connection closed with error");
            }
        });
        Ok(client)
    }

    /// Run one catalog query on a fresh connection.
    async fn query(&self, name: &str, sql: &str, excluded: &[String]) -> MetadataResult<Vec<Row>> {
        debug!(query = name, "running catalog query");
        let client = self.connect().await?;
        let rows = client.query(sql, &[&excluded]).await?;
        debug!(query = name, rows = rows.len(), "catalog query complete");
        Ok(rows)
    }
}

fn text(row: &Row, query: &str, column: &str) -> MetadataResult<String> {
    row.try_get::<_, Option<String>>(column)?
        .ok_or_else(|| MetadataError::missing_column(query, column))
}

fn optional_text(row: &Row, column: &str) -> MetadataResult<Option<String>> {
    Ok(row.try_get::<_, Option<String>>(column)?)
}

type TableKey = (String, String);

fn table_key(row: &Row, query: &str) -> MetadataResult<TableKey> {
    Ok((text(row, query, "schema")?, text(row, query, "table_name")?))
}

#[async_trait]
impl SchemaStore for PostgresCatalog {
    async fn read_snapshot(&self, excluded_schemas: &[String]) -> MetadataResult<CatalogSnapshot> {
        let mut snapshot = CatalogSnapshot::default();
        let mut index: HashMap<TableKey, usize> = HashMap::new();

        // order matters: every per-table query below attaches to a table from this one
        for row in self.query("tables", TABLES, excluded_schemas).await? {
            let schema = text(&row, "tables", "schema")?;
            let name = text(&row, "tables", "name")?;
            index.insert((schema.clone(), name.clone()), snapshot.tables.len());
            snapshot.tables.push(TableSnapshot {
                schema,
                name,
                ..Default::default()
            });
        }

        for row in self.query("columns", COLUMNS, excluded_schemas).await? {
            let Some(&i) = index.get(&table_key(&row, "columns")?) else {
                continue;
            };
            snapshot.tables[i].columns.push(ColumnRecord {
                name: sanitize_name(&text(&row, "columns", "column_name")?),
                ordinal: row.try_get("ordinal")?,
                provider_type: text(&row, "columns", "provider_type")?,
                size: row.try_get("size")?,
            });
        }

        for row in self.query("nullability", NULLABILITY, excluded_schemas).await? {
            let Some(&i) = index.get(&table_key(&row, "nullability")?) else {
                continue;
            };
            snapshot.tables[i].nullability.push(NullabilityRecord {
                column: text(&row, "nullability", "column_name")?,
                is_nullable: row.try_get("is_nullable")?,
            });
        }

        for row in self.query("keys", KEYS, excluded_schemas).await? {
            let Some(&i) = index.get(&table_key(&row, "keys")?) else {
                continue;
            };
            snapshot.tables[i].keys.push(KeyMembershipRecord {
                column: text(&row, "keys", "column_name")?,
                constraint_type: text(&row, "keys", "constraint_type")?,
            });
        }

        for row in self
            .query("unique_constraints", UNIQUE_CONSTRAINTS, excluded_schemas)
            .await?
        {
            let Some(&i) = index.get(&table_key(&row, "unique_constraints")?) else {
                continue;
            };
            snapshot.tables[i]
                .unique_constraints
                .push(UniqueConstraintRecord {
                    name: text(&row, "unique_constraints", "name")?,
                    definition: text(&row, "unique_constraints", "definition")?,
                });
        }

        for row in self
            .query("foreign_keys", FOREIGN_KEYS, excluded_schemas)
            .await?
        {
            let Some(&i) = index.get(&table_key(&row, "foreign_keys")?) else {
                continue;
            };
            snapshot.tables[i].foreign_keys.push(ForeignKeyRecord {
                constraint_name: text(&row, "foreign_keys", "constraint_name")?,
                column: text(&row, "foreign_keys", "column_name")?,
                referenced_schema: text(&row, "foreign_keys", "referenced_schema")?,
                referenced_table: text(&row, "foreign_keys", "referenced_table")?,
                referenced_column: text(&row, "foreign_keys", "referenced_column")?,
            });
        }

        for row in self.query("annotations", ANNOTATIONS, excluded_schemas).await? {
            let Some(text_value) = optional_text(&row, "description")? else {
                continue;
            };
            snapshot.annotations.push(AnnotationRecord {
                schema: text(&row, "annotations", "schema")?,
                table: text(&row, "annotations", "table_name")?,
                column: optional_text(&row, "column_name")?,
                text: text_value,
            });
        }

        for row in self.query("routines", ROUTINES, excluded_schemas).await? {
            snapshot.routines.push(RoutineRecord {
                schema: text(&row, "routines", "schema")?,
                name: text(&row, "routines", "name")?,
                arguments: optional_text(&row, "arguments")?.unwrap_or_default(),
                result_type: optional_text(&row, "result_type")?.unwrap_or_default(),
                description: optional_text(&row, "description")?,
            });
        }

        let mut type_index: HashMap<TableKey, usize> = HashMap::new();
        for row in self
            .query("custom_types", CUSTOM_TYPES, excluded_schemas)
            .await?
        {
            let schema = text(&row, "custom_types", "schema")?;
            let name = text(&row, "custom_types", "name")?;
            type_index.insert((schema.clone(), name.clone()), snapshot.custom_types.len());
            snapshot.custom_types.push(CustomTypeSnapshot {
                schema,
                name,
                description: optional_text(&row, "description")?.filter(|d| !d.is_empty()),
                columns: Vec::new(),
            });
        }

        for row in self
            .query("custom_type_columns", CUSTOM_TYPE_COLUMNS, excluded_schemas)
            .await?
        {
            let key = (
                text(&row, "custom_type_columns", "schema")?,
                text(&row, "custom_type_columns", "type_name")?,
            );
            let Some(&i) = type_index.get(&key) else {
                continue;
            };
            snapshot.custom_types[i].columns.push(CustomTypeColumnRecord {
                name: sanitize_name(&text(&row, "custom_type_columns", "column_name")?),
                data_type: text(&row, "custom_type_columns", "data_type")?,
                ordinal: row.try_get("ordinal")?,
                is_required: row.try_get("is_required")?,
                description: optional_text(&row, "description")?,
            });
        }

        debug!(
            tables = snapshot.tables.len(),
            routines = snapshot.routines.len(),
            custom_types = snapshot.custom_types.len(),
            "catalog snapshot complete"
        );
        Ok(snapshot)
    }

    async fn execute(&self, statement: &str) -> MetadataResult<()> {
        let client = self.connect().await?;
        client.batch_execute(statement).await.map_err(|e| {
            error!(error = %e, statement, "failed to execute statement");
            MetadataError::Execute {
                message: e.to_string(),
                statement: statement.to_string(),
            }
        })
    }
}
