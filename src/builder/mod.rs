//! Multi-pass domain construction.
//!
//! ```text
//! Pass 1  tables + columns        (per table)
//! Pass 2  nullability, keys,      (per table)
//!         unique constraints
//! Pass 3  annotations             (global, needs every field)
//! Pass 4  foreign keys            (global, needs every type)
//! then    operations              (OperationResolver)
//! ```
//!
//! Each pass completes before the next starts, and any error aborts the
//! build. A half-built [`Domain`] is never returned.

mod constraints;

pub use constraints::constraint_columns;

use tracing::{debug, info};

use crate::attributes::read_attributes;
use crate::error::{ModelError, ModelResult};
use crate::metadata::{sanitize_name, ColumnRecord, MetadataSource, StoreNaming};
use crate::model::{
    ApplicationType, Constraint, Domain, DomainOptions, Field, FieldOwner, FieldRef, TypeId,
};
use crate::resolver::OperationResolver;
use crate::types::TypeMapper;

/// Builds a [`Domain`] from a metadata source.
pub struct DomainBuilder<'a> {
    mapper: &'a TypeMapper,
    options: DomainOptions,
    naming: Option<StoreNaming>,
}

impl<'a> DomainBuilder<'a> {
    pub fn new(mapper: &'a TypeMapper, options: DomainOptions) -> Self {
        Self {
            mapper,
            options,
            naming: None,
        }
    }

    /// Use these identifier rules instead of the source's own.
    pub fn with_naming(mut self, naming: StoreNaming) -> Self {
        self.naming = Some(naming);
        self
    }

    pub fn options(&self) -> &DomainOptions {
        &self.options
    }

    /// Run every pass and resolve operations.
    pub fn build<S: MetadataSource + ?Sized>(&self, source: &S) -> ModelResult<Domain> {
        let naming = self.naming.clone().unwrap_or_else(|| source.naming());
        let mut domain = Domain::new(&self.options, naming);

        debug!("pass 1: loading types");
        self.load_types(source, &mut domain)?;

        debug!("pass 2: nullability, keys and constraints");
        for type_id in domain.type_ids().collect::<Vec<_>>() {
            self.apply_nullability(source, &mut domain, type_id)?;
            self.apply_keys(source, &mut domain, type_id)?;
            self.apply_unique_constraints(source, &mut domain, type_id)?;
        }

        debug!("pass 3: attributes");
        self.attach_attributes(source, &mut domain)?;

        debug!("pass 4: foreign keys");
        for type_id in domain.type_ids().collect::<Vec<_>>() {
            self.resolve_foreign_keys(source, &mut domain, type_id)?;
        }

        debug!("resolving operations");
        OperationResolver::new(self.mapper, source, &mut domain).resolve_all()?;

        info!(summary = %domain.summary(), "domain built");
        Ok(domain)
    }

    // =========================================================================
    // Pass 1: Types and Fields
    // =========================================================================

    fn load_types<S: MetadataSource + ?Sized>(
        &self,
        source: &S,
        domain: &mut Domain,
    ) -> ModelResult<()> {
        for table in source.tables()? {
            if self.options.is_excluded(&table.schema) {
                debug!(schema = %table.schema, table = %table.name, "skipping excluded schema");
                continue;
            }

            let name = sanitize_name(&table.name);
            let type_id = domain.push_type(ApplicationType::new(&name, &table.schema));

            let fields = source
                .columns(&table.schema, &table.name)?
                .iter()
                .map(|column| self.field_from_column(type_id, column))
                .collect();
            domain.type_mut(type_id).fields = fields;
        }
        Ok(())
    }

    fn field_from_column(&self, type_id: TypeId, column: &ColumnRecord) -> Field {
        let mut field = Field::new(
            FieldOwner::Application(type_id),
            sanitize_name(&column.name),
            column.ordinal,
            &column.provider_type,
            self.mapper.resolve(&column.provider_type),
        );
        field.size = column.size.and_then(|size| u32::try_from(size).ok());
        field
    }

    // =========================================================================
    // Pass 2: Nullability, Keys, Constraints
    // =========================================================================

    fn apply_nullability<S: MetadataSource + ?Sized>(
        &self,
        source: &S,
        domain: &mut Domain,
        type_id: TypeId,
    ) -> ModelResult<()> {
        let (namespace, name) = names(domain, type_id);
        let records = source.column_nullability(&namespace, &name)?;
        let application_type = domain.type_mut(type_id);

        for record in records {
            let column = sanitize_name(&record.column);
            let Some(field) = application_type.field_mut(&column) else {
                return Err(ModelError::inconsistency(format!(
                    "nullability information for unknown field {column} on {namespace}.{name}"
                )));
            };

            field.is_required = !record.is_nullable;
            if record.is_nullable {
                field.data_type = field.data_type.map(|t| t.to_nullable());
            }
        }
        Ok(())
    }

    fn apply_keys<S: MetadataSource + ?Sized>(
        &self,
        source: &S,
        domain: &mut Domain,
        type_id: TypeId,
    ) -> ModelResult<()> {
        let (namespace, name) = names(domain, type_id);
        let records = source.key_memberships(&namespace, &name)?;
        let application_type = domain.type_mut(type_id);

        for record in records {
            let column = sanitize_name(&record.column);
            let Some(field) = application_type.field_mut(&column) else {
                return Err(ModelError::inconsistency(format!(
                    "key constraint on unknown field {column} on {namespace}.{name}"
                )));
            };

            if record.is_primary_key() {
                field.is_identity = true;
            }
        }
        Ok(())
    }

    fn apply_unique_constraints<S: MetadataSource + ?Sized>(
        &self,
        source: &S,
        domain: &mut Domain,
        type_id: TypeId,
    ) -> ModelResult<()> {
        let (namespace, name) = names(domain, type_id);
        let records = source.unique_constraints(&namespace, &name)?;
        let application_type = domain.type_mut(type_id);

        for record in records {
            let mut fields = Vec::new();
            for column in constraint_columns(&record.definition) {
                let Some((field_id, _)) = application_type.field(&column) else {
                    return Err(ModelError::inconsistency(format!(
                        "unique constraint {} names unknown field {column} on {namespace}.{name}",
                        record.name
                    )));
                };
                fields.push(field_id);
            }

            application_type.constraints.push(Constraint {
                name: record.name,
                fields,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Pass 3: Attributes
    // =========================================================================

    fn attach_attributes<S: MetadataSource + ?Sized>(
        &self,
        source: &S,
        domain: &mut Domain,
    ) -> ModelResult<()> {
        for record in source.annotations()? {
            if self.options.is_excluded(&record.schema) {
                continue;
            }

            let table = sanitize_name(&record.table);
            let Some(type_id) = domain.find_type(&record.schema, &table) else {
                debug!(schema = %record.schema, table = %table, "annotation for unknown table");
                continue;
            };

            let attributes = read_attributes(&record.text);
            let application_type = domain.type_mut(type_id);

            match record.column.as_deref().map(sanitize_name) {
                None => application_type.attributes = attributes,
                Some(column) => match application_type.field_mut(&column) {
                    Some(field) => field.attributes = attributes,
                    None => {
                        debug!(schema = %record.schema, table = %table, column = %column, "annotation for unknown column");
                    }
                },
            }
        }
        Ok(())
    }

    // =========================================================================
    // Pass 4: Foreign Keys
    // =========================================================================

    fn resolve_foreign_keys<S: MetadataSource + ?Sized>(
        &self,
        source: &S,
        domain: &mut Domain,
        type_id: TypeId,
    ) -> ModelResult<()> {
        let (namespace, name) = names(domain, type_id);

        for fk in source.foreign_keys(&namespace, &name)? {
            let column = sanitize_name(&fk.column);
            let referenced_table = sanitize_name(&fk.referenced_table);
            let referenced_column = sanitize_name(&fk.referenced_column);

            if domain.application_type(type_id).field(&column).is_none() {
                return Err(ModelError::inconsistency(format!(
                    "foreign key {} on unknown field {column} of {namespace}.{name}",
                    fk.constraint_name
                )));
            }

            let Some(target_id) = domain.find_type(&fk.referenced_schema, &referenced_table) else {
                return Err(ModelError::inconsistency(format!(
                    "foreign key {} on {namespace}.{name}.{column} references unknown type {}.{referenced_table}",
                    fk.constraint_name, fk.referenced_schema
                )));
            };

            let Some((target_field, _)) = domain.application_type(target_id).field(&referenced_column)
            else {
                return Err(ModelError::inconsistency(format!(
                    "foreign key {} on {namespace}.{name}.{column} references unknown field {}.{referenced_table}.{referenced_column}",
                    fk.constraint_name, fk.referenced_schema
                )));
            };

            if let Some(field) = domain.type_mut(type_id).field_mut(&column) {
                field.references = Some(FieldRef::new(target_id, target_field));
            }
        }
        Ok(())
    }
}

fn names(domain: &Domain, type_id: TypeId) -> (String, String) {
    let application_type = domain.application_type(type_id);
    (
        application_type.namespace.clone(),
        application_type.name.clone(),
    )
}
