//! Operation resolution.
//!
//! Turns a raw routine signature into a typed [`Operation`]:
//!
//! ```text
//! RoutineRecord
//!   ├── description  ──► attributes
//!   ├── arguments    ──► parameters
//!   ├── applicationtype attribute ──► related type
//!   ├── result_type  ──► OperationReturn
//!   │     void      → None
//!   │     TABLE(..) → ApplicationType (structural match) | CustomType
//!   │     SETOF x   → ApplicationType | CustomType
//!   │     other     → Singular
//!   └── parameters bound to the related type's fields
//! ```

mod backfill;
pub mod heuristics;
mod parameters;
pub mod signature;

pub use backfill::inherit_from;
pub use parameters::bind_parameters;
pub use signature::{parse_arguments, parse_return, Argument, ReturnExpression};

use tracing::{debug, error};

use crate::attributes::{read_optional_attributes, OptionalAttributes};
use crate::error::{ModelError, ModelResult};
use crate::metadata::{sanitize_name, CustomTypeColumnRecord, MetadataSource, RoutineRecord};
use crate::model::{
    fields_match, Domain, Field, FieldOwner, Operation, OperationId, OperationReturn, Parameter,
    ResultType, ResultTypeId, TypeId,
};
use crate::types::{parse_type_and_size, TypeMapper};

use backfill::backfill_result_fields;
use heuristics::{candidate_type_name, result_type_name};

/// Resolves routines into operations on a domain whose types are complete.
pub struct OperationResolver<'a, S: MetadataSource + ?Sized> {
    mapper: &'a TypeMapper,
    source: &'a S,
    domain: &'a mut Domain,
}

impl<'a, S: MetadataSource + ?Sized> OperationResolver<'a, S> {
    pub fn new(mapper: &'a TypeMapper, source: &'a S, domain: &'a mut Domain) -> Self {
        Self {
            mapper,
            source,
            domain,
        }
    }

    /// Resolve every routine outside the excluded schemas.
    pub fn resolve_all(&mut self) -> ModelResult<()> {
        for routine in self.source.routines()? {
            if self.domain.options().is_excluded(&routine.schema) {
                debug!(schema = %routine.schema, routine = %routine.name, "skipping excluded schema");
                continue;
            }

            if let Err(err) = self.resolve(&routine) {
                error!(schema = %routine.schema, routine = %routine.name, error = %err, "unable to resolve operation");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Resolve one routine and add it to the domain.
    pub fn resolve(&mut self, routine: &RoutineRecord) -> ModelResult<OperationId> {
        let mut operation = Operation::new(sanitize_name(&routine.name), &routine.schema);
        operation.attributes = read_optional_attributes(routine.description.as_deref());
        operation.parameters = self.read_parameters(&routine.arguments);
        operation.related_type = self.related_type_from_attributes(&operation);

        let operation_id = self.domain.next_operation_id();
        operation.returns = self.resolve_return(&routine.result_type, &operation, operation_id)?;

        if operation.related_type.is_none() {
            if let OperationReturn::ApplicationType(type_id) = operation.returns {
                operation.related_type = Some(type_id);
            }
        }

        if let Some(type_id) = operation.related_type {
            bind_parameters(
                &mut operation.parameters,
                type_id,
                self.domain.application_type(type_id),
                self.domain.security_user_param(),
            );
        }

        Ok(self.domain.push_operation(operation))
    }

    // =========================================================================
    // Signature
    // =========================================================================

    fn read_parameters(&self, arguments: &str) -> Vec<Parameter> {
        parse_arguments(arguments)
            .into_iter()
            .enumerate()
            .map(|(order, argument)| {
                let data_type = self.mapper.resolve(&argument.provider_type);
                Parameter::new(argument.name, order as i32, argument.provider_type, data_type)
            })
            .collect()
    }

    fn related_type_from_attributes(&self, operation: &Operation) -> Option<TypeId> {
        let name = operation.application_type_name()?;
        let found = self.domain.find_type_by_name(name);
        if found.is_none() {
            error!(
                operation = %operation.qualified_name(),
                application_type = name,
                "unable to find application type for operation"
            );
        }
        found
    }

    // =========================================================================
    // Return Shapes
    // =========================================================================

    fn resolve_return(
        &mut self,
        expression: &str,
        operation: &Operation,
        operation_id: OperationId,
    ) -> ModelResult<OperationReturn> {
        match parse_return(expression) {
            ReturnExpression::Void => Ok(OperationReturn::None),
            ReturnExpression::Table(columns) => {
                self.resolve_table(&columns, operation, operation_id)
            }
            ReturnExpression::SetOf { schema, name } => {
                let namespace = schema.unwrap_or_else(|| operation.namespace.clone());
                self.resolve_set_of(&namespace, &name, operation, operation_id)
            }
            ReturnExpression::Scalar(provider_type) => {
                let (provider_type, _) = parse_type_and_size(&provider_type);
                let data_type = self.mapper.resolve(&provider_type);
                Ok(OperationReturn::Singular {
                    provider_type,
                    data_type,
                })
            }
        }
    }

    fn resolve_table(
        &mut self,
        columns: &[Argument],
        operation: &Operation,
        operation_id: OperationId,
    ) -> ModelResult<OperationReturn> {
        let owner = FieldOwner::Result(self.domain.next_result_type_id());
        let fields: Vec<Field> = columns
            .iter()
            .enumerate()
            .map(|(order, column)| self.result_field(owner, &column.name, &column.provider_type, order as i32))
            .collect();

        if let Some(type_id) = self.find_type_by_fields(&fields, operation) {
            return Ok(OperationReturn::ApplicationType(type_id));
        }

        let name = result_type_name(&operation.name, operation.custom_return_type_name());

        if let Some(existing) = self.domain.find_result_type(&name) {
            if !self.domain.result_type(existing).has_shape_of(&fields) {
                return Err(ModelError::ambiguous(format!(
                    "result type {name} returned by {} has a different shape than an existing result type of the same name",
                    operation.qualified_name()
                )));
            }
            self.domain.result_type_mut(existing).operations.push(operation_id);
            return Ok(OperationReturn::CustomType(existing));
        }

        let result_id = self.push_result_type(name, fields, operation, operation_id)?;
        Ok(OperationReturn::CustomType(result_id))
    }

    fn resolve_set_of(
        &mut self,
        namespace: &str,
        name: &str,
        operation: &Operation,
        operation_id: OperationId,
    ) -> ModelResult<OperationReturn> {
        if let Some(type_id) = self.domain.find_type(namespace, name) {
            return Ok(OperationReturn::ApplicationType(type_id));
        }

        // Restricted views of a table generated by an earlier run.
        let custom_type = self.source.custom_type(namespace, name)?;
        let custom_attributes =
            read_optional_attributes(custom_type.as_ref().and_then(|t| t.description.as_deref()));

        if custom_attributes.flag("generated", false) && custom_attributes.flag("isResult", false) {
            let application_type = custom_attributes.str("applicationtype");
            return match application_type.and_then(|n| self.domain.find_type_by_name(n)) {
                Some(type_id) => Ok(OperationReturn::ApplicationType(type_id)),
                None => Err(ModelError::unresolved(
                    name,
                    operation.qualified_name(),
                    format!(
                        "generated result type names application type {} which does not exist",
                        application_type.unwrap_or("<none>")
                    ),
                )),
            };
        }

        if let Some(existing) = self.domain.find_result_type(name) {
            self.domain.result_type_mut(existing).operations.push(operation_id);
            return Ok(OperationReturn::CustomType(existing));
        }

        let columns = self.source.custom_type_columns(namespace, name)?;
        if columns.is_empty() {
            return Err(ModelError::unresolved(
                name,
                operation.qualified_name(),
                "no application type, result marker or column information",
            ));
        }

        let owner = FieldOwner::Result(self.domain.next_result_type_id());
        let fields = columns
            .iter()
            .map(|column| self.custom_type_field(owner, column))
            .collect();

        let result_id = self.push_result_type(name.to_string(), fields, operation, operation_id)?;
        Ok(OperationReturn::CustomType(result_id))
    }

    // =========================================================================
    // Structural Matching
    // =========================================================================

    /// The application type whose visible fields match `fields`, trying the
    /// `applicationtype` attribute first and then the operation name.
    fn find_type_by_fields(&self, fields: &[Field], operation: &Operation) -> Option<TypeId> {
        let candidates = [
            operation.application_type_name(),
            candidate_type_name(&operation.name),
        ];

        candidates.into_iter().flatten().find_map(|name| {
            let type_id = self.domain.find_type(&operation.namespace, name)?;
            fields_match(fields, &self.domain.application_type(type_id).fields).then_some(type_id)
        })
    }

    // =========================================================================
    // Result Types
    // =========================================================================

    fn push_result_type(
        &mut self,
        name: String,
        fields: Vec<Field>,
        operation: &Operation,
        operation_id: OperationId,
    ) -> ModelResult<ResultTypeId> {
        let mut result = ResultType::new(name, &operation.namespace, operation.related_type);
        result.fields = fields;
        result.operations.push(operation_id);
        let result_id = self.domain.push_result_type(result);

        if let Some(application_type) = operation.application_type_name() {
            backfill_result_fields(
                self.domain,
                result_id,
                application_type,
                &operation.qualified_name(),
            )?;
        }
        Ok(result_id)
    }

    fn result_field(&self, owner: FieldOwner, name: &str, raw_type: &str, order: i32) -> Field {
        let (provider_type, size) = if raw_type.trim_end().ends_with(')') {
            parse_type_and_size(raw_type)
        } else {
            (raw_type.trim().to_string(), None)
        };

        let data_type = self.mapper.resolve(&provider_type);
        let mut field = Field::new(owner, sanitize_name(name), order, provider_type, data_type);
        field.size = size;
        field
    }

    fn custom_type_field(&self, owner: FieldOwner, column: &CustomTypeColumnRecord) -> Field {
        let mut field = self.result_field(owner, &column.name, &column.data_type, column.ordinal);
        field.is_required = column.is_required;
        field.attributes = read_optional_attributes(column.description.as_deref());
        field
    }
}
