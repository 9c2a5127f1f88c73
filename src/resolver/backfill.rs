//! Result-field back-fill from a related application type.

use crate::error::{ModelError, ModelResult};
use crate::model::{Domain, Field, ResultTypeId};

/// Copy key, requiredness and reference metadata onto the fields of a
/// result type from the same-named fields of `application_type_name`.
///
/// An unknown application type leaves the result type unchanged.
pub(crate) fn backfill_result_fields(
    domain: &mut Domain,
    result_id: ResultTypeId,
    application_type_name: &str,
    operation_name: &str,
) -> ModelResult<()> {
    let Some(type_id) = domain.find_type_by_name(application_type_name) else {
        return Ok(());
    };

    let source_fields = domain.application_type(type_id).fields.clone();
    let result = domain.result_type_mut(result_id);

    for field in &mut result.fields {
        if let Some(source) = source_fields.iter().find(|f| f.name == field.name) {
            inherit_from(field, source, operation_name)?;
        }
    }
    Ok(())
}

/// Inherit metadata from `source` into a result field.
///
/// The field's own attributes win over inherited ones on key collision.
pub fn inherit_from(field: &mut Field, source: &Field, operation_name: &str) -> ModelResult<()> {
    let Some(data_type) = field.data_type else {
        return Err(ModelError::unresolved(
            &field.provider_type_name,
            operation_name,
            format!("result field {} has no semantic type", field.name),
        ));
    };

    if let Some(source_type) = source.data_type {
        if source_type.is_nullable_variant_of(&data_type) {
            field.data_type = Some(source_type);
        }
    }

    field.size = source.size;
    field.is_identity = source.is_identity;
    field.is_required = source.is_required;
    field.references = source.references;
    field.attributes = match (field.attributes.take(), &source.attributes) {
        (Some(own), Some(inherited)) => Some(own.merged_over(inherited)),
        (Some(own), None) => Some(own),
        (None, inherited) => inherited.clone(),
    };
    Ok(())
}
