//! Binding operation parameters to fields of the related type.

use crate::model::{ApplicationType, FieldRef, Parameter, TypeId};

use super::heuristics::param_field_name;

/// Bind each parameter to a field of `related`, in three steps:
///
/// 1. a field with the same name;
/// 2. the security-user parameter is made nullable;
/// 3. a field named by the `<field>_param` convention.
///
/// A bound parameter takes the field's semantic type.
pub fn bind_parameters(
    parameters: &mut [Parameter],
    related_id: TypeId,
    related: &ApplicationType,
    security_user_param: &str,
) {
    for parameter in parameters {
        if let Some((field_id, field)) = related.field(&parameter.name) {
            parameter.related_field = Some(FieldRef::new(related_id, field_id));
            parameter.data_type = field.data_type;
            continue;
        }

        if parameter.is_security_user(security_user_param) {
            if !parameter.is_nullable() {
                parameter.data_type = parameter.data_type.map(|t| t.to_nullable());
            }
            continue;
        }

        let bound = param_field_name(&parameter.name).and_then(|name| related.field(name));
        if let Some((field_id, field)) = bound {
            parameter.related_field = Some(FieldRef::new(related_id, field_id));
            parameter.data_type = field.data_type;
        }
    }
}
