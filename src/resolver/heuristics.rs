//! Name conventions used when attributes don't say enough.
//!
//! Each rule is a pure function over strings so it can be tested on its own.

use crate::model::PARAM_SUFFIX;

const SELECT_MARKER: &str = "_select_";
const RESULT_SUFFIX: &str = "_result";

/// The entity part of `<entity>_select_<suffix>`.
///
/// `customer_address_select_by_customer` gives `customer_address`. A name
/// that starts with the marker has no entity part.
pub fn candidate_type_name(operation_name: &str) -> Option<&str> {
    match operation_name.find(SELECT_MARKER) {
        Some(index) if index > 0 => Some(&operation_name[..index]),
        _ => None,
    }
}

/// The field a `<field>_param` parameter stands for.
pub fn param_field_name(parameter_name: &str) -> Option<&str> {
    parameter_name
        .strip_suffix(PARAM_SUFFIX)
        .filter(|name| !name.is_empty())
}

/// Name for a synthesized result type: the override, else `<operation>_result`.
pub fn result_type_name(operation_name: &str, custom_name: Option<&str>) -> String {
    match custom_name {
        Some(name) => name.to_string(),
        None => format!("{operation_name}{RESULT_SUFFIX}"),
    }
}
