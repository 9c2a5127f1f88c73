//! Post-build sanity pass.
//!
//! Advisories describe gaps a renderer can live with. They are logged and
//! returned, never raised.

use std::fmt;

use tracing::warn;

use crate::model::{Domain, OperationReturn};

/// A non-fatal issue found in a fully built domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    NoTypes,
    NoOperations,
    TypeWithoutFields { type_name: String },
    TypeWithoutNamespace { type_name: String },
    /// A type that is not ignored but no operation returns.
    TypeNotReturned { type_name: String },
    ResultTypeWithoutFields { type_name: String },
    ResultTypeNotReturned { type_name: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::NoTypes => write!(f, "There are no types in the domain"),
            Advisory::NoOperations => write!(f, "There are no operations in the domain"),
            Advisory::TypeWithoutFields { type_name } => {
                write!(f, "Type '{}' has no fields", type_name)
            }
            Advisory::TypeWithoutNamespace { type_name } => {
                write!(f, "Type '{}' has no namespace", type_name)
            }
            Advisory::TypeNotReturned { type_name } => {
                write!(f, "Type '{}' is not returned by any operation", type_name)
            }
            Advisory::ResultTypeWithoutFields { type_name } => {
                write!(f, "Result type '{}' has no fields", type_name)
            }
            Advisory::ResultTypeNotReturned { type_name } => {
                write!(
                    f,
                    "Result type '{}' is not returned by any operation",
                    type_name
                )
            }
        }
    }
}

/// Check a built domain and log every advisory found.
pub fn check_domain(domain: &Domain) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    if domain.types().is_empty() {
        advisories.push(Advisory::NoTypes);
    }

    if domain.operations().is_empty() {
        advisories.push(Advisory::NoOperations);
    }

    check_types(domain, &mut advisories);
    check_result_types(domain, &mut advisories);

    for advisory in &advisories {
        warn!("{}", advisory);
    }
    advisories
}

fn check_types(domain: &Domain, advisories: &mut Vec<Advisory>) {
    for walker in domain.filtered_types() {
        let application_type = walker.get();
        let type_name = application_type.name.clone();

        if application_type.fields.is_empty() {
            advisories.push(Advisory::TypeWithoutFields {
                type_name: type_name.clone(),
            });
        }

        if application_type.namespace.is_empty() {
            advisories.push(Advisory::TypeWithoutNamespace {
                type_name: type_name.clone(),
            });
        }

        let returned = domain
            .operations()
            .iter()
            .any(|o| o.returns == OperationReturn::ApplicationType(walker.id()));

        if !application_type.ignore() && !returned {
            advisories.push(Advisory::TypeNotReturned { type_name });
        }
    }
}

fn check_result_types(domain: &Domain, advisories: &mut Vec<Advisory>) {
    for result_id in domain.result_type_ids() {
        let result_type = domain.result_type(result_id);

        if result_type.fields.is_empty() {
            advisories.push(Advisory::ResultTypeWithoutFields {
                type_name: result_type.name.clone(),
            });
        }

        let returned = domain
            .operations()
            .iter()
            .any(|o| o.returns == OperationReturn::CustomType(result_id));

        if !returned {
            advisories.push(Advisory::ResultTypeNotReturned {
                type_name: result_type.name.clone(),
            });
        }
    }
}
