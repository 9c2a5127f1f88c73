//! Result types: row shapes returned by operations but not backed by a table.

use serde::Serialize;

use crate::attributes::Attributes;

use super::field::{display_field, Field};
use super::ids::{OperationId, TypeId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultType {
    pub name: String,
    pub namespace: String,
    pub fields: Vec<Field>,
    pub attributes: Option<Attributes>,
    /// The related type of the operation that first produced this shape.
    pub related_type: Option<TypeId>,
    /// Operations that return this shape.
    pub operations: Vec<OperationId>,
}

impl ResultType {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, related_type: Option<TypeId>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            fields: Vec::new(),
            attributes: None,
            related_type,
            operations: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn display_field(&self) -> Option<&Field> {
        display_field(&self.fields)
    }

    /// Same (name, provider type) set, ignoring order.
    pub fn has_shape_of(&self, fields: &[Field]) -> bool {
        self.fields.len() == fields.len()
            && fields.iter().all(|f| {
                self.fields
                    .iter()
                    .any(|own| own.name == f.name && own.provider_type_name == f.provider_type_name)
            })
    }
}
