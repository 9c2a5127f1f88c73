//! Operations: stored routines with resolved parameters and return shapes.

use serde::Serialize;

use crate::attributes::{Attributes, OptionalAttributes};
use crate::types::SemanticType;

use super::ids::{FieldRef, ResultTypeId, TypeId};

/// Default name of the parameter carrying the current user's id.
pub const SECURITY_USER_ID_PARAM: &str = "security_user_id_param";

/// Suffix added to parameter names that would otherwise clash with keywords.
pub const PARAM_SUFFIX: &str = "_param";

/// What an operation returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum OperationReturn {
    /// `void`.
    None,
    /// A single scalar; `data_type` is `None` when the type has no mapping.
    Singular {
        provider_type: String,
        data_type: Option<SemanticType>,
    },
    /// Rows of an application type.
    ApplicationType(TypeId),
    /// Rows of a synthesized result type.
    CustomType(ResultTypeId),
}

impl OperationReturn {
    pub fn is_singular(&self) -> bool {
        matches!(self, OperationReturn::Singular { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub order: i32,
    pub provider_type_name: String,
    pub data_type: Option<SemanticType>,
    pub size: Option<u32>,
    pub attributes: Option<Attributes>,
    /// Field on the related type this parameter feeds.
    pub related_field: Option<FieldRef>,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        order: i32,
        provider_type_name: impl Into<String>,
        data_type: Option<SemanticType>,
    ) -> Self {
        Self {
            name: name.into(),
            order,
            provider_type_name: provider_type_name.into(),
            data_type,
            size: None,
            attributes: None,
            related_field: None,
        }
    }

    pub fn is_security_user(&self, security_user_param: &str) -> bool {
        self.name == security_user_param
    }

    pub fn is_nullable(&self) -> bool {
        self.data_type.is_some_and(|t| t.is_nullable())
    }

    pub fn user_editable(&self) -> bool {
        self.attributes.flag("userEditable", true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub name: String,
    pub namespace: String,
    pub parameters: Vec<Parameter>,
    pub attributes: Option<Attributes>,
    pub returns: OperationReturn,
    pub related_type: Option<TypeId>,
}

impl Operation {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            parameters: Vec::new(),
            attributes: None,
            returns: OperationReturn::None,
            related_type: None,
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn ignore(&self) -> bool {
        self.attributes.flag("ignore", false)
    }

    /// Created by a previous generation run.
    pub fn is_generated(&self) -> bool {
        self.attributes.flag("generated", false)
    }

    pub fn changes_data(&self) -> bool {
        self.attributes.flag("changesData", false)
    }

    pub fn creates_new(&self) -> bool {
        self.attributes.flag("createsNew", false)
    }

    pub fn generate_api(&self) -> bool {
        !self.ignore() && self.attributes.flag("api", true)
    }

    pub fn generate_ui(&self) -> bool {
        !self.ignore() && self.attributes.flag("ui", true)
    }

    /// The `applicationtype` attribute, if set.
    pub fn application_type_name(&self) -> Option<&str> {
        self.attributes.str("applicationtype")
    }

    pub fn custom_return_type_name(&self) -> Option<&str> {
        self.attributes.str("returnTypeName")
    }

    pub fn single_result(&self) -> bool {
        self.attributes.flag("single_result", false) || self.returns.is_singular()
    }
}
