//! Application types: one per table.

use serde::{Deserialize, Serialize};

use crate::attributes::{Attributes, OptionalAttributes};
use crate::error::{ModelError, ModelResult};

use super::field::{display_field, Field};
use super::ids::FieldId;

/// Namespace assumed when none is given.
pub const DEFAULT_NAMESPACE: &str = "public";

/// Name that marks an attachment table when no attribute says otherwise.
pub const ATTACHMENT_TYPE_NAME: &str = "attachment";

/// How rows of a type are deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteType {
    /// No delete operation is generated.
    None,
    /// Rows are flagged through a soft-delete field.
    Soft,
    /// Rows are removed.
    Hard,
}

/// A named unique constraint (other than the primary key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constraint {
    pub name: String,
    /// Member fields, in definition order.
    pub fields: Vec<FieldId>,
}

/// A table in the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationType {
    pub name: String,
    pub namespace: String,
    pub fields: Vec<Field>,
    pub attributes: Option<Attributes>,
    pub constraints: Vec<Constraint>,
}

impl ApplicationType {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            fields: Vec::new(),
            attributes: None,
            constraints: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn field(&self, name: &str) -> Option<(FieldId, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, f)| f.name == name)
            .map(|(i, f)| (FieldId::from(i), f))
    }

    pub fn field_by_id(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.index())
    }

    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Lookup table data.
    pub fn is_reference_data(&self) -> bool {
        self.attributes.is("type", "reference")
    }

    /// Has a full-text search field.
    pub fn is_searchable(&self) -> bool {
        self.fields.iter().any(Field::is_search)
    }

    pub fn delete_type(&self) -> DeleteType {
        if self.fields.iter().any(Field::is_delete) {
            DeleteType::Soft
        } else if self.attributes.flag("hardDelete", false) {
            DeleteType::Hard
        } else {
            DeleteType::None
        }
    }

    pub fn ignore(&self) -> bool {
        self.attributes.flag("ignore", false)
    }

    pub fn generate_api(&self) -> bool {
        !self.ignore() && self.attributes.flag("api", true)
    }

    pub fn generate_ui(&self) -> bool {
        self.generate_api() && self.attributes.flag("ui", true)
    }

    /// Stores binary content. An explicit `isAttachment` attribute wins over
    /// the naming convention.
    pub fn is_attachment(&self) -> bool {
        match self.attributes.bool("isAttachment") {
            Some(flag) => flag,
            None => self.name == ATTACHMENT_TYPE_NAME && self.fields.iter().any(Field::is_file),
        }
    }

    /// Represents the authenticated user.
    pub fn is_security_principal(&self) -> bool {
        self.attributes.flag("isSecurityPrincipal", false)
    }

    pub fn important(&self) -> bool {
        self.attributes.flag("important", false)
    }

    /// The single primary-key field.
    ///
    /// Composite keys are not supported and fail rather than picking one.
    pub fn identity_field(&self) -> ModelResult<(FieldId, &Field)> {
        let mut identities = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_identity);

        let Some((index, field)) = identities.next() else {
            return Err(ModelError::inconsistency(format!(
                "type {} has no identity field",
                self.qualified_name()
            )));
        };

        if identities.next().is_some() {
            return Err(ModelError::ambiguous(format!(
                "type {} has a composite primary key",
                self.qualified_name()
            )));
        }

        Ok((FieldId::from(index), field))
    }

    pub fn display_field(&self) -> Option<&Field> {
        display_field(&self.fields)
    }
}
