//! Read-only views that pair an id with the domain it lives in.
//!
//! Predicates that need more than the entity itself (the owner of a field,
//! the target of a reference, the related type of an operation) are defined
//! here rather than on the plain data structs.

use crate::error::ModelResult;

use super::application_type::{ApplicationType, DeleteType};
use super::domain::Domain;
use super::field::{
    Field, CONTENT_TYPE_FIELD_NAME, CREATED_FIELD_NAME, DELETED_FIELD_PREFIX, MODIFIED_FIELD_NAME,
    THUMBNAIL_FIELD_NAME, THUMBNAIL_FIELD_TYPE,
};
use super::ids::{FieldId, FieldKey, FieldOwner, FieldRef, OperationId, ResultTypeId, TypeId};
use super::operation::{Operation, OperationReturn, Parameter};
use super::result_type::ResultType;
use crate::attributes::OptionalAttributes;

#[derive(Clone, Copy)]
pub struct Walker<'a, Id> {
    pub(crate) id: Id,
    pub(crate) domain: &'a Domain,
}

pub type TypeWalker<'a> = Walker<'a, TypeId>;
pub type ResultTypeWalker<'a> = Walker<'a, ResultTypeId>;
pub type OperationWalker<'a> = Walker<'a, OperationId>;
pub type FieldWalker<'a> = Walker<'a, FieldKey>;

impl<'a, Id: Copy> Walker<'a, Id> {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn walk<Other>(&self, id: Other) -> Walker<'a, Other> {
        Walker {
            id,
            domain: self.domain,
        }
    }

    pub fn domain(&self) -> &'a Domain {
        self.domain
    }
}

impl<Id: std::fmt::Debug> std::fmt::Debug for Walker<'_, Id> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker").field("id", &self.id).finish()
    }
}

// =============================================================================
// Application types
// =============================================================================

impl<'a> TypeWalker<'a> {
    pub fn get(&self) -> &'a ApplicationType {
        self.domain.application_type(self.id)
    }

    pub fn name(&self) -> &'a str {
        &self.get().name
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldWalker<'a>> + 'a {
        let type_id = self.id;
        let domain = self.domain;
        (0..self.get().fields.len()).map(move |i| Walker {
            id: FieldKey::from(FieldRef::new(type_id, FieldId::from(i))),
            domain,
        })
    }

    pub fn field(&self, name: &str) -> Option<FieldWalker<'a>> {
        self.get()
            .field(name)
            .map(|(field_id, _)| self.walk(FieldKey::from(FieldRef::new(self.id, field_id))))
    }

    pub fn identity_field(&self) -> ModelResult<FieldWalker<'a>> {
        let (field_id, _) = self.get().identity_field()?;
        Ok(self.walk(FieldKey::from(FieldRef::new(self.id, field_id))))
    }

    pub fn display_field(&self) -> Option<&'a Field> {
        self.get().display_field()
    }

    /// A junction table: more than one reference and nothing else a user
    /// would edit.
    pub fn is_link(&self) -> bool {
        let references = self.fields().filter(|f| f.get().has_reference_type()).count();

        references > 1
            && !self
                .fields()
                .any(|f| f.is_user_editable() && !f.get().has_reference_type())
    }

    /// Number of references to types that carry their own data.
    ///
    /// Used to order relationships. Not a strong signal on its own.
    pub fn rank(&self) -> usize {
        self.fields()
            .filter_map(|f| f.referenced_type())
            .filter(|target| {
                let t = target.get();
                !t.is_reference_data()
                    && !t.is_security_principal()
                    && !target.is_link()
                    && !t.ignore()
                    && !t.is_attachment()
            })
            .count()
    }

    /// Operations whose related type is this one.
    pub fn operations(&self) -> impl Iterator<Item = OperationWalker<'a>> + 'a {
        let type_id = self.id;
        let domain = self.domain;
        domain
            .operation_ids()
            .filter(move |&id| domain.operation(id).related_type == Some(type_id))
            .map(move |id| domain.walk(id))
    }

    /// Fields on other types that reference this one.
    pub fn referencing_fields(&self) -> impl Iterator<Item = FieldWalker<'a>> + 'a {
        let type_id = self.id;
        let domain = self.domain;
        domain
            .type_ids()
            .flat_map(move |id| domain.walk(id).fields())
            .filter(move |f| f.get().references.is_some_and(|r| r.type_id == type_id))
    }
}

// =============================================================================
// Fields
// =============================================================================

impl<'a> FieldWalker<'a> {
    pub fn get(&self) -> &'a Field {
        self.domain.owned_field(self.id.owner, self.id.field_id)
    }

    pub fn name(&self) -> &'a str {
        &self.get().name
    }

    /// The owning application type; `None` for result-type fields.
    pub fn owner_type(&self) -> Option<TypeWalker<'a>> {
        match self.id.owner {
            FieldOwner::Application(type_id) => Some(self.walk(type_id)),
            FieldOwner::Result(_) => None,
        }
    }

    pub fn referenced_type(&self) -> Option<TypeWalker<'a>> {
        self.get().references.map(|r| self.walk(r.type_id))
    }

    pub fn referenced_field(&self) -> Option<FieldWalker<'a>> {
        self.get().references.map(|r| self.walk(FieldKey::from(r)))
    }

    /// Records which user created, modified or deleted a row.
    pub fn is_tracking_user(&self) -> bool {
        let Some(target) = self.referenced_type() else {
            return false;
        };
        if !target.get().is_security_principal() {
            return false;
        }

        let name = self.name();
        if name.starts_with(CREATED_FIELD_NAME) || name.starts_with(MODIFIED_FIELD_NAME) {
            return true;
        }

        name.starts_with(DELETED_FIELD_PREFIX)
            && self
                .owner_type()
                .is_some_and(|owner| owner.get().delete_type() == DeleteType::Soft)
    }

    pub fn is_attachment_content_type(&self) -> bool {
        let Some(owner) = self.owner_type() else {
            return false;
        };
        let field = self.get();

        field.attributes.flag("isContentType", false)
            || (owner.get().is_attachment()
                && field.is_text()
                && field.name == CONTENT_TYPE_FIELD_NAME)
    }

    pub fn is_attachment_thumbnail(&self) -> bool {
        let Some(owner) = self.owner_type() else {
            return false;
        };
        let field = self.get();

        field.attributes.is("type", THUMBNAIL_FIELD_TYPE)
            || (owner.get().is_attachment() && field.is_file() && field.name == THUMBNAIL_FIELD_NAME)
    }

    /// Values a user supplies directly rather than the system.
    pub fn is_user_editable(&self) -> bool {
        let field = self.get();
        !field.is_identity
            && !field.is_tracking_date()
            && !field.is_delete()
            && !self.is_tracking_user()
            && !field.is_search()
            && !field.is_excluded_from_results()
    }
}

// =============================================================================
// Operations
// =============================================================================

impl<'a> OperationWalker<'a> {
    pub fn get(&self) -> &'a Operation {
        self.domain.operation(self.id)
    }

    pub fn name(&self) -> &'a str {
        &self.get().name
    }

    pub fn related_type(&self) -> Option<TypeWalker<'a>> {
        self.get().related_type.map(|id| self.walk(id))
    }

    pub fn returns(&self) -> &'a OperationReturn {
        &self.get().returns
    }

    pub fn result_type(&self) -> Option<ResultTypeWalker<'a>> {
        match self.get().returns {
            OperationReturn::CustomType(id) => Some(self.walk(id)),
            _ => None,
        }
    }

    pub fn returns_related_type(&self) -> bool {
        let operation = self.get();
        match operation.returns {
            OperationReturn::ApplicationType(id) => operation.related_type == Some(id),
            OperationReturn::CustomType(_) => true,
            _ => false,
        }
    }

    /// Fetches one row of the related type by its identity.
    pub fn is_select_by_id(&self) -> bool {
        if !self.returns_related_type() {
            return false;
        }
        let Some(related) = self.related_type() else {
            return false;
        };
        let Ok(identity) = related.identity_field() else {
            return false;
        };

        let identity_ref = FieldRef::new(related.id, identity.id.field_id);
        let security_user = self.domain.security_user_param();
        let mut by_identity = 0;

        for parameter in &self.get().parameters {
            if parameter.related_field == Some(identity_ref) {
                by_identity += 1;
            } else if !parameter.is_security_user(security_user) {
                return false;
            }
        }

        by_identity == 1
    }

    /// The name without the related type's name in it, for operations that
    /// have a related type.
    pub fn bare_name(&self) -> Option<String> {
        self.related_type()
            .map(|related| crate::naming::bare_name(self.name(), related.name()))
    }

    /// The `friendlyName` attribute, falling back to [`Self::bare_name`].
    pub fn friendly_name(&self) -> Option<String> {
        match self.get().attributes.str("friendlyName") {
            Some(name) => Some(name.to_string()),
            None => self.bare_name(),
        }
    }

    /// Parameters a caller fills in, as opposed to ones the system supplies.
    pub fn user_provided_parameters(&self) -> impl Iterator<Item = &'a Parameter> + 'a {
        let domain = self.domain;
        let security_user = domain.security_user_param();

        self.get().parameters.iter().filter(move |p| {
            if p.is_security_user(security_user) {
                return false;
            }
            match p.related_field {
                Some(field_ref) => {
                    let field = domain.walk(FieldKey::from(field_ref));
                    !field.is_tracking_user()
                        && !field.is_attachment_content_type()
                        && !field.is_attachment_thumbnail()
                }
                None => true,
            }
        })
    }
}

// =============================================================================
// Result types
// =============================================================================

impl<'a> ResultTypeWalker<'a> {
    pub fn get(&self) -> &'a ResultType {
        self.domain.result_type(self.id)
    }

    pub fn name(&self) -> &'a str {
        &self.get().name
    }

    pub fn related_type(&self) -> Option<TypeWalker<'a>> {
        self.get().related_type.map(|id| self.walk(id))
    }

    pub fn operations(&self) -> impl Iterator<Item = OperationWalker<'a>> + 'a {
        let domain = self.domain;
        self.get().operations.iter().map(move |&id| domain.walk(id))
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldWalker<'a>> + 'a {
        let owner = FieldOwner::Result(self.id);
        let domain = self.domain;
        (0..self.get().fields.len()).map(move |i| Walker {
            id: FieldKey {
                owner,
                field_id: FieldId::from(i),
            },
            domain,
        })
    }

    /// Every operation returning this shape is ignored.
    pub fn ignore(&self) -> bool {
        let operations = &self.get().operations;
        !operations.is_empty() && self.operations().all(|o| o.get().ignore())
    }
}
