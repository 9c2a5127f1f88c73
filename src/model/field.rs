//! Fields and the classification rules that only need the field itself.
//!
//! Rules that depend on the owner or on a referenced type live on
//! [`FieldWalker`](super::FieldWalker).

use serde::Serialize;

use crate::attributes::{Attributes, OptionalAttributes};
use crate::types::{ScalarType, SemanticType};

use super::ids::{FieldOwner, FieldRef};

/// Added to a field's ordinal when no explicit rank is set.
pub const RANK_OFFSET: i64 = 1_000_000;

pub const MODIFIED_FIELD_NAME: &str = "modified";
pub const CREATED_FIELD_NAME: &str = "created";
pub const DELETED_FIELD_PREFIX: &str = "deleted";
pub const SOFT_DELETE_FIELD_NAME: &str = "deleted_date";
pub const SEARCH_FIELD_NAME: &str = "search_content";
pub const CONTENT_TYPE_FIELD_NAME: &str = "content_type";
pub const THUMBNAIL_FIELD_NAME: &str = "thumbnail";
pub const COLOR_FIELD_TYPE: &str = "color";
pub const THUMBNAIL_FIELD_TYPE: &str = "thumbnail";

/// Text fields longer than this are treated as large content.
pub const LARGE_TEXT_SIZE: u32 = 500;

const SEARCH_PROVIDER_TYPE: &str = "tsvector";

/// A column of a table or of a synthesized result shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub order: i32,
    pub provider_type_name: String,
    /// `None` when the provider type has no mapping.
    pub data_type: Option<SemanticType>,
    pub size: Option<u32>,
    pub is_identity: bool,
    pub is_required: bool,
    pub attributes: Option<Attributes>,
    /// Set together: the referenced type and the field on it.
    pub references: Option<FieldRef>,
    pub owner: FieldOwner,
}

impl Field {
    pub fn new(
        owner: FieldOwner,
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
            is_identity: false,
            is_required: false,
            attributes: None,
            references: None,
            owner,
        }
    }

    fn scalar(&self) -> Option<ScalarType> {
        self.data_type.map(|t| t.scalar)
    }

    /// The scalar, only when the field is not nullable.
    fn required_scalar(&self) -> Option<ScalarType> {
        self.data_type.filter(|t| !t.is_nullable()).map(|t| t.scalar)
    }

    pub fn is_text(&self) -> bool {
        self.scalar() == Some(ScalarType::Text)
    }

    pub fn is_date(&self) -> bool {
        self.scalar() == Some(ScalarType::DateTime)
    }

    pub fn is_boolean(&self) -> bool {
        self.scalar() == Some(ScalarType::Bool)
    }

    /// A non-nullable 32-bit integer.
    pub fn is_int(&self) -> bool {
        self.required_scalar() == Some(ScalarType::Int32)
    }

    pub fn has_reference_type(&self) -> bool {
        self.references.is_some()
    }

    pub fn is_nullable(&self) -> bool {
        self.data_type.is_some_and(|t| t.is_nullable())
    }

    /// Creation, modification or soft-delete timestamp.
    pub fn is_tracking_date(&self) -> bool {
        self.is_date()
            && matches!(
                self.name.as_str(),
                CREATED_FIELD_NAME | MODIFIED_FIELD_NAME | SOFT_DELETE_FIELD_NAME
            )
    }

    /// Soft-delete marker.
    pub fn is_delete(&self) -> bool {
        self.is_date() && self.name == SOFT_DELETE_FIELD_NAME
    }

    /// Full-text search vector.
    pub fn is_search(&self) -> bool {
        self.provider_type_name == SEARCH_PROVIDER_TYPE && self.name == SEARCH_FIELD_NAME
    }

    /// Never returned to callers.
    pub fn is_excluded_from_results(&self) -> bool {
        self.is_delete() || self.is_search()
    }

    pub fn is_file(&self) -> bool {
        self.scalar() == Some(ScalarType::Binary)
    }

    pub fn is_large_text_content(&self) -> bool {
        self.is_text()
            && (self.size.is_some_and(|s| s > LARGE_TEXT_SIZE)
                || self.attributes.flag("largeContent", false))
    }

    pub fn is_color(&self) -> bool {
        self.attributes.is("type", COLOR_FIELD_TYPE)
    }

    pub fn is_rating(&self) -> bool {
        matches!(self.required_scalar(), Some(ScalarType::Int32 | ScalarType::Int16))
            && self.attributes.flag("isRating", false)
    }

    /// Explicit rank, else ordinal plus [`RANK_OFFSET`].
    pub fn rank(&self) -> i64 {
        self.attributes
            .i64("rank")
            .unwrap_or(RANK_OFFSET + i64::from(self.order))
    }

    /// Shown on create forms.
    pub fn add(&self) -> bool {
        self.attributes.flag("add", true)
    }

    /// Shown on edit forms.
    pub fn edit(&self) -> bool {
        self.attributes.flag("edit", true)
    }
}

/// The field used to summarise a type: lowest rank among text fields.
///
/// Ties keep field order. Returns `None` when there is no text field.
pub fn display_field(fields: &[Field]) -> Option<&Field> {
    fields
        .iter()
        .filter(|f| f.is_text())
        .min_by_key(|f| f.rank())
}

/// Structural match used when binding a returned row shape to a type.
///
/// The candidate's excluded fields are ignored. Both sides must then have
/// the same number of fields, and every returned field must appear on the
/// candidate with the same name and provider type. Order is irrelevant.
pub fn fields_match(returned: &[Field], candidate: &[Field]) -> bool {
    let visible: Vec<&Field> = candidate
        .iter()
        .filter(|f| !f.is_excluded_from_results())
        .collect();

    returned.len() == visible.len()
        && returned.iter().all(|r| {
            visible
                .iter()
                .any(|c| c.name == r.name && c.provider_type_name == r.provider_type_name)
        })
}
