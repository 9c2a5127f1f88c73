//! Stable identifiers for domain entities.
//!
//! Entities live in vectors owned by the [`Domain`](super::Domain); an id is
//! an index into the matching vector and stays valid for the life of the
//! domain.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResultTypeId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperationId(pub(crate) u32);

/// Position of a field within its owner's field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldId(pub(crate) u32);

macro_rules! index_conversions {
    ($($id:ident),*) => {
        $(
            impl From<usize> for $id {
                fn from(value: usize) -> Self {
                    $id(value as u32)
                }
            }

            impl $id {
                pub fn index(self) -> usize {
                    self.0 as usize
                }
            }
        )*
    };
}

index_conversions!(TypeId, ResultTypeId, OperationId, FieldId);

/// A field on an application type: the target of foreign keys and
/// parameter bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub type_id: TypeId,
    pub field_id: FieldId,
}

impl FieldRef {
    pub fn new(type_id: TypeId, field_id: FieldId) -> Self {
        Self { type_id, field_id }
    }
}

/// The entity that owns a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldOwner {
    Application(TypeId),
    Result(ResultTypeId),
}

/// A field on any owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldKey {
    pub owner: FieldOwner,
    pub field_id: FieldId,
}

impl From<FieldRef> for FieldKey {
    fn from(field_ref: FieldRef) -> Self {
        Self {
            owner: FieldOwner::Application(field_ref.type_id),
            field_id: field_ref.field_id,
        }
    }
}
