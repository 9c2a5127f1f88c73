//! The resolved domain model.
//!
//! ```text
//!   Domain
//!   ├── types:        Vec<ApplicationType>   (TypeId)
//!   │     └── fields: Vec<Field>             (FieldId)
//!   ├── operations:   Vec<Operation>         (OperationId)
//!   │     └── parameters
//!   └── result_types: Vec<ResultType>        (ResultTypeId)
//!         └── fields
//! ```
//!
//! Entities refer to each other by id. Use [`Domain::walk`] to get a
//! [`Walker`] for predicates that need to follow those ids.

mod application_type;
mod domain;
mod field;
mod ids;
mod operation;
mod result_type;
mod walkers;

pub use application_type::{ApplicationType, Constraint, DeleteType, ATTACHMENT_TYPE_NAME, DEFAULT_NAMESPACE};
pub use domain::{Domain, DomainOptions, DomainSummary};
pub use field::{
    display_field, fields_match, Field, CONTENT_TYPE_FIELD_NAME, CREATED_FIELD_NAME,
    DELETED_FIELD_PREFIX, LARGE_TEXT_SIZE, MODIFIED_FIELD_NAME, RANK_OFFSET, SEARCH_FIELD_NAME,
    SOFT_DELETE_FIELD_NAME, THUMBNAIL_FIELD_NAME,
};
pub use ids::{FieldId, FieldKey, FieldOwner, FieldRef, OperationId, ResultTypeId, TypeId};
pub use operation::{Operation, OperationReturn, Parameter, PARAM_SUFFIX, SECURITY_USER_ID_PARAM};
pub use result_type::ResultType;
pub use walkers::{FieldWalker, OperationWalker, ResultTypeWalker, TypeWalker, Walker};
