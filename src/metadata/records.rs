//! Raw, unresolved catalog records.
//!
//! These mirror what catalog queries return, before any name resolution or
//! type mapping. Every list is fully materialized.

use serde::{Deserialize, Serialize};

/// A table, identified by schema and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    pub schema: String,
    pub name: String,
}

/// One column of a table, as the provider describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRecord {
    /// Possibly quoted.
    pub name: String,
    /// Position within the table, starting at 0.
    pub ordinal: i32,
    /// Provider type name such as `character varying`.
    pub provider_type: String,
    /// Declared size; negative means unbounded.
    #[serde(default)]
    pub size: Option<i32>,
}

/// Nullability from the information schema, which is authoritative over
/// the provider's own flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullabilityRecord {
    pub column: String,
    pub is_nullable: bool,
}

/// Membership of a column in a key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMembershipRecord {
    pub column: String,
    /// `PRIMARY KEY`, `UNIQUE` or `FOREIGN KEY`.
    pub constraint_type: String,
}

impl KeyMembershipRecord {
    pub fn is_primary_key(&self) -> bool {
        self.constraint_type.eq_ignore_ascii_case("PRIMARY KEY")
    }
}

/// A unique constraint with its definition text, e.g. `UNIQUE (a, b)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueConstraintRecord {
    pub name: String,
    pub definition: String,
}

/// One foreign-key edge: owning column to referenced table and column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRecord {
    #[serde(default)]
    pub constraint_name: String,
    pub column: String,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// A comment attached to a table (no column) or to one of its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub schema: String,
    pub table: String,
    #[serde(default)]
    pub column: Option<String>,
    pub text: String,
}

/// A stored routine signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineRecord {
    pub schema: String,
    pub name: String,
    /// Raw argument list, e.g. `id integer, security_user_id_param integer`.
    #[serde(default)]
    pub arguments: String,
    /// Raw return expression, e.g. `SETOF customer` or `TABLE(id integer)`.
    pub result_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A user-defined composite type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTypeRecord {
    pub schema: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One attribute of a composite type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTypeColumnRecord {
    pub name: String,
    /// Type with modifiers, e.g. `character varying(100)`.
    pub data_type: String,
    pub ordinal: i32,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub description: Option<String>,
}
