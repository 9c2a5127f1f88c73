//! The resolved domain: root aggregate handed to renderers.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::{ModelError, ModelResult};
use crate::metadata::{is_blocked_schema, StoreNaming};

use super::application_type::{ApplicationType, DEFAULT_NAMESPACE};
use super::field::Field;
use super::ids::{FieldId, FieldOwner, FieldRef, OperationId, ResultTypeId, TypeId};
use super::operation::{Operation, SECURITY_USER_ID_PARAM};
use super::result_type::ResultType;
use super::walkers::{TypeWalker, Walker};

/// Settings that shape a domain build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainOptions {
    pub default_namespace: String,
    /// Schemas never loaded, attributed, or scanned.
    pub excluded_schemas: Vec<String>,
    /// Narrow [`Domain::filtered_types`] to one type name.
    #[serde(skip)]
    pub type_filter: Option<String>,
    /// Name of the parameter carrying the current user's id.
    #[serde(skip)]
    pub security_user_param: String,
}

impl Default for DomainOptions {
    fn default() -> Self {
        Self {
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            excluded_schemas: Vec::new(),
            type_filter: None,
            security_user_param: SECURITY_USER_ID_PARAM.to_string(),
        }
    }
}

impl DomainOptions {
    /// Excluded by configuration or a system schema.
    pub fn is_excluded(&self, schema: &str) -> bool {
        self.excluded_schemas.iter().any(|s| s == schema) || is_blocked_schema(schema)
    }
}

/// Types, operations and result types, cross-referenced by id.
#[derive(Debug, Clone, Serialize)]
pub struct Domain {
    pub(crate) types: Vec<ApplicationType>,
    pub(crate) operations: Vec<Operation>,
    pub(crate) result_types: Vec<ResultType>,
    #[serde(flatten)]
    options: DomainOptions,
    #[serde(skip)]
    naming: StoreNaming,
    #[serde(skip)]
    type_index: HashMap<(String, String), TypeId>,
}

impl Domain {
    pub fn new(options: &DomainOptions, naming: StoreNaming) -> Self {
        Self {
            types: Vec::new(),
            operations: Vec::new(),
            result_types: Vec::new(),
            options: options.clone(),
            naming,
            type_index: HashMap::new(),
        }
    }

    /// Walk any entity by id.
    pub fn walk<Id>(&self, id: Id) -> Walker<'_, Id> {
        Walker { id, domain: self }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn types(&self) -> &[ApplicationType] {
        &self.types
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn result_types(&self) -> &[ResultType] {
        &self.result_types
    }

    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.types.len()).map(TypeId::from)
    }

    pub fn operation_ids(&self) -> impl Iterator<Item = OperationId> + '_ {
        (0..self.operations.len()).map(OperationId::from)
    }

    pub fn result_type_ids(&self) -> impl Iterator<Item = ResultTypeId> + '_ {
        (0..self.result_types.len()).map(ResultTypeId::from)
    }

    pub fn application_type(&self, id: TypeId) -> &ApplicationType {
        &self.types[id.index()]
    }

    pub fn operation(&self, id: OperationId) -> &Operation {
        &self.operations[id.index()]
    }

    pub fn result_type(&self, id: ResultTypeId) -> &ResultType {
        &self.result_types[id.index()]
    }

    /// A field on an application type.
    pub fn field(&self, field_ref: FieldRef) -> &Field {
        &self.types[field_ref.type_id.index()].fields[field_ref.field_id.index()]
    }

    /// A field on any owner.
    pub fn owned_field(&self, owner: FieldOwner, field_id: FieldId) -> &Field {
        match owner {
            FieldOwner::Application(id) => &self.types[id.index()].fields[field_id.index()],
            FieldOwner::Result(id) => &self.result_types[id.index()].fields[field_id.index()],
        }
    }

    /// The options the domain was built with.
    pub fn options(&self) -> &DomainOptions {
        &self.options
    }

    pub fn default_namespace(&self) -> &str {
        &self.options.default_namespace
    }

    pub fn excluded_schemas(&self) -> &[String] {
        &self.options.excluded_schemas
    }

    pub fn security_user_param(&self) -> &str {
        &self.options.security_user_param
    }

    /// Identifier rules of the store the domain was read from.
    pub fn store_naming(&self) -> &StoreNaming {
        &self.naming
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn find_type(&self, namespace: &str, name: &str) -> Option<TypeId> {
        self.type_index
            .get(&(namespace.to_string(), name.to_string()))
            .copied()
    }

    /// First type with this name in any namespace.
    pub fn find_type_by_name(&self, name: &str) -> Option<TypeId> {
        self.types
            .iter()
            .position(|t| t.name == name)
            .map(TypeId::from)
    }

    pub fn find_result_type(&self, name: &str) -> Option<ResultTypeId> {
        self.result_types
            .iter()
            .position(|t| t.name == name)
            .map(ResultTypeId::from)
    }

    pub fn find_operation(&self, namespace: &str, name: &str) -> Option<OperationId> {
        self.operations
            .iter()
            .position(|o| o.namespace == namespace && o.name == name)
            .map(OperationId::from)
    }

    /// All types, or only the one named by the type filter.
    pub fn filtered_types(&self) -> Vec<TypeWalker<'_>> {
        self.type_ids()
            .filter(|&id| match &self.options.type_filter {
                Some(name) => &self.types[id.index()].name == name,
                None => true,
            })
            .map(|id| self.walk(id))
            .collect()
    }

    /// Identity field of the security-principal type, if there is one.
    pub fn user_identity(&self) -> ModelResult<Option<FieldRef>> {
        let mut principals = self
            .type_ids()
            .filter(|&id| self.types[id.index()].is_security_principal());

        let Some(type_id) = principals.next() else {
            return Ok(None);
        };

        if principals.next().is_some() {
            return Err(ModelError::ambiguous(
                "more than one type is marked as the security principal",
            ));
        }

        let (field_id, _) = self.application_type(type_id).identity_field()?;
        Ok(Some(FieldRef::new(type_id, field_id)))
    }

    pub fn summary(&self) -> DomainSummary {
        DomainSummary {
            types: self.types.len(),
            fields: self.types.iter().map(|t| t.fields.len()).sum(),
            operations: self.operations.len(),
            result_types: self.result_types.len(),
        }
    }

    // =========================================================================
    // Construction
    // =========================================================================

    pub(crate) fn push_type(&mut self, application_type: ApplicationType) -> TypeId {
        let id = TypeId::from(self.types.len());
        self.type_index.insert(
            (
                application_type.namespace.clone(),
                application_type.name.clone(),
            ),
            id,
        );
        self.types.push(application_type);
        id
    }

    pub(crate) fn push_operation(&mut self, operation: Operation) -> OperationId {
        let id = OperationId::from(self.operations.len());
        self.operations.push(operation);
        id
    }

    pub(crate) fn push_result_type(&mut self, result_type: ResultType) -> ResultTypeId {
        let id = ResultTypeId::from(self.result_types.len());
        self.result_types.push(result_type);
        id
    }

    pub(crate) fn type_mut(&mut self, id: TypeId) -> &mut ApplicationType {
        &mut self.types[id.index()]
    }

    pub(crate) fn result_type_mut(&mut self, id: ResultTypeId) -> &mut ResultType {
        &mut self.result_types[id.index()]
    }

    /// Id the next pushed result type will receive.
    pub(crate) fn next_result_type_id(&self) -> ResultTypeId {
        ResultTypeId::from(self.result_types.len())
    }

    /// Id the next pushed operation will receive.
    pub(crate) fn next_operation_id(&self) -> OperationId {
        OperationId::from(self.operations.len())
    }
}

/// Entity counts, for logging and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DomainSummary {
    pub types: usize,
    pub fields: usize,
    pub operations: usize,
    pub result_types: usize,
}

impl fmt::Display for DomainSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} types ({} fields), {} operations, {} result types",
            self.types, self.fields, self.operations, self.result_types
        )
    }
}
