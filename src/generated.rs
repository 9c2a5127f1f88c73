//! Hooks for round-tripping generated SQL through the schema store.
//!
//! Objects created by a previous run carry a `generated` attribute. These
//! helpers produce the statements that remove them and push newly
//! generated routine text back into the store.

use tracing::{error, info};

use crate::attributes::{read_optional_attributes, OptionalAttributes};
use crate::metadata::{sanitize_name, MetadataResult, MetadataSource, SchemaStore, StoreNaming};
use crate::model::DomainOptions;

/// `DROP FUNCTION` statements for every generated routine outside the
/// excluded schemas.
///
/// Reads routine records directly so that a generated routine whose return
/// type no longer resolves can still be dropped.
pub fn drop_generated_operations<S: MetadataSource + ?Sized>(
    source: &S,
    options: &DomainOptions,
    naming: &StoreNaming,
) -> MetadataResult<Vec<String>> {
    Ok(source
        .routines()?
        .into_iter()
        .filter(|r| !options.is_excluded(&r.schema))
        .filter(|r| read_optional_attributes(r.description.as_deref()).flag("generated", false))
        .map(|r| {
            let name = sanitize_name(&r.name);
            format!(
                "DROP FUNCTION IF EXISTS {}.{};",
                r.schema,
                naming.truncate_to_store_limit(&name)
            )
        })
        .collect())
}

/// `DROP TYPE` statements for every generated custom type outside the
/// excluded schemas.
pub fn drop_generated_types<S: MetadataSource + ?Sized>(
    source: &S,
    options: &DomainOptions,
) -> MetadataResult<Vec<String>> {
    Ok(source
        .custom_types()?
        .into_iter()
        .filter(|t| !options.is_excluded(&t.schema))
        .filter(|t| read_optional_attributes(t.description.as_deref()).flag("generated", false))
        .map(|t| format!("DROP TYPE IF EXISTS {}.{};", t.schema, t.name))
        .collect())
}

/// Operations first, since generated functions depend on generated types.
pub fn drop_script<S: MetadataSource + ?Sized>(
    source: &S,
    options: &DomainOptions,
    naming: &StoreNaming,
) -> MetadataResult<String> {
    let mut statements = drop_generated_operations(source, options, naming)?;
    statements.extend(drop_generated_types(source, options)?);
    Ok(statements
        .into_iter()
        .map(|s| s + "\n")
        .collect::<String>())
}

/// Execute newly generated routine text against the store.
pub async fn register_generated_operation<T: SchemaStore + ?Sized>(
    store: &T,
    text: &str,
) -> MetadataResult<()> {
    match store.execute(text).await {
        Ok(()) => {
            info!(bytes = text.len(), "registered generated operation");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, attempted = text, "unable to register generated operation");
            Err(err)
        }
    }
}
