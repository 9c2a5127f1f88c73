//! Removal and registration of objects created by earlier runs.

use std::sync::Mutex;

use async_trait::async_trait;
use schemagen::generated::{
    drop_generated_operations, drop_generated_types, drop_script, register_generated_operation,
};
use schemagen::metadata::{MetadataError, MetadataResult, SchemaStore, StoreNaming};
use schemagen::prelude::*;

const LONG_NAME: &str = "customer_select_by_region_and_created_date_range_with_pagination_v2";

fn catalog() -> CatalogSnapshot {
    let generated = r#"{"generated": true}"#;
    CatalogSnapshot::builder()
        .table("public", "customer", |t| {
            t.column("id", "integer").column("region", "text").primary_key("id")
        })
        .custom_type(
            "public",
            "customer_lite",
            Some(r#"{"generated": true, "isResult": true, "applicationtype": "customer"}"#),
            &[("id", "integer")],
        )
        .custom_type("public", "customer_card", Some("hand written"), &[("id", "integer")])
        .custom_type("audit", "audit_lite", Some(generated), &[("id", "integer")])
        .annotated_routine("public", "customer_select_lite", "", "SETOF customer_lite", generated)
        .annotated_routine("public", LONG_NAME, "region text", "SETOF customer", generated)
        .annotated_routine("audit", "audit_select_lite", "", "SETOF audit_lite", generated)
        .routine("public", "customer_select_all", "", "SETOF customer")
        .build()
}

fn options() -> DomainOptions {
    DomainOptions {
        excluded_schemas: vec!["audit".into()],
        ..Default::default()
    }
}

#[test]
fn test_drop_generated_operations_truncates_names() {
    let snapshot = catalog();

    let statements =
        drop_generated_operations(&snapshot, &options(), &StoreNaming::postgres()).unwrap();
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[1],
        format!("DROP FUNCTION IF EXISTS public.{};", &LONG_NAME[..63])
    );
}

#[test]
fn test_configured_identifier_limit() {
    let snapshot = catalog();
    let naming = StoreNaming::postgres().with_identifier_limit(20);

    let statements = drop_generated_operations(&snapshot, &options(), &naming).unwrap();
    assert_eq!(statements[0], "DROP FUNCTION IF EXISTS public.customer_select_lite;");
    assert_eq!(statements[1], "DROP FUNCTION IF EXISTS public.customer_select_by_r;");
}

#[test]
fn test_drop_generated_operations_with_unresolvable_return_type() {
    // The generated result type was already dropped, so the domain itself
    // cannot be built, yet the routine still has to go.
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| t.column("id", "integer").primary_key("id"))
        .annotated_routine(
            "public",
            "customer_select_lite",
            "",
            "SETOF customer_lite",
            r#"{"generated": true}"#,
        )
        .build();
    assert!(DomainBuilder::new(TypeMapper::postgres(), options())
        .build(&snapshot)
        .is_err());

    let script = drop_script(&snapshot, &options(), &StoreNaming::postgres()).unwrap();
    assert_eq!(script, "DROP FUNCTION IF EXISTS public.customer_select_lite;\n");
}

#[test]
fn test_drop_generated_types_skips_excluded_and_hand_written() {
    let snapshot = catalog();

    let statements = drop_generated_types(&snapshot, &options()).unwrap();
    assert_eq!(statements, vec!["DROP TYPE IF EXISTS public.customer_lite;"]);
}

#[test]
fn test_drop_script() {
    let snapshot = catalog();

    let script = drop_script(&snapshot, &options(), &StoreNaming::postgres()).unwrap();
    insta::assert_snapshot!(script, @r"
    DROP FUNCTION IF EXISTS public.customer_select_lite;
    DROP FUNCTION IF EXISTS public.customer_select_by_region_and_created_date_range_with_paginatio;
    DROP TYPE IF EXISTS public.customer_lite;
    ");
}

#[test]
fn test_drop_script_empty_without_generated_objects() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| t.column("id", "integer").primary_key("id"))
        .routine("public", "customer_select_all", "", "SETOF customer")
        .build();

    assert_eq!(
        drop_script(&snapshot, &options(), &StoreNaming::postgres()).unwrap(),
        ""
    );
}

// ============================================================================
// Registration
// ============================================================================

#[derive(Default)]
struct RecordingStore {
    executed: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait]
impl SchemaStore for RecordingStore {
    async fn read_snapshot(&self, _excluded_schemas: &[String]) -> MetadataResult<CatalogSnapshot> {
        Ok(CatalogSnapshot::default())
    }

    async fn execute(&self, statement: &str) -> MetadataResult<()> {
        if self.fail {
            return Err(MetadataError::Execute {
                message: "syntax error".into(),
                statement: statement.into(),
            });
        }
        self.executed.lock().unwrap().push(statement.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn test_register_generated_operation() {
    let store = RecordingStore::default();
    let text = "CREATE FUNCTION public.customer_count() RETURNS integer AS $$ SELECT 1 $$ LANGUAGE sql;";

    register_generated_operation(&store, text).await.unwrap();
    assert_eq!(*store.executed.lock().unwrap(), vec![text.to_string()]);
}

#[tokio::test]
async fn test_register_generated_operation_propagates_failure() {
    let store = RecordingStore {
        fail: true,
        ..Default::default()
    };

    let err = register_generated_operation(&store, "CREATE FUNCTION broken(")
        .await
        .unwrap_err();
    assert!(err.is_connection());
    assert!(store.executed.lock().unwrap().is_empty());
}
