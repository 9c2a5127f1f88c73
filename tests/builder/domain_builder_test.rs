//! Tests for the four construction passes.

use std::io;
use std::sync::{Arc, Mutex};

use schemagen::attributes::{parse_annotation, Annotation};
use schemagen::metadata::{ColumnRecord, NullabilityRecord, StoreNaming, TableSnapshot};
use schemagen::prelude::*;

fn build(snapshot: &CatalogSnapshot) -> ModelResult<Domain> {
    DomainBuilder::new(TypeMapper::postgres(), DomainOptions::default()).build(snapshot)
}

fn build_excluding(snapshot: &CatalogSnapshot, excluded: &[&str]) -> ModelResult<Domain> {
    let options = DomainOptions {
        excluded_schemas: excluded.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    };
    DomainBuilder::new(TypeMapper::postgres(), options).build(snapshot)
}

fn shop() -> CatalogSnapshot {
    CatalogSnapshot::builder()
        .table("public", "customer", |t| {
            t.column("id", "integer")
                .sized("name", "character varying", 100)
                .nullable("parent_id", "integer")
                .primary_key("id")
                .references("parent_id", "public", "customer", "id")
        })
        .table("sales", "order", |t| {
            t.column("id", "integer")
                .column("customer_id", "integer")
                .column("placed", "timestamp with time zone")
                .primary_key("id")
                .references("customer_id", "public", "customer", "id")
        })
        .table("audit", "event", |t| t.column("id", "integer").primary_key("id"))
        .build()
}

// ============================================================================
// Pass 1: Types and Fields
// ============================================================================

#[test]
fn test_every_table_appears_once_with_its_schema() {
    let domain = build(&shop()).unwrap();

    assert_eq!(domain.types().len(), 3);
    for (schema, name) in [("public", "customer"), ("sales", "order"), ("audit", "event")] {
        let matches: Vec<_> = domain
            .types()
            .iter()
            .filter(|t| t.name == name)
            .collect();
        assert_eq!(matches.len(), 1, "{name} should appear once");
        assert_eq!(matches[0].namespace, schema);
    }
}

#[test]
fn test_store_naming_carries_into_domain() {
    let snapshot = shop();

    let domain = build(&snapshot).unwrap();
    assert_eq!(domain.store_naming().identifier_limit(), 63);

    let domain = DomainBuilder::new(TypeMapper::postgres(), DomainOptions::default())
        .with_naming(StoreNaming::postgres().with_identifier_limit(20))
        .build(&snapshot)
        .unwrap();
    assert_eq!(domain.store_naming().identifier_limit(), 20);
    assert_eq!(
        domain.store_naming().truncate_to_store_limit("customer_select_by_region"),
        "customer_select_by_r"
    );
}

#[test]
fn test_excluded_schema_is_absent() {
    let domain = build_excluding(&shop(), &["audit"]).unwrap();

    assert_eq!(domain.types().len(), 2);
    assert!(domain.types().iter().all(|t| t.namespace != "audit"));
    assert!(domain.find_type("audit", "event").is_none());
}

#[test]
fn test_system_schemas_are_always_skipped() {
    let snapshot = CatalogSnapshot::builder()
        .table("pg_catalog", "pg_class", |t| t.column("oid", "oid"))
        .table("information_schema", "tables", |t| t.column("table_name", "text"))
        .table("public", "customer", |t| t.column("id", "integer").primary_key("id"))
        .build();

    let domain = build(&snapshot).unwrap();
    assert_eq!(domain.types().len(), 1);
}

#[test]
fn test_field_types_and_sizes() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "product", |t| {
            t.column("id", "integer")
                .sized("code", "character varying", 20)
                .sized("notes", "text", -1)
                .column("location", "geometry")
                .primary_key("id")
        })
        .build();

    let domain = build(&snapshot).unwrap();
    let product = &domain.types()[0];

    let (_, code) = product.field("code").unwrap();
    assert_eq!(code.size, Some(20));
    assert_eq!(code.data_type.map(|t| t.scalar), Some(ScalarType::Text));

    let (_, notes) = product.field("notes").unwrap();
    assert_eq!(notes.size, None);

    let (_, location) = product.field("location").unwrap();
    assert!(location.data_type.is_none());
    assert_eq!(location.provider_type_name, "geometry");
}

#[test]
fn test_quoted_column_names_are_unquoted() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "line", |t| {
            t.column("id", "integer")
                .column("\"Order\"", "integer")
                .primary_key("id")
        })
        .build();

    let domain = build(&snapshot).unwrap();
    assert!(domain.types()[0].field("Order").is_some());
}

// ============================================================================
// Pass 2: Nullability, Keys, Constraints
// ============================================================================

#[test]
fn test_nullable_columns_are_wrapped() {
    let domain = build(&shop()).unwrap();
    let customer = &domain.types()[0];

    let (_, parent) = customer.field("parent_id").unwrap();
    assert!(parent.is_nullable());
    assert!(!parent.is_required);

    let (_, id) = customer.field("id").unwrap();
    assert!(!id.is_nullable());
    assert!(id.is_required);
    assert!(id.is_identity);
}

#[test]
fn test_nullability_for_unknown_field_is_fatal() {
    let mut snapshot = shop();
    snapshot.tables[0].nullability.push(NullabilityRecord {
        column: "dropped".into(),
        is_nullable: true,
    });

    let err = build(&snapshot).unwrap_err();
    assert!(matches!(err, ModelError::SchemaInconsistency(_)));
}

#[test]
fn test_primary_key_on_unknown_field_is_fatal() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| t.column("id", "integer").primary_key("code"))
        .build();

    let err = build(&snapshot).unwrap_err();
    assert!(matches!(err, ModelError::SchemaInconsistency(_)));
}

#[test]
fn test_unique_constraint_keeps_definition_order() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| {
            t.column("id", "integer")
                .column("email", "text")
                .column("tenant_id", "integer")
                .primary_key("id")
                .unique("customer_tenant_email_key", "UNIQUE (tenant_id, email)")
        })
        .build();

    let domain = build(&snapshot).unwrap();
    let customer = &domain.types()[0];
    let constraint = &customer.constraints[0];

    assert_eq!(constraint.name, "customer_tenant_email_key");
    let names: Vec<_> = constraint
        .fields
        .iter()
        .map(|id| customer.field_by_id(*id).unwrap().name.as_str())
        .collect();
    assert_eq!(names, vec!["tenant_id", "email"]);
}

#[test]
fn test_unique_constraint_on_unknown_field_is_fatal() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| {
            t.column("id", "integer")
                .primary_key("id")
                .unique("customer_email_key", "UNIQUE (email)")
        })
        .build();

    let err = build(&snapshot).unwrap_err();
    assert!(matches!(err, ModelError::SchemaInconsistency(_)));
}

// ============================================================================
// Pass 3: Attributes
// ============================================================================

#[test]
fn test_table_annotation_sets_ignore() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| {
            t.column("id", "integer")
                .primary_key("id")
                .comment(r#"{"ignore": true}"#)
        })
        .build();

    let domain = build(&snapshot).unwrap();
    assert!(domain.types()[0].ignore());
}

#[test]
fn test_plain_and_malformed_annotations_yield_no_attributes() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| {
            t.column("id", "integer")
                .column("name", "text")
                .primary_key("id")
                .comment("not json")
                .column_comment("name", "{not valid json")
        })
        .build();

    let domain = build(&snapshot).unwrap();
    let customer = &domain.types()[0];
    assert!(customer.attributes.is_none());
    assert!(customer.field("name").unwrap().1.attributes.is_none());

    // Only the brace-prefixed text is reported.
    assert!(matches!(parse_annotation("not json"), Annotation::PlainText));
    assert!(matches!(parse_annotation("{not valid json"), Annotation::Malformed(_)));
}

/// Log sink shared between a test and its subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn test_only_malformed_annotations_are_warned_about() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| {
            t.column("id", "integer")
                .column("name", "text")
                .column("notes", "text")
                .primary_key("id")
                .comment("not json")
                .column_comment("name", "{not valid json")
                .column_comment("notes", "[1, 2]")
        })
        .build();

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    tracing::subscriber::with_default(subscriber, || build(&snapshot).unwrap());

    let output = logs.contents();
    let warnings: Vec<_> = output.lines().filter(|l| l.contains("WARN")).collect();
    assert_eq!(warnings.len(), 1, "{output}");
    assert!(warnings[0].contains("unable to parse annotation"));
    assert!(warnings[0].contains("{not valid json"));
    assert!(!output.contains("[1, 2]"));
}

#[test]
fn test_column_annotation_attaches_to_field() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| {
            t.column("id", "integer")
                .column("name", "text")
                .primary_key("id")
                .column_comment("name", r#"{"rank": 1, "largeContent": true}"#)
        })
        .build();

    let domain = build(&snapshot).unwrap();
    let (_, name) = domain.types()[0].field("name").unwrap();
    assert_eq!(name.rank(), 1);
    assert!(name.is_large_text_content());
}

#[test]
fn test_annotations_for_unknown_targets_are_skipped() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| t.column("id", "integer").primary_key("id"))
        .annotation("public", "dropped_table", None, r#"{"ignore": true}"#)
        .annotation("public", "customer", Some("dropped_column"), r#"{"rank": 1}"#)
        .annotation("audit", "event", None, r#"{"ignore": true}"#)
        .build();

    let domain = build_excluding(&snapshot, &["audit"]).unwrap();
    assert!(domain.types()[0].attributes.is_none());
}

// ============================================================================
// Pass 4: Foreign Keys
// ============================================================================

#[test]
fn test_foreign_keys_resolve_to_type_and_field() {
    let domain = build(&shop()).unwrap();
    let order_id = domain.find_type("sales", "order").unwrap();
    let order = domain.walk(order_id);

    let customer_id = order.field("customer_id").unwrap();
    let target = customer_id.referenced_type().unwrap();
    assert_eq!(target.name(), "customer");
    assert_eq!(customer_id.referenced_field().unwrap().name(), "id");
}

#[test]
fn test_self_reference_resolves() {
    let domain = build(&shop()).unwrap();
    let customer = domain.walk(domain.find_type("public", "customer").unwrap());

    let parent = customer.field("parent_id").unwrap();
    assert_eq!(parent.referenced_type().unwrap().id(), customer.id());
}

#[test]
fn test_foreign_key_to_excluded_schema_is_fatal() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| {
            t.column("id", "integer")
                .column("event_id", "integer")
                .primary_key("id")
                .references("event_id", "audit", "event", "id")
        })
        .table("audit", "event", |t| t.column("id", "integer").primary_key("id"))
        .build();

    let err = build_excluding(&snapshot, &["audit"]).unwrap_err();
    assert!(matches!(err, ModelError::SchemaInconsistency(_)));
}

#[test]
fn test_foreign_key_to_unknown_field_is_fatal() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| t.column("id", "integer").primary_key("id"))
        .table("public", "order", |t| {
            t.column("id", "integer")
                .column("customer_code", "text")
                .primary_key("id")
                .references("customer_code", "public", "customer", "code")
        })
        .build();

    let err = build(&snapshot).unwrap_err();
    assert!(matches!(err, ModelError::SchemaInconsistency(_)));
}

#[test]
fn test_foreign_key_on_unknown_column_is_fatal() {
    let mut snapshot = shop();
    let order = &mut snapshot.tables[1];
    order.foreign_keys[0].column = "client_id".into();

    let err = build(&snapshot).unwrap_err();
    assert!(matches!(err, ModelError::SchemaInconsistency(_)));
}

#[test]
fn test_hand_built_table_snapshot() {
    let snapshot = CatalogSnapshot {
        tables: vec![TableSnapshot {
            schema: "public".into(),
            name: "tag".into(),
            columns: vec![ColumnRecord {
                name: "label".into(),
                ordinal: 0,
                provider_type: "citext".into(),
                size: None,
            }],
            ..Default::default()
        }],
        ..Default::default()
    };

    let domain = build(&snapshot).unwrap();
    assert_eq!(domain.summary().fields, 1);
    assert!(domain.types()[0].fields[0].is_text());
}
