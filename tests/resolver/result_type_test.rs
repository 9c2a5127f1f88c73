//! Result type synthesis, reuse and back-fill.

use schemagen::metadata::SnapshotBuilder;
use schemagen::model::ResultTypeWalker;
use schemagen::prelude::*;

fn build(snapshot: &CatalogSnapshot) -> ModelResult<Domain> {
    DomainBuilder::new(TypeMapper::postgres(), DomainOptions::default()).build(snapshot)
}

fn result_type<'a>(domain: &'a Domain, name: &str) -> ResultTypeWalker<'a> {
    domain.walk(domain.find_result_type(name).unwrap())
}

fn sales() -> SnapshotBuilder {
    CatalogSnapshot::builder()
        .table("public", "app_user", |t| {
            t.column("id", "integer")
                .primary_key("id")
                .comment(r#"{"isSecurityPrincipal": true}"#)
        })
        .table("public", "customer", |t| {
            t.column("id", "integer")
                .sized("name", "character varying", 80)
                .nullable("region", "text")
                .column("created_by", "integer")
                .primary_key("id")
                .references("created_by", "public", "app_user", "id")
                .column_comment("name", r#"{"rank": 1}"#)
        })
}

// ============================================================================
// Synthesis
// ============================================================================

#[test]
fn test_table_return_synthesizes_result_type() {
    let snapshot = sales()
        .routine(
            "public",
            "customer_totals",
            "",
            "TABLE(customer_id integer, label character varying(40), total numeric)",
        )
        .build();

    let domain = build(&snapshot).unwrap();
    let totals = result_type(&domain, "customer_totals_result");
    let op_id = domain.find_operation("public", "customer_totals").unwrap();

    assert_eq!(totals.get().namespace, "public");
    assert_eq!(totals.get().operations, vec![op_id]);
    assert_eq!(
        domain.operation(op_id).returns,
        OperationReturn::CustomType(totals.id())
    );
    assert!(totals.related_type().is_none());

    let label = totals.get().field("label").unwrap();
    assert_eq!(label.provider_type_name, "character varying");
    assert_eq!(label.size, Some(40));
    assert!(label.is_text());

    let total = totals.get().field("total").unwrap();
    assert_eq!(total.data_type.map(|t| t.scalar), Some(ScalarType::Decimal));
}

#[test]
fn test_return_type_name_shares_a_result_type() {
    let summary = r#"{"returnTypeName": "customer_summary"}"#;
    let snapshot = sales()
        .annotated_routine(
            "public",
            "customer_top",
            "",
            "TABLE(id integer, total numeric)",
            summary,
        )
        .annotated_routine(
            "public",
            "customer_recent",
            "",
            "TABLE(total numeric, id integer)",
            summary,
        )
        .build();

    let domain = build(&snapshot).unwrap();
    assert_eq!(domain.result_types().len(), 1);

    let shared = result_type(&domain, "customer_summary");
    let names: Vec<_> = shared.operations().map(|o| o.name()).collect();
    assert_eq!(names, vec!["customer_top", "customer_recent"]);
}

#[test]
fn test_same_name_with_different_shape_is_ambiguous() {
    let summary = r#"{"returnTypeName": "customer_summary"}"#;
    let snapshot = sales()
        .annotated_routine(
            "public",
            "customer_top",
            "",
            "TABLE(id integer, total numeric)",
            summary,
        )
        .annotated_routine(
            "public",
            "customer_recent",
            "",
            "TABLE(id integer, placed date)",
            summary,
        )
        .build();

    let err = build(&snapshot).unwrap_err();
    assert!(matches!(err, ModelError::AmbiguousModel(_)));
}

// ============================================================================
// Back-fill
// ============================================================================

#[test]
fn test_result_fields_inherit_from_application_type() {
    let snapshot = sales()
        .annotated_routine(
            "public",
            "customer_with_balance",
            "",
            "TABLE(id integer, name character varying, region text, created_by integer, balance numeric)",
            r#"{"applicationtype": "customer"}"#,
        )
        .build();

    let domain = build(&snapshot).unwrap();
    let result = result_type(&domain, "customer_with_balance_result");
    let customer = domain.find_type("public", "customer").unwrap();

    assert_eq!(result.related_type().unwrap().id(), customer);
    let fields = &result.get().fields;

    let id = &fields[0];
    assert!(id.is_identity);
    assert!(id.is_required);

    let name = &fields[1];
    assert_eq!(name.size, Some(80));
    assert_eq!(name.rank(), 1);

    // Nullable variant of the result's own type is adopted.
    let region = &fields[2];
    assert!(region.is_nullable());
    assert!(!region.is_required);

    let created_by = &fields[3];
    assert_eq!(
        created_by.references.map(|r| domain.application_type(r.type_id).name.as_str()),
        Some("app_user")
    );

    let balance = &fields[4];
    assert!(!balance.is_identity);
    assert!(balance.references.is_none());
}

#[test]
fn test_unmapped_inherited_field_is_unresolved() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "site", |t| {
            t.column("id", "integer")
                .column("location", "geometry")
                .primary_key("id")
        })
        .annotated_routine(
            "public",
            "site_nearby",
            "",
            "TABLE(id integer, location geometry, distance double precision)",
            r#"{"applicationtype": "site"}"#,
        )
        .build();

    let err = build(&snapshot).unwrap_err();
    assert!(matches!(err, ModelError::UnresolvedType { .. }));
}

#[test]
fn test_result_fields_have_no_owner_type() {
    let snapshot = sales()
        .annotated_routine(
            "public",
            "customer_audit",
            "",
            "TABLE(id integer, created_by integer, note text)",
            r#"{"applicationtype": "customer"}"#,
        )
        .build();

    let domain = build(&snapshot).unwrap();
    let result = result_type(&domain, "customer_audit_result");

    for field in result.fields() {
        assert!(field.owner_type().is_none());
        assert!(!field.is_attachment_content_type());
        assert!(!field.is_attachment_thumbnail());
    }
    let created_by = result.fields().nth(1).unwrap();
    assert_eq!(created_by.referenced_type().unwrap().name(), "app_user");
    assert!(created_by.is_tracking_user());
}

// ============================================================================
// SETOF Custom Types
// ============================================================================

#[test]
fn test_set_of_custom_type() {
    let mut snapshot = sales()
        .custom_type(
            "public",
            "customer_card",
            None,
            &[("id", "integer"), ("headline", "character varying(120)")],
        )
        .routine("public", "customer_cards", "", "SETOF customer_card")
        .routine("public", "customer_cards_recent", "", "SETOF customer_card")
        .build();
    snapshot.custom_types[0].columns[1].is_required = true;
    snapshot.custom_types[0].columns[1].description = Some(r#"{"largeContent": true}"#.into());

    let domain = build(&snapshot).unwrap();
    assert_eq!(domain.result_types().len(), 1);

    let card = result_type(&domain, "customer_card");
    assert_eq!(card.operations().count(), 2);

    let headline = card.get().field("headline").unwrap();
    assert_eq!(headline.size, Some(120));
    assert!(headline.is_required);
    assert!(headline.is_large_text_content());
}

#[test]
fn test_generated_result_marker_resolves_to_application_type() {
    let snapshot = sales()
        .custom_type(
            "public",
            "customer_lite",
            Some(r#"{"generated": true, "isResult": true, "applicationtype": "customer"}"#),
            &[("id", "integer")],
        )
        .routine("public", "customer_select_lite", "", "SETOF customer_lite")
        .build();

    let domain = build(&snapshot).unwrap();
    let customer = domain.find_type("public", "customer").unwrap();
    let op = domain.walk(domain.find_operation("public", "customer_select_lite").unwrap());

    assert_eq!(*op.returns(), OperationReturn::ApplicationType(customer));
    assert!(domain.result_types().is_empty());
}

#[test]
fn test_generated_result_marker_for_missing_type_is_unresolved() {
    let snapshot = sales()
        .custom_type(
            "public",
            "invoice_lite",
            Some(r#"{"generated": true, "isResult": true, "applicationtype": "invoice"}"#),
            &[("id", "integer")],
        )
        .routine("public", "invoice_select_lite", "", "SETOF invoice_lite")
        .build();

    let err = build(&snapshot).unwrap_err();
    assert!(matches!(err, ModelError::UnresolvedType { .. }));
}

// ============================================================================
// Ignore
// ============================================================================

#[test]
fn test_result_type_ignored_only_when_every_operation_is() {
    let summary_ignored = r#"{"returnTypeName": "summary", "ignore": true}"#;
    let summary = r#"{"returnTypeName": "summary"}"#;
    let hidden = r#"{"returnTypeName": "hidden", "ignore": true}"#;

    let snapshot = sales()
        .annotated_routine("public", "a", "", "TABLE(x integer)", summary_ignored)
        .annotated_routine("public", "b", "", "TABLE(x integer)", summary)
        .annotated_routine("public", "c", "", "TABLE(y integer)", hidden)
        .build();

    let domain = build(&snapshot).unwrap();
    assert!(!result_type(&domain, "summary").ignore());
    assert!(result_type(&domain, "hidden").ignore());
}
