//! Post-build advisories.

use schemagen::prelude::*;
use schemagen::sanity::{check_domain, Advisory};

fn build(snapshot: &CatalogSnapshot) -> Domain {
    DomainBuilder::new(TypeMapper::postgres(), DomainOptions::default())
        .build(snapshot)
        .unwrap()
}

#[test]
fn test_empty_domain() {
    let domain = build(&CatalogSnapshot::default());
    let advisories = check_domain(&domain);
    assert_eq!(advisories, vec![Advisory::NoTypes, Advisory::NoOperations]);
}

#[test]
fn test_clean_domain_has_no_advisories() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| {
            t.column("id", "integer").column("name", "text").primary_key("id")
        })
        .routine("public", "customer_select_all", "", "SETOF customer")
        .routine("public", "customer_names", "", "TABLE(name text)")
        .build();

    let domain = build(&snapshot);
    assert!(check_domain(&domain).is_empty());
}

#[test]
fn test_type_not_returned() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| t.column("id", "integer").primary_key("id"))
        .table("public", "secret", |t| {
            t.column("id", "integer")
                .primary_key("id")
                .comment(r#"{"ignore": true}"#)
        })
        .routine("public", "ping", "", "integer")
        .build();

    let domain = build(&snapshot);
    let advisories = check_domain(&domain);

    assert_eq!(
        advisories,
        vec![Advisory::TypeNotReturned {
            type_name: "customer".into()
        }]
    );
}

#[test]
fn test_type_without_fields() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "placeholder", |t| t)
        .routine("public", "placeholder_select_all", "", "SETOF placeholder")
        .build();

    let domain = build(&snapshot);
    assert_eq!(
        check_domain(&domain),
        vec![Advisory::TypeWithoutFields {
            type_name: "placeholder".into()
        }]
    );
}

#[test]
fn test_type_filter_limits_checks() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "customer", |t| t.column("id", "integer").primary_key("id"))
        .table("public", "order", |t| t.column("id", "integer").primary_key("id"))
        .routine("public", "order_select_all", "", "SETOF \"order\"")
        .build();

    let options = DomainOptions {
        type_filter: Some("order".into()),
        ..Default::default()
    };
    let domain = DomainBuilder::new(TypeMapper::postgres(), options)
        .build(&snapshot)
        .unwrap();
    assert!(check_domain(&domain).is_empty());
}

#[test]
fn test_advisory_messages() {
    assert_eq!(Advisory::NoTypes.to_string(), "There are no types in the domain");
    assert_eq!(
        Advisory::ResultTypeWithoutFields {
            type_name: "summary".into()
        }
        .to_string(),
        "Result type 'summary' has no fields"
    );
}
