//! Field classification, including the rules that need the owning type.

use schemagen::model::{TypeWalker, RANK_OFFSET};
use schemagen::prelude::*;

fn build(snapshot: &CatalogSnapshot) -> Domain {
    DomainBuilder::new(TypeMapper::postgres(), DomainOptions::default())
        .build(snapshot)
        .unwrap()
}

fn invoicing() -> CatalogSnapshot {
    CatalogSnapshot::builder()
        .table("public", "app_user", |t| {
            t.column("id", "integer")
                .column("email", "text")
                .primary_key("id")
                .comment(r#"{"isSecurityPrincipal": true}"#)
        })
        .table("public", "invoice", |t| {
            t.column("id", "integer")
                .column("created", "timestamp with time zone")
                .column("modified", "timestamp with time zone")
                .nullable("deleted_date", "timestamp with time zone")
                .column("search_content", "tsvector")
                .column("created_by", "integer")
                .column("modified_by", "integer")
                .nullable("deleted_by", "integer")
                .column("amount", "numeric")
                .column("customer_name", "text")
                .primary_key("id")
                .references("created_by", "public", "app_user", "id")
                .references("modified_by", "public", "app_user", "id")
                .references("deleted_by", "public", "app_user", "id")
        })
        .table("public", "note", |t| {
            t.column("id", "integer")
                .column("body", "text")
                .nullable("deleted_by", "integer")
                .primary_key("id")
                .references("deleted_by", "public", "app_user", "id")
        })
        .table("public", "attachment", |t| {
            t.column("id", "integer")
                .column("content_type", "text")
                .column("thumbnail", "bytea")
                .column("data", "bytea")
                .primary_key("id")
        })
        .table("public", "picture", |t| {
            t.column("id", "integer")
                .column("mime", "text")
                .column("preview", "bytea")
                .primary_key("id")
                .column_comment("mime", r#"{"isContentType": true}"#)
                .column_comment("preview", r#"{"type": "thumbnail"}"#)
        })
        .build()
}

fn type_named<'a>(domain: &'a Domain, name: &str) -> TypeWalker<'a> {
    domain.walk(domain.find_type("public", name).unwrap())
}

// ============================================================================
// User Editable
// ============================================================================

#[test]
fn test_identity_is_not_user_editable() {
    let domain = build(&invoicing());
    let invoice = type_named(&domain, "invoice");
    assert!(!invoice.field("id").unwrap().is_user_editable());
}

#[test]
fn test_tracking_dates_are_not_user_editable() {
    let domain = build(&invoicing());
    let invoice = type_named(&domain, "invoice");

    for name in ["created", "modified"] {
        let field = invoice.field(name).unwrap();
        assert!(field.get().is_tracking_date(), "{name}");
        assert!(!field.is_user_editable(), "{name}");
    }
}

#[test]
fn test_soft_delete_is_not_user_editable() {
    let domain = build(&invoicing());
    let invoice = type_named(&domain, "invoice");

    let deleted = invoice.field("deleted_date").unwrap();
    assert!(deleted.get().is_delete());
    assert!(deleted.get().is_excluded_from_results());
    assert!(!deleted.is_user_editable());
    assert_eq!(invoice.get().delete_type(), DeleteType::Soft);
}

#[test]
fn test_search_is_not_user_editable() {
    let domain = build(&invoicing());
    let invoice = type_named(&domain, "invoice");

    let search = invoice.field("search_content").unwrap();
    assert!(search.get().is_search());
    assert!(!search.is_user_editable());
    assert!(invoice.get().is_searchable());
}

#[test]
fn test_tracking_users_are_not_user_editable() {
    let domain = build(&invoicing());
    let invoice = type_named(&domain, "invoice");

    for name in ["created_by", "modified_by", "deleted_by"] {
        let field = invoice.field(name).unwrap();
        assert!(field.is_tracking_user(), "{name}");
        assert!(!field.is_user_editable(), "{name}");
    }
}

#[test]
fn test_plain_values_are_user_editable() {
    let domain = build(&invoicing());
    let invoice = type_named(&domain, "invoice");

    assert!(invoice.field("amount").unwrap().is_user_editable());
    assert!(invoice.field("customer_name").unwrap().is_user_editable());
}

// ============================================================================
// Tracking User
// ============================================================================

#[test]
fn test_deleted_by_without_soft_delete_is_not_tracking() {
    let domain = build(&invoicing());
    let note = type_named(&domain, "note");

    assert_eq!(note.get().delete_type(), DeleteType::None);
    let deleted_by = note.field("deleted_by").unwrap();
    assert!(!deleted_by.is_tracking_user());
    assert!(deleted_by.is_user_editable());
}

#[test]
fn test_reference_to_plain_type_is_not_tracking() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "person", |t| t.column("id", "integer").primary_key("id"))
        .table("public", "task", |t| {
            t.column("id", "integer")
                .column("created_by", "integer")
                .primary_key("id")
                .references("created_by", "public", "person", "id")
        })
        .build();

    let domain = build(&snapshot);
    let task = type_named(&domain, "task");
    assert!(!task.field("created_by").unwrap().is_tracking_user());
}

// ============================================================================
// Attachments
// ============================================================================

#[test]
fn test_attachment_by_convention() {
    let domain = build(&invoicing());
    let attachment = type_named(&domain, "attachment");

    assert!(attachment.get().is_attachment());
    assert!(attachment.field("content_type").unwrap().is_attachment_content_type());
    assert!(attachment.field("thumbnail").unwrap().is_attachment_thumbnail());
    assert!(!attachment.field("data").unwrap().is_attachment_thumbnail());
}

#[test]
fn test_attachment_roles_by_attribute() {
    let domain = build(&invoicing());
    let picture = type_named(&domain, "picture");

    assert!(!picture.get().is_attachment());
    assert!(picture.field("mime").unwrap().is_attachment_content_type());
    assert!(picture.field("preview").unwrap().is_attachment_thumbnail());
}

#[test]
fn test_content_type_name_outside_attachment() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "document", |t| {
            t.column("id", "integer")
                .column("content_type", "text")
                .primary_key("id")
        })
        .build();

    let domain = build(&snapshot);
    let document = type_named(&domain, "document");
    assert!(!document.field("content_type").unwrap().is_attachment_content_type());
}

// ============================================================================
// Field-local Rules
// ============================================================================

#[test]
fn test_large_text_by_size() {
    let snapshot = CatalogSnapshot::builder()
        .table("public", "article", |t| {
            t.column("id", "integer")
                .sized("title", "character varying", 200)
                .sized("body", "character varying", 4000)
                .primary_key("id")
        })
        .build();

    let domain = build(&snapshot);
    let article = domain.walk(domain.find_type("public", "article").unwrap()).get();

    assert!(!article.field("title").unwrap().1.is_large_text_content());
    assert!(article.field("body").unwrap().1.is_large_text_content());
}

#[test]
fn test_rank_defaults_to_offset_order() {
    let domain = build(&invoicing());
    let invoice = type_named(&domain, "invoice");

    let amount = invoice.field("amount").unwrap().get();
    assert_eq!(amount.rank(), RANK_OFFSET + i64::from(amount.order));
}

#[test]
fn test_referenced_field_walks_to_identity() {
    let domain = build(&invoicing());
    let invoice = type_named(&domain, "invoice");

    let created_by = invoice.field("created_by").unwrap();
    let target = created_by.referenced_field().unwrap();
    assert_eq!(target.name(), "id");
    assert_eq!(target.owner_type().unwrap().name(), "app_user");
}
