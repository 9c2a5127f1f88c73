//! Settings files and their translation into build options.

use std::env;
use std::fs;

use schemagen::config::{Settings, SettingsError, CONFIG_ENV_VAR};
use tempfile::TempDir;

const SHOP_CONFIG: &str = r#"
application_name = "shop"
excluded_schemas = ["audit", "staging"]
default_namespace = "sales"
add_generated_options_to_database = true

[connection]
connection_string = "host=localhost dbname=shop password=${SCHEMAGEN_SETTINGS_TEST_PASSWORD}"

[naming]
identifier_limit = 30
"#;

fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "schemagen.toml", SHOP_CONFIG);

    let settings = Settings::from_file(&path).unwrap();

    assert_eq!(settings.application_name.as_deref(), Some("shop"));
    assert_eq!(settings.excluded_schemas, vec!["audit", "staging"]);
    assert_eq!(settings.default_namespace, "sales");
    assert!(settings.add_generated_options_to_database);
    assert_eq!(settings.naming.identifier_limit, 30);
    assert_eq!(settings.naming.security_user_id_param, "security_user_id_param");
}

#[test]
fn test_from_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.toml");

    let err = Settings::from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::FileNotFound(p) if p == path));
}

#[test]
fn test_from_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "broken.toml", "excluded_schemas = \"audit\"");

    let err = Settings::from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::ParseError(_)));
}

#[test]
fn test_connection_string_expands_environment() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "schemagen.toml", SHOP_CONFIG);
    let settings = Settings::from_file(&path).unwrap();

    env::set_var("SCHEMAGEN_SETTINGS_TEST_PASSWORD", "s3cret");
    assert_eq!(
        settings.connection.resolved_connection_string().unwrap(),
        "host=localhost dbname=shop password=s3cret"
    );
    env::remove_var("SCHEMAGEN_SETTINGS_TEST_PASSWORD");

    assert!(matches!(
        settings.connection.resolved_connection_string(),
        Err(SettingsError::MissingEnvVar(_))
    ));
}

#[test]
fn test_domain_options() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "schemagen.toml", SHOP_CONFIG);
    let settings = Settings::from_file(&path).unwrap();

    let options = settings.domain_options();
    assert_eq!(options.default_namespace, "sales");
    assert!(options.type_filter.is_none());
    assert!(options.is_excluded("audit"));
    assert!(options.is_excluded("pg_catalog"));
    assert!(!options.is_excluded("public"));
}

#[test]
fn test_store_naming_uses_identifier_limit() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "schemagen.toml", SHOP_CONFIG);
    let settings = Settings::from_file(&path).unwrap();

    let naming = settings.naming.store_naming();
    assert_eq!(
        naming.truncate_to_store_limit("customer_select_by_region_and_date"),
        "customer_select_by_region_and_"
    );
}

#[test]
fn test_load_from_environment_path() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "custom.toml", "type_name = \"customer\"");

    env::set_var(CONFIG_ENV_VAR, &path);
    let settings = Settings::load();
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(settings.unwrap().type_name.as_deref(), Some("customer"));
}
