//! TOML-based configuration for schemagen.
//!
//! Supports a config file (schemagen.toml) with environment variable
//! expansion in the connection string.
//!
//! Example configuration:
//! ```toml
//! application_name = "shop"
//! excluded_schemas = ["audit", "staging"]
//! default_namespace = "public"
//! add_generated_options_to_database = false
//!
//! [connection]
//! connection_string = "host=localhost user=app password=${SHOP_DB_PASSWORD} dbname=shop"
//!
//! [naming]
//! identifier_limit = 63
//! security_user_id_param = "security_user_id_param"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::metadata::{StoreNaming, POSTGRES_IDENTIFIER_LIMIT};
use crate::model::{DomainOptions, DEFAULT_NAMESPACE, SECURITY_USER_ID_PARAM};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SCHEMAGEN_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("No connection string configured")]
    NoConnection,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Name used by renderers for the generated application.
    pub application_name: Option<String>,

    /// Schemas never loaded into the domain.
    pub excluded_schemas: Vec<String>,

    /// Restrict per-type output to a single type, for debugging.
    pub type_name: Option<String>,

    /// Namespace assumed when none is given.
    pub default_namespace: String,

    /// Register generated routines back into the database.
    pub add_generated_options_to_database: bool,

    pub connection: ConnectionSettings,

    pub naming: NamingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            application_name: None,
            excluded_schemas: Vec::new(),
            type_name: None,
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            add_generated_options_to_database: false,
            connection: ConnectionSettings::default(),
            naming: NamingSettings::default(),
        }
    }
}

/// Database connection.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Connection string (supports ${ENV_VAR} expansion).
    pub connection_string: Option<String>,
}

impl ConnectionSettings {
    /// Get the connection string with environment variables expanded.
    pub fn resolved_connection_string(&self) -> Result<String, SettingsError> {
        match &self.connection_string {
            Some(raw) => expand_env_vars(raw),
            None => Err(SettingsError::NoConnection),
        }
    }
}

/// Identifier rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NamingSettings {
    /// Maximum identifier length in bytes.
    pub identifier_limit: usize,

    /// Parameter that carries the current user's id.
    pub security_user_id_param: String,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            identifier_limit: POSTGRES_IDENTIFIER_LIMIT,
            security_user_id_param: SECURITY_USER_ID_PARAM.to_string(),
        }
    }
}

impl NamingSettings {
    pub fn store_naming(&self) -> StoreNaming {
        StoreNaming::postgres().with_identifier_limit(self.identifier_limit)
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SCHEMAGEN_CONFIG`
    /// 2. `./schemagen.toml`
    /// 3. `~/.config/schemagen/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("schemagen.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("schemagen").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Options for a domain build.
    pub fn domain_options(&self) -> DomainOptions {
        DomainOptions {
            default_namespace: self.default_namespace.clone(),
            excluded_schemas: self.excluded_schemas.clone(),
            type_filter: self.type_name.clone(),
            security_user_param: self.naming.security_user_id_param.clone(),
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
        }

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
