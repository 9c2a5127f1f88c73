//! Configuration for schemagen.
//!
//! Handles the TOML settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, ConnectionSettings, NamingSettings, Settings, SettingsError, CONFIG_ENV_VAR,
};
