//! schemagen CLI - Build a domain model from a Postgres schema
//!
//! Usage:
//!   schemagen inspect [--snapshot <file.json> | --connection <url>] [--json]
//!   schemagen snapshot --output <file.json> [--connection <url>]
//!   schemagen drop-generated [--snapshot <file.json> | --connection <url>] [--execute]
//!
//! Examples:
//!   schemagen inspect --connection "host=localhost dbname=shop" --exclude audit
//!   schemagen snapshot --output shop.json
//!   schemagen inspect --snapshot shop.json --type-name customer --json

use clap::{Parser, Subcommand};
use schemagen::config::{Settings, SettingsError};
use schemagen::metadata::{CatalogSnapshot, MetadataError, PostgresCatalog, SchemaStore};
use schemagen::prelude::*;
use schemagen::{generated, sanity};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "schemagen")]
#[command(about = "schemagen - Build a typed domain model from a Postgres schema")]
#[command(version)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a schemagen.toml file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Read the catalog from a snapshot file instead of a live database
    #[arg(long, conflicts_with = "connection")]
    snapshot: Option<PathBuf>,

    /// Postgres connection string (defaults to the configured one)
    #[arg(long)]
    connection: Option<String>,

    /// Schema to exclude, in addition to the configured ones
    #[arg(long = "exclude")]
    exclude: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the domain and report on it
    Inspect {
        #[command(flatten)]
        source: SourceArgs,

        /// Only report on this type
        #[arg(long)]
        type_name: Option<String>,

        /// Print the domain as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump the live catalog to a snapshot file
    Snapshot {
        /// Postgres connection string (defaults to the configured one)
        #[arg(long)]
        connection: Option<String>,

        /// Schema to exclude, in addition to the configured ones
        #[arg(long = "exclude")]
        exclude: Vec<String>,

        /// Where to write the snapshot
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print DROP statements for previously generated routines and types
    DropGenerated {
        #[command(flatten)]
        source: SourceArgs,

        /// Also run the statements against the live database
        #[arg(long)]
        execute: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Failed to start async runtime: {0}")]
    Runtime(std::io::Error),

    #[error("Failed to encode domain: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = match load_settings(cli.config.as_ref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Inspect {
            source,
            type_name,
            json,
        } => cmd_inspect(&settings, source, type_name, json),
        Commands::Snapshot {
            connection,
            exclude,
            output,
        } => cmd_snapshot(&settings, connection, exclude, output),
        Commands::DropGenerated { source, execute } => {
            cmd_drop_generated(&settings, source, execute)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings, SettingsError> {
    match path {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

fn excluded_schemas(settings: &Settings, extra: &[String]) -> Vec<String> {
    let mut excluded = settings.excluded_schemas.clone();
    for schema in extra {
        if !excluded.contains(schema) {
            excluded.push(schema.clone());
        }
    }
    excluded
}

fn live_catalog(settings: &Settings, connection: Option<String>) -> Result<PostgresCatalog, CliError> {
    let connection_string = match connection {
        Some(connection) => connection,
        None => settings.connection.resolved_connection_string()?,
    };
    Ok(PostgresCatalog::new(connection_string))
}

/// Read the catalog from a snapshot file or the live database.
fn read_catalog(
    settings: &Settings,
    source: &SourceArgs,
    excluded: &[String],
) -> Result<CatalogSnapshot, CliError> {
    if let Some(path) = &source.snapshot {
        info!(path = %path.display(), "reading catalog snapshot");
        return Ok(CatalogSnapshot::load(path)?);
    }

    let catalog = live_catalog(settings, source.connection.clone())?;
    Ok(runtime()?.block_on(catalog.read_snapshot(excluded))?)
}

fn build_domain(
    settings: &Settings,
    catalog: &CatalogSnapshot,
    excluded: Vec<String>,
    type_name: Option<String>,
) -> Result<Domain, CliError> {
    let mut options = settings.domain_options();
    options.excluded_schemas = excluded;
    if type_name.is_some() {
        options.type_filter = type_name;
    }

    let domain = DomainBuilder::new(TypeMapper::postgres(), options)
        .with_naming(settings.naming.store_naming())
        .build(catalog)?;
    Ok(domain)
}

fn cmd_inspect(
    settings: &Settings,
    source: SourceArgs,
    type_name: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let excluded = excluded_schemas(settings, &source.exclude);
    let catalog = read_catalog(settings, &source, &excluded)?;
    let domain = build_domain(settings, &catalog, excluded, type_name)?;
    let advisories = sanity::check_domain(&domain);

    if json {
        println!("{}", serde_json::to_string_pretty(&domain)?);
        return Ok(());
    }

    println!("{}", domain.summary());
    for walker in domain.filtered_types() {
        let application_type = walker.get();
        println!(
            "  {} ({} fields, rank {}{})",
            application_type.qualified_name(),
            application_type.fields.len(),
            walker.rank(),
            if walker.is_link() { ", link" } else { "" }
        );
    }
    if !advisories.is_empty() {
        println!("{} advisories", advisories.len());
    }
    Ok(())
}

fn cmd_snapshot(
    settings: &Settings,
    connection: Option<String>,
    exclude: Vec<String>,
    output: PathBuf,
) -> Result<(), CliError> {
    let excluded = excluded_schemas(settings, &exclude);
    let catalog = live_catalog(settings, connection)?;
    let snapshot = runtime()?.block_on(catalog.read_snapshot(&excluded))?;
    snapshot.save(&output)?;
    info!(path = %output.display(), tables = snapshot.tables.len(), "snapshot written");
    Ok(())
}

fn cmd_drop_generated(settings: &Settings, source: SourceArgs, execute: bool) -> Result<(), CliError> {
    let excluded = excluded_schemas(settings, &source.exclude);
    let catalog = read_catalog(settings, &source, &excluded)?;
    let mut options = settings.domain_options();
    options.excluded_schemas = excluded;
    let script = generated::drop_script(&catalog, &options, &settings.naming.store_naming())?;

    print!("{}", script);

    if execute && !script.is_empty() {
        let store = live_catalog(settings, source.connection)?;
        runtime()?.block_on(store.execute(&script))?;
        info!("generated objects dropped");
    }
    Ok(())
}
