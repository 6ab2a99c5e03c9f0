//! API Metadata Example
//!
//! Resolves the API version the way a backend does at startup (manifest
//! `[project]` table first, then init overrides, environment, dotenv,
//! secrets, then the compiled-in default) and prints the OpenAPI metadata a
//! web framework would be constructed with.
//!
//! # Usage
//!
//! ```bash
//! # pyproject.toml in the current directory or its parent
//! cargo run --package api-metadata
//!
//! # manifest elsewhere, environment variables prefixed with API_
//! API_ENVIRONMENT=PROD cargo run --package api-metadata -- \
//!     --manifest-dir ./backend/src --env-prefix API_
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use strata::prelude::*;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "api-metadata", about = "Print OpenAPI metadata with the manifest version")]
struct Args {
    /// API title
    #[arg(long, default_value = "Example Backend")]
    title: String,

    /// Directory the manifest search starts in
    #[arg(long)]
    manifest_dir: Option<PathBuf>,

    /// Manifest file name
    #[arg(long, default_value = "pyproject.toml")]
    manifest_file: PathBuf,

    /// Parent directories searched for the manifest
    #[arg(long, default_value_t = 1)]
    depth: usize,

    /// Fail if the manifest is not found
    #[arg(long)]
    require_manifest: bool,

    /// Prefix for environment variables, dotenv entries and secret files
    #[arg(long, default_value = "")]
    env_prefix: String,

    /// Dotenv file to read
    #[arg(long)]
    dotenv: Option<PathBuf>,

    /// Secrets directory to read
    #[arg(long)]
    secrets_dir: Option<PathBuf>,

    /// Print where each setting came from instead of the metadata
    #[arg(long)]
    origins: bool,

    /// Log every source attempt made while resolving
    #[arg(long)]
    trace_resolution: bool,
}

// ============================================================================
// Tags
// ============================================================================

/// Operation groups, in documentation order.
#[derive(Debug, Clone, Copy)]
enum Tags {
    Accounts,
    Orders,
    Products,
}

impl ApiTag for Tags {
    const ALL: &'static [Self] = &[Self::Accounts, Self::Orders, Self::Products];

    fn name(&self) -> &'static str {
        match self {
            Self::Accounts => "Accounts",
            Self::Orders => "Orders",
            Self::Products => "Products",
        }
    }

    fn metadata(&self) -> Tag {
        let tag = Tag::new(self.name());
        match self {
            Self::Accounts => tag
                .description(
                    "An account allows a *customer* to **log in** and **manage their personal data**.",
                )
                .external_docs("https://example.net/admin/users/", Some("User Management System")),
            Self::Orders => {
                tag.description("An order is a **collection of products** that a *customer* has purchased.")
            }
            Self::Products => tag
                .description("A product is an **item** that can be purchased by a *customer*.")
                .external_docs("https://example.net/products/", Some("Product Catalog")),
        }
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    let log_settings = SettingsLoader::new()
        .env_prefix(args.env_prefix.clone())
        .load(&LoggingConfig::schema()?)?;
    let mut logging = LoggingBuilder::from_config(&LoggingConfig::from_settings(&log_settings)?)
        .with_target(false);
    if args.trace_resolution {
        logging = logging.directive("strata_core=trace");
    }
    logging.init();

    let options = AppOptions {
        manifest_file: args.manifest_file.clone(),
        manifest_dir: args.manifest_dir.clone(),
        manifest_depth: args.depth,
        manifest_required: args.require_manifest,
        env_prefix: args.env_prefix.clone(),
        env_vars: None,
        dotenv: args.dotenv.clone(),
        secrets_dir: args.secrets_dir.clone(),
    };

    // Resolved once; both the metadata and the origin listing read from it.
    let project = ProjectSettings::resolve(&options)?;
    let settings = AppSettings::with_project(&options, project.extract()?)?;
    info!(
        environment = %settings.environment,
        version = %settings.project.version,
        "Settings loaded"
    );

    if args.origins {
        for (key, entry) in project.iter() {
            println!("{key} = {:?} ({})", entry.value, entry.origin);
        }
        return Ok(());
    }

    let metadata = ApiMetadata::new(
        ApiInfo::from_settings(args.title, &project),
        TagList::from_enum::<Tags>()?,
    );
    println!("{}", metadata.to_json_pretty()?);

    Ok(())
}
