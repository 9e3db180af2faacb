//! flightplan: compile role manifests into platform definition documents.

mod devenv;
mod load;
mod telemetry;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use flightplan_core::diagnostics::{DiagLevel, Diagnostics};
use flightplan_core::transform::instance::merge_instance;
use flightplan_core::{MustacheScanner, TransformOptions, Transformer};

use crate::devenv::InstanceFlavor;

#[derive(Debug, Parser)]
#[command(name = "flightplan", version, about = "Role manifest compiler")]
struct Cli {
    /// Emit logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile a role manifest into a platform definition document.
    Definition(DefinitionArgs),

    /// Augment an instance-definition template with local defaults.
    Instance(InstanceArgs),
}

#[derive(Debug, Args)]
struct DefinitionArgs {
    /// Role manifest (YAML).
    manifest: PathBuf,

    /// Property catalog (JSON, release → job → property names). Enables
    /// precise per-role parameter resolution.
    #[arg(long)]
    property_catalog: Option<PathBuf>,

    /// Write the document here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[command(flatten)]
    options: OptionArgs,
}

#[derive(Debug, Args)]
struct InstanceArgs {
    /// Role manifest (YAML).
    manifest: PathBuf,

    /// Instance-definition template (JSON).
    template: PathBuf,

    /// Root of the developer settings directories.
    #[arg(long, default_value = "settings")]
    settings_root: PathBuf,

    /// Settings flavor to layer.
    #[arg(long, value_enum, default_value_t = InstanceFlavor::Basic)]
    flavor: InstanceFlavor,

    /// Write the document here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[command(flatten)]
    options: OptionArgs,
}

/// Document metadata and image composition flags, shared by both commands.
#[derive(Debug, Args)]
struct OptionArgs {
    /// Definition name.
    #[arg(long, default_value = "flightplan")]
    name: String,

    /// Product version; sanitized into the sdl_version label.
    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    release_version: String,

    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    product_version: String,

    #[arg(long, default_value = "flightplan")]
    vendor: String,

    /// Image registry host.
    #[arg(long, default_value = "registry.example.com")]
    repository: String,

    /// Registry organization holding the role images.
    #[arg(long, default_value = "flightplan")]
    organization: String,

    /// Image name prefix.
    #[arg(long, default_value = "fp")]
    image_prefix: String,

    /// Image tag shared by all role images.
    #[arg(long, default_value = "latest")]
    image_tag: String,
}

impl From<OptionArgs> for TransformOptions {
    fn from(args: OptionArgs) -> Self {
        Self {
            name: args.name,
            version: args.release_version,
            product_version: args.product_version,
            vendor: args.vendor,
            repository: args.repository,
            organization: args.organization,
            image_prefix: args.image_prefix,
            image_tag: args.image_tag,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.log_json)?;

    match cli.command {
        Command::Definition(args) => run_definition(args),
        Command::Instance(args) => run_instance(args),
    }
}

fn run_definition(args: DefinitionArgs) -> Result<()> {
    let manifest = load::load_manifest(&args.manifest)?;
    let catalog = args
        .property_catalog
        .as_deref()
        .map(load::load_property_catalog)
        .transpose()?;

    let transformer = Transformer::new(args.options.into());
    let outcome = transformer
        .transform(&manifest, catalog.as_ref(), &MustacheScanner)
        .context("compiling role manifest")?;

    emit_diagnostics(&outcome.diagnostics);

    let json = serde_json::to_string_pretty(&outcome.definition)?;
    write_output(args.output.as_deref(), &json)
}

fn run_instance(args: InstanceArgs) -> Result<()> {
    let manifest = load::load_manifest(&args.manifest)?;
    let template = load::load_instance_template(&args.template)?;

    let dirs = devenv::settings_dirs(&args.settings_root, args.flavor);
    let overrides = devenv::collect_dev_env(&dirs)?;
    info!(count = overrides.len(), "collected dev environment overrides");

    let options: TransformOptions = args.options.into();
    let merged = merge_instance(template, &manifest, &overrides, &options)
        .context("merging instance definition")?;

    let json = serde_json::to_string_pretty(&merged)?;
    write_output(args.output.as_deref(), &json)
}

fn emit_diagnostics(diagnostics: &Diagnostics) {
    for diag in &diagnostics.items {
        match diag.level {
            DiagLevel::Warning => warn!(code = %diag.code, "{}", diag.message),
            DiagLevel::Info => info!(code = %diag.code, "{}", diag.message),
        }
    }
}

fn write_output(output: Option<&std::path::Path>, json: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{json}\n"))
            .with_context(|| format!("writing {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}
