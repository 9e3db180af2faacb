//! The manifest-to-definition transform.
//!
//! [`Transformer`] owns the whole compilation: it initializes an empty
//! definition, reconciles shared filesystems, collects parameters, iterates
//! the roles once, and synthesizes the auth feature last. The transform is
//! synchronous, single-threaded, and idempotent: identical inputs yield
//! byte-identical output.

pub mod auth;
pub mod component;
pub mod instance;
pub mod params;
pub mod ports;
pub mod resolver;
pub mod volumes;

use crate::catalog::PropertyCatalog;
use crate::diagnostics::Diagnostics;
use crate::errors::FlightplanResult;
use crate::model::definition::{Section, TargetDefinition};
use crate::model::manifest::{FlightStage, RoleManifest};
use crate::template::TemplateScanner;
use crate::transform::resolver::ComponentParameters;

/// Run-to-completion roles are retried this many times instead of forever.
const TASK_RETRY_COUNT: u32 = 5;

/// The platform version label allows only this many characters.
const VERSION_LABEL_MAX_LENGTH: usize = 63;

/// Document metadata and image composition inputs.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Definition name.
    pub name: String,

    /// Product version; becomes the sanitized `sdl_version` label.
    pub version: String,

    /// Version of the compiler pipeline producing the document.
    pub product_version: String,

    pub vendor: String,

    /// Image registry host.
    pub repository: String,

    /// Registry organization the role images live under.
    pub organization: String,

    /// Image name prefix, combined with the role name.
    pub image_prefix: String,

    /// Image tag shared by all role images.
    pub image_tag: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            name: "flightplan".to_string(),
            version: "0.0.0".to_string(),
            product_version: "0.0.0".to_string(),
            vendor: "flightplan".to_string(),
            repository: "registry.example.com".to_string(),
            organization: "flightplan".to_string(),
            image_prefix: "fp".to_string(),
            image_tag: "latest".to_string(),
        }
    }
}

/// A completed transform: the definition plus non-fatal diagnostics.
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    pub definition: TargetDefinition,
    pub diagnostics: Diagnostics,
}

/// Compiles role manifests into target definitions.
#[derive(Debug, Clone)]
pub struct Transformer {
    options: TransformOptions,
}

impl Transformer {
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Compile a role manifest into a target definition.
    ///
    /// `catalog` enables precise per-role parameter resolution; without it
    /// every component references all global variables. `scanner` extracts
    /// parameter names from template text.
    pub fn transform(
        &self,
        manifest: &RoleManifest,
        catalog: Option<&PropertyCatalog>,
        scanner: &dyn TemplateScanner,
    ) -> FlightplanResult<TransformOutcome> {
        let mut diagnostics = Diagnostics::default();

        let mut definition = TargetDefinition::new(
            &self.options.name,
            sanitize_version_label(&self.options.version),
            &self.options.product_version,
            &self.options.vendor,
        );

        let shared = volumes::collect_shared_volumes(&manifest.roles)?;
        volumes::emit_shared_volumes(&mut definition, &shared);

        for var in manifest.global_variables() {
            definition.add_parameter(params::parameter_definition(var));
        }

        let resolved = catalog
            .map(|cat| ComponentParameters::resolve(manifest, cat, scanner, &mut diagnostics));

        for role in &manifest.roles {
            // The platform has no manual-task concept, and dev-only roles
            // never ship.
            let section = match role.flight_stage() {
                FlightStage::Manual => continue,
                FlightStage::PreFlight => Section::Preflight,
                FlightStage::Flight => Section::Components,
                FlightStage::PostFlight => Section::Postflight,
            };
            if role.has_tag("dev-only") {
                continue;
            }

            // Tasks must not retry forever; they would flood the platform.
            let retry_count = if role.is_task() { TASK_RETRY_COUNT } else { 0 };

            let comp = component::assemble_role(
                &mut definition,
                manifest,
                role,
                resolved.as_ref(),
                retry_count,
                &self.options,
            )?;
            definition.add_component(section, comp);

            for var in role.variables() {
                definition.add_parameter(params::parameter_definition(var));
            }
        }

        if let Some(auth) = &manifest.auth {
            definition.set_auth(auth::synthesize_auth(auth, manifest.global_templates()));
        }

        Ok(TransformOutcome {
            definition,
            diagnostics,
        })
    }
}

/// Constrain a version string to the platform's label rules: only
/// `[A-Za-z0-9.-]`, at most 63 characters.
pub fn sanitize_version_label(version: &str) -> String {
    version
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .take(VERSION_LABEL_MAX_LENGTH)
        .collect()
}
