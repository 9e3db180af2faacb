//! Component parameter resolution.
//!
//! Computes, per role, the minimal sorted set of distinct parameter names
//! its effective templates actually reference. Three catalogs are
//! cross-referenced:
//!
//! 1. the manifest: role → jobs (release, job name)
//! 2. the property catalog: release → job → declared property names
//! 3. the template index: property key → parameter names in its template
//!
//! Jobs referencing unknown releases or job names are reported as warning
//! diagnostics and skipped; they are never fatal.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::PropertyCatalog;
use crate::diagnostics::{codes, DiagLevel, Diagnostic, Diagnostics};
use crate::model::manifest::{Role, RoleManifest, Variable};
use crate::template::TemplateScanner;
use crate::transform::params::secret_name;

/// Precomputed role → sorted parameter names, built once per transform when
/// a property catalog is supplied.
#[derive(Debug, Clone, Default)]
pub struct ComponentParameters {
    by_role: BTreeMap<String, Vec<String>>,
}

impl ComponentParameters {
    /// Resolve every role's parameter set against the property catalog.
    pub fn resolve(
        manifest: &RoleManifest,
        catalog: &PropertyCatalog,
        scanner: &dyn TemplateScanner,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut by_role = BTreeMap::new();

        for role in &manifest.roles {
            if role.jobs.is_empty() {
                diagnostics.push(
                    Diagnostic::new(
                        DiagLevel::Info,
                        codes::ROLE_WITHOUT_JOBS,
                        format!("role {}: no jobs, skipping parameter resolution", role.name),
                    )
                    .with_field("role", &role.name),
                );
                continue;
            }

            let index = template_index(manifest, role, scanner);
            let mut names = BTreeSet::new();

            for job in &role.jobs {
                let Some(properties) = catalog.job_properties(&job.release, &job.name) else {
                    let (code, message) = if catalog.has_release(&job.release) {
                        (
                            codes::UNKNOWN_JOB,
                            format!(
                                "role {}: reference to unknown job {} @{}",
                                role.name, job.name, job.release
                            ),
                        )
                    } else {
                        (
                            codes::UNKNOWN_RELEASE,
                            format!(
                                "role {}: reference to unknown release {}",
                                role.name, job.release
                            ),
                        )
                    };
                    diagnostics.push(
                        Diagnostic::new(DiagLevel::Warning, code, message)
                            .with_field("role", &role.name)
                            .with_field("release", &job.release)
                            .with_field("job", &job.name),
                    );
                    continue;
                };

                for property in properties {
                    // The catalog keys properties by short name; the template
                    // index carries the `properties.` prefix.
                    let key = format!("properties.{property}");

                    // Properties without a template entry are used with their
                    // defaults. They cannot change and reference no parameters.
                    if let Some(parameters) = index.get(&key) {
                        names.extend(parameters.iter().cloned());
                    }
                }
            }

            by_role.insert(role.name.clone(), names.into_iter().collect());
        }

        Self { by_role }
    }

    /// The resolved set for a role, if it was resolved.
    pub fn get(&self, role: &str) -> Option<&[String]> {
        self.by_role.get(role).map(|v| v.as_slice())
    }
}

/// Parameter names a role's component should reference from the global
/// configuration. Without precomputed resolution (no property catalog) this
/// is intentionally coarse: every declared variable name.
pub fn lookup(
    resolved: Option<&ComponentParameters>,
    role: &Role,
    variables: &[Variable],
) -> Vec<String> {
    match resolved {
        Some(parameters) => parameters
            .get(&role.name)
            .map(|names| names.to_vec())
            .unwrap_or_default(),
        // Secret variables define themselves under their normalized name,
        // so the fallback must reference that name too.
        None => variables
            .iter()
            .map(|v| {
                if v.is_secret() {
                    secret_name(&v.name)
                } else {
                    v.name.clone()
                }
            })
            .collect(),
    }
}

/// Build a role's template-parameter index: global template declarations
/// first, role-level ones overriding on key collision, each mapped to the
/// parameter names its text references.
fn template_index(
    manifest: &RoleManifest,
    role: &Role,
    scanner: &dyn TemplateScanner,
) -> BTreeMap<String, BTreeSet<String>> {
    let mut index = BTreeMap::new();

    if let Some(templates) = manifest.global_templates() {
        for (property, template) in templates {
            index.insert(property.clone(), scanner.parameters_in(template));
        }
    }

    if let Some(configuration) = &role.configuration {
        for (property, template) in &configuration.templates {
            index.insert(property.clone(), scanner.parameters_in(template));
        }
    }

    index
}
