//! Component assembly.
//!
//! Builds one target component per eligible role, wiring in the resolved
//! volumes, ports, entrypoint, and parameter references. Routing into the
//! preflight/components/postflight sections is the orchestrator's job.

use crate::errors::{FlightplanError, FlightplanResult};
use crate::model::definition::{Component, TargetDefinition};
use crate::model::manifest::{Auth, Role, RoleManifest, Runtime};
use crate::transform::params::{parameter_name, parameter_ref};
use crate::transform::resolver::{self, ComponentParameters};
use crate::transform::{ports, volumes, TransformOptions};

/// Wrapper prepended to every synthesized entrypoint.
const ENV_WRAPPER: &str = "/usr/bin/env";

/// Launcher started after the environment assignments.
const LAUNCHER_PATH: &str = "/opt/flightplan/run.sh";

/// Hostname suffix assignment for components with no public port.
const INTERNAL_HOSTNAME_SUFFIX: &str = "HCP_HOSTNAME_SUFFIX=-int";

/// Build the target component for one role.
///
/// Private volumes are exported into `definition` as a side effect; the
/// component itself is returned for the caller to route by flight stage.
pub fn assemble_role(
    definition: &mut TargetDefinition,
    manifest: &RoleManifest,
    role: &Role,
    resolved: Option<&ComponentParameters>,
    retry_count: u32,
    options: &TransformOptions,
) -> FlightplanResult<Component> {
    let runtime = &role.run;

    let mut component = Component {
        name: role.name.clone(),
        version: "0.0.0".to_string(),
        vendor: options.vendor.clone(),
        image: format!(
            "{}/{}-{}:{}",
            options.organization, options.image_prefix, role.name, options.image_tag
        ),
        repository: options.repository.clone(),
        min_ram_mb: runtime.memory,
        min_disk_gb: 1,
        min_vcpu: runtime.virtual_cpus,
        platform: "linux-x86_64".to_string(),
        capabilities: runtime.capabilities.clone(),
        depends_on: Vec::new(),
        affinity: Vec::new(),
        labels: vec![role.name.clone()],
        min_instances: runtime.scaling.min,
        max_instances: runtime.scaling.max,
        service_ports: Vec::new(),
        volume_mounts: Vec::new(),
        parameters: Vec::new(),
        workload_type: "container".to_string(),
        retry_count: (retry_count > 0).then_some(retry_count),
        entrypoint: None,
    };

    // Container-image roles ship their own entrypoint.
    if !role.is_container_image() {
        component.entrypoint = Some(build_entrypoint(runtime, manifest.auth.as_ref())?);
    }

    volumes::attach_volumes(
        definition,
        &mut component,
        &runtime.persistent_volumes,
        false,
    );
    volumes::attach_volumes(definition, &mut component, &runtime.shared_volumes, true);

    ports::attach_ports(&mut component, &runtime.exposed_ports)?;

    // Global parameters arrive as name-only references.
    for name in resolver::lookup(resolved, role, manifest.global_variables()) {
        component.add_parameter(parameter_name(name));
    }

    // Role-local variables reference their own declarations.
    for var in role.variables() {
        component.add_parameter(parameter_ref(var));
    }

    // Container-image roles receive no generated parameters, so their
    // declared environment variable names are referenced explicitly.
    if role.is_container_image() {
        for name in &runtime.env {
            component.add_parameter(parameter_name(name.clone()));
        }
    }

    Ok(component)
}

/// Synthesize the ordered command list launching a job-backed role.
fn build_entrypoint(runtime: &Runtime, auth: Option<&Auth>) -> FlightplanResult<Vec<String>> {
    let mut entrypoint = vec![ENV_WRAPPER.to_string()];

    if !runtime.exposed_ports.iter().any(|port| port.public) {
        entrypoint.push(INTERNAL_HOSTNAME_SUFFIX.to_string());
    }

    if let Some(auth) = auth {
        // A declared key is exported even when its value is empty.
        if let Some(clients) = &auth.clients {
            let clients = serde_json::to_string(clients)
                .map_err(|e| FlightplanError::serialization(e.to_string()))?;
            entrypoint.push(format!("UAA_CLIENTS={clients}"));
        }
        if let Some(authorities) = &auth.authorities {
            let authorities = serde_json::to_string(authorities)
                .map_err(|e| FlightplanError::serialization(e.to_string()))?;
            entrypoint.push(format!("UAA_USER_AUTHORITIES={authorities}"));
        }
    }

    entrypoint.push(LAUNCHER_PATH.to_string());
    Ok(entrypoint)
}
