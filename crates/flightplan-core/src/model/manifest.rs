//! Role manifest model.
//!
//! The role manifest is the hierarchical input document: deployable roles,
//! the jobs they run, runtime resources, configuration variables and
//! templates, and an optional authentication policy.
//!
//! This is a wire-level model using the manifest's kebab-case field names.
//! It is read-only during transformation: the compiler never mutates it.
//! Loosely-typed manifest values (variable defaults, examples) are kept as
//! `serde_json::Value`; absent optionals are `Option`, not sentinels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The root input document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleManifest {
    /// Ordered list of deployable roles.
    pub roles: Vec<Role>,

    /// Global configuration (variables and templates).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Configuration>,

    /// Optional authentication policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
}

impl RoleManifest {
    /// Global configuration variables, or an empty slice.
    pub fn global_variables(&self) -> &[Variable] {
        self.configuration
            .as_ref()
            .map(|c| c.variables.as_slice())
            .unwrap_or(&[])
    }

    /// Global configuration templates, or an empty map.
    pub fn global_templates(&self) -> Option<&BTreeMap<String, String>> {
        self.configuration.as_ref().map(|c| &c.templates)
    }
}

/// One deployable role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub name: String,

    /// Distinguishes container-image-backed roles from job-backed ones.
    #[serde(rename = "type", default)]
    pub role_type: RoleType,

    /// Free-form tags; `dev-only` roles are excluded from the output.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Jobs the role runs, in manifest order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<Job>,

    /// Runtime resources and exposure.
    pub run: Runtime,

    /// Role-level configuration, overriding global on key collision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Configuration>,
}

impl Role {
    pub fn flight_stage(&self) -> FlightStage {
        self.run.flight_stage
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Task roles run to completion instead of serving indefinitely.
    pub fn is_task(&self) -> bool {
        matches!(self.role_type, RoleType::BoshTask)
            || !matches!(self.flight_stage(), FlightStage::Flight)
    }

    pub fn is_container_image(&self) -> bool {
        matches!(self.role_type, RoleType::Docker)
    }

    /// Role-level variables, or an empty slice.
    pub fn variables(&self) -> &[Variable] {
        self.configuration
            .as_ref()
            .map(|c| c.variables.as_slice())
            .unwrap_or(&[])
    }
}

/// Role backing type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleType {
    #[default]
    Bosh,
    BoshTask,
    Docker,
}

/// Execution phase of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlightStage {
    PreFlight,
    #[default]
    Flight,
    PostFlight,
    Manual,
}

/// A job reference: release plus job name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(rename = "release_name")]
    pub release: String,
}

/// Runtime resources and exposure for a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runtime {
    pub scaling: Scaling,

    /// Memory floor in MB.
    pub memory: u64,

    #[serde(rename = "virtual-cpus")]
    pub virtual_cpus: u64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,

    #[serde(rename = "flight-stage", default)]
    pub flight_stage: FlightStage,

    #[serde(
        rename = "persistent-volumes",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub persistent_volumes: Vec<VolumeSpec>,

    #[serde(
        rename = "shared-volumes",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub shared_volumes: Vec<VolumeSpec>,

    #[serde(
        rename = "exposed-ports",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub exposed_ports: Vec<PortSpec>,

    /// Environment variable names consumed by container-image roles.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,
}

/// Instance count bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaling {
    pub min: u64,
    pub max: u64,
}

/// A volume declaration. The tag is its identity within its scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeSpec {
    pub tag: String,
    /// Size in GB.
    pub size: u64,
    /// Mount path inside the component.
    pub path: String,
}

/// A port declaration. External and internal specifiers are either a single
/// number or an inclusive range written `"A-B"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortSpec {
    pub name: String,
    pub protocol: String,
    pub external: PortValue,
    pub internal: PortValue,
    #[serde(default)]
    pub public: bool,
}

/// A port specifier: integer or range text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(u32),
    Text(String),
}

impl PortValue {
    /// True when the specifier is a textual range (`"A-B"`).
    pub fn is_range(&self) -> bool {
        matches!(self, PortValue::Text(s) if s.contains('-'))
    }

    /// The inclusive bounds of a range specifier, if well-formed.
    pub fn range_bounds(&self) -> Option<(u32, u32)> {
        let PortValue::Text(s) = self else {
            return None;
        };
        let (first, last) = s.split_once('-')?;
        Some((first.trim().parse().ok()?, last.trim().parse().ok()?))
    }

    /// The single port number of a non-range specifier.
    pub fn number(&self) -> Option<u32> {
        match self {
            PortValue::Number(n) => Some(*n),
            PortValue::Text(s) if !s.contains('-') => s.trim().parse().ok(),
            PortValue::Text(_) => None,
        }
    }
}

/// Variables and templates, at global or role scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<Variable>,

    /// Property key (with `properties.` prefix) to template text.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub templates: BTreeMap<String, String>,
}

/// A configuration variable declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Defaults to true when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Defaults to false when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<Generator>,
}

impl Variable {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(true)
    }

    pub fn is_secret(&self) -> bool {
        self.secret.unwrap_or(false)
    }
}

/// A value generator attached to a variable.
///
/// Only the recognized option keys survive deserialization; anything else in
/// the manifest is dropped here rather than downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub generator_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_alt_names: Option<Vec<SubjectAltName>>,
}

/// A subject-alt-name specification for certificate generators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectAltName {
    #[serde(rename = "static", default, skip_serializing_if = "Option::is_none")]
    pub static_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wildcard: Option<String>,
}

/// Authentication policy block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Auth {
    // Declaring a key with an empty value is distinct from omitting it:
    // a declared key is still exported to the launcher environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorities: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clients: Option<BTreeMap<String, AuthClient>>,
}

/// One auth client declaration.
///
/// Upstream configuration allows grant types, scopes, and authorities as
/// either lists or comma-delimited strings; both forms deserialize here and
/// are normalized during synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClient {
    #[serde(
        rename = "authorized-grant-types",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub authorized_grant_types: Option<StringOrList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<StringOrList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoapprove: Option<AutoApprove>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorities: Option<StringOrList>,

    #[serde(
        rename = "access-token-validity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub access_token_validity: Option<u64>,

    #[serde(
        rename = "refresh-token-validity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_token_validity: Option<u64>,
}

/// A list that may arrive as a single comma-delimited string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    /// Normalize to a list, splitting a single string on commas.
    pub fn into_list(self) -> Vec<String> {
        match self {
            StringOrList::One(s) => s.split(',').map(|p| p.trim().to_string()).collect(),
            StringOrList::Many(v) => v,
        }
    }
}

/// Autoapprove is either the boolean `true` ("approve every scope") or an
/// explicit scope list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AutoApprove {
    All(bool),
    Scopes(StringOrList),
}
