//! Target definition model.
//!
//! This is the flat declarative document handed to the workload platform.
//! It is the sole mutable structure of the compiler: created empty, filled
//! in a single top-to-bottom pass through append-only methods, and returned
//! whole for serialization.
//!
//! Field order matches the platform's document layout; optional fields are
//! omitted from the output rather than serialized as null.

use serde::{Deserialize, Serialize};

/// The compiled platform definition document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDefinition {
    pub name: String,

    /// Version label; platform-constrained charset, max 63 chars.
    pub sdl_version: String,

    pub product_version: String,
    pub vendor: String,

    pub volumes: Vec<VolumeEntry>,
    pub components: Vec<Component>,
    pub features: Features,
    pub parameters: Vec<ParameterDefinition>,
    pub preflight: Vec<Component>,
    pub postflight: Vec<Component>,
}

impl TargetDefinition {
    /// Create an empty definition carrying only document metadata.
    pub fn new(
        name: impl Into<String>,
        sdl_version: impl Into<String>,
        product_version: impl Into<String>,
        vendor: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sdl_version: sdl_version.into(),
            product_version: product_version.into(),
            vendor: vendor.into(),
            volumes: Vec::new(),
            components: Vec::new(),
            features: Features::default(),
            parameters: Vec::new(),
            preflight: Vec::new(),
            postflight: Vec::new(),
        }
    }

    pub fn add_volume(&mut self, v: VolumeEntry) {
        self.volumes.push(v);
    }

    pub fn add_parameter(&mut self, p: ParameterDefinition) {
        self.parameters.push(p);
    }

    /// Append a component to the section owning its flight stage.
    pub fn add_component(&mut self, section: Section, c: Component) {
        match section {
            Section::Preflight => self.preflight.push(c),
            Section::Components => self.components.push(c),
            Section::Postflight => self.postflight.push(c),
        }
    }

    pub fn set_auth(&mut self, auth: AuthFeature) {
        self.features.auth = Some(vec![auth]);
    }
}

/// Output section a component is routed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Preflight,
    Components,
    Postflight,
}

/// Platform feature slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Features {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Vec<AuthFeature>>,
}

/// One exported filesystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeEntry {
    pub name: String,
    pub size_gb: u64,
    pub filesystem: String,
    pub shared: bool,
}

/// One deployable unit derived from a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub version: String,
    pub vendor: String,

    /// Container image name.
    pub image: String,
    pub repository: String,

    #[serde(rename = "min_RAM_mb")]
    pub min_ram_mb: u64,
    pub min_disk_gb: u64,
    #[serde(rename = "min_VCPU")]
    pub min_vcpu: u64,

    pub platform: String,
    pub capabilities: Vec<String>,

    pub depends_on: Vec<Dependency>,
    pub affinity: Vec<String>,
    pub labels: Vec<String>,

    pub min_instances: u64,
    pub max_instances: u64,

    pub service_ports: Vec<ServicePort>,
    pub volume_mounts: Vec<VolumeMount>,
    pub parameters: Vec<ParameterRef>,

    pub workload_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<Vec<String>>,
}

impl Component {
    pub fn add_service_port(&mut self, p: ServicePort) {
        self.service_ports.push(p);
    }

    pub fn add_volume_mount(&mut self, m: VolumeMount) {
        self.volume_mounts.push(m);
    }

    pub fn add_parameter(&mut self, p: ParameterRef) {
        self.parameters.push(p);
    }
}

/// Reference to another component (unused by the manifest model, but part
/// of the document schema).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub version: String,
    pub vendor: String,
}

/// One forwarded service port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePort {
    pub name: String,
    pub protocol: String,
    pub source_port: u32,
    pub target_port: u32,
    pub public: bool,
}

/// One volume mount inside a component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeMount {
    pub volume_name: String,
    pub mountpoint: String,
}

/// A full top-level parameter definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    pub description: String,
    pub example: String,
    pub required: bool,
    pub secret: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<ParameterGenerator>,
}

/// A generator block on a parameter definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterGenerator {
    pub id: String,
    pub generate: GenerateSpec,
}

/// Generator options surviving the codec's key filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSpec {
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
    pub subject_alt_names: Option<Vec<GenerateSubjectAltName>>,
}

/// A filtered subject-alt-name entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSubjectAltName {
    #[serde(rename = "static", default, skip_serializing_if = "Option::is_none")]
    pub static_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wildcard: Option<String>,
}

/// A name-only parameter reference inside a component or auth client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRef {
    pub name: String,
}

impl ParameterRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The synthesized auth feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthFeature {
    pub auth_zone: String,
    pub user_authorities: Vec<String>,
    pub clients: Vec<AuthClientConfig>,
}

/// One normalized auth client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClientConfig {
    pub id: String,
    pub authorized_grant_types: Vec<String>,
    pub scopes: Vec<String>,
    pub autoapprove: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorities: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_validity: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_validity: Option<u64>,

    pub parameters: Vec<ParameterRef>,
}
