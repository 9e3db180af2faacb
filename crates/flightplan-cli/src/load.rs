//! Input loaders.
//!
//! The compiler core only consumes structured data; this module turns the
//! on-disk representations (YAML role manifest, JSON property catalog, JSON
//! instance template) into it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use flightplan_core::model::manifest::RoleManifest;
use flightplan_core::PropertyCatalog;

/// Load and parse a YAML role manifest.
pub fn load_manifest(path: &Path) -> Result<RoleManifest> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading role manifest {}", path.display()))?;
    serde_yaml::from_str(&text)
        .with_context(|| format!("parsing role manifest {}", path.display()))
}

/// Load a JSON property catalog (release → job → property names).
pub fn load_property_catalog(path: &Path) -> Result<PropertyCatalog> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading property catalog {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing property catalog {}", path.display()))
}

/// Load a JSON instance-definition template.
pub fn load_instance_template(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading instance template {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing instance template {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_manifest_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "roles:\n  - name: web\n    run:\n      scaling: {{min: 1, max: 1}}\n      memory: 64\n      virtual-cpus: 1\n"
        )
        .unwrap();
        let manifest = load_manifest(file.path()).unwrap();
        assert_eq!(manifest.roles.len(), 1);
        assert_eq!(manifest.roles[0].name, "web");
    }

    #[test]
    fn loads_property_catalog_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"routing\": {{\"gorouter\": [\"port\"]}}}}").unwrap();
        let catalog = load_property_catalog(file.path()).unwrap();
        assert!(catalog.has_release("routing"));
    }

    #[test]
    fn missing_file_carries_path_context() {
        let err = load_manifest(Path::new("/does/not/exist.yml")).unwrap_err();
        assert!(format!("{err:#}").contains("/does/not/exist.yml"));
    }
}
