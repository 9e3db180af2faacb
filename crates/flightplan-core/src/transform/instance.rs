//! Instance definition merge.
//!
//! The secondary transform: a pre-existing platform instance template gets
//! its parameter defaults overlaid from local developer-environment
//! overrides and the manifest's variable catalog, then stamped with version
//! metadata. No component, volume, port, or auth logic applies here; the
//! template's structure is owned by whoever produced it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::errors::{FlightplanError, FlightplanResult};
use crate::model::manifest::RoleManifest;
use crate::transform::params::{expand_escaped_newlines, secret_name, stringify};
use crate::transform::{sanitize_version_label, TransformOptions};

/// A developer-environment override: the value plus the env file it came
/// from, kept for traceability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevOverride {
    pub source: PathBuf,
    pub value: String,
}

/// One name/value parameter entry in the instance document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceParameter {
    pub name: String,
    pub value: String,
}

/// Merge developer overrides and the manifest's variable catalog into an
/// instance template, returning the augmented document.
pub fn merge_instance(
    template: Value,
    manifest: &RoleManifest,
    overrides: &BTreeMap<String, DevOverride>,
    options: &TransformOptions,
) -> FlightplanResult<Value> {
    let Value::Object(mut document) = template else {
        return Err(FlightplanError::invalid_manifest(
            "instance template must be a JSON object",
        ));
    };

    let mut variables = manifest.global_variables().to_vec();
    for (name, dev) in overrides {
        if let Some(var) = variables.iter_mut().find(|v| &v.name == name) {
            var.default = Some(Value::String(dev.value.clone()));
        }
    }

    let parameters: Vec<InstanceParameter> = variables
        .iter()
        .filter_map(|var| {
            // The platform rejects empty values; leave those parameters out.
            let default = var.default.as_ref()?;
            if stringify(default).is_empty() {
                return None;
            }
            let name = if var.is_secret() {
                secret_name(&var.name)
            } else {
                var.name.clone()
            };
            Some(InstanceParameter {
                name,
                value: expand_escaped_newlines(default),
            })
        })
        .collect();

    document.insert(
        "parameters".to_string(),
        serde_json::to_value(parameters)
            .map_err(|e| FlightplanError::serialization(e.to_string()))?,
    );
    document.insert(
        "sdl_version".to_string(),
        Value::String(sanitize_version_label(&options.version)),
    );
    document.insert(
        "product_version".to_string(),
        Value::String(options.product_version.clone()),
    );

    Ok(Value::Object(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest() -> RoleManifest {
        serde_yaml::from_str(
            r#"
roles: []
configuration:
  variables:
    - {name: DOMAIN, default: localhost}
    - {name: UAA_CERT, secret: true, default: 'line1\nline2'}
    - {name: EMPTY, default: ''}
    - {name: UNSET}
"#,
        )
        .unwrap()
    }

    fn options() -> TransformOptions {
        TransformOptions {
            version: "1.2.3+dirty".to_string(),
            product_version: "9.9.9".to_string(),
            ..TransformOptions::default()
        }
    }

    #[test]
    fn overlays_and_stamps() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "DOMAIN".to_string(),
            DevOverride {
                source: PathBuf::from("settings/network.env"),
                value: "example.com".to_string(),
            },
        );
        overrides.insert(
            "NOT_IN_MANIFEST".to_string(),
            DevOverride {
                source: PathBuf::from("settings/other.env"),
                value: "ignored".to_string(),
            },
        );

        let template = json!({"name": "instance", "instances": 1});
        let out = merge_instance(template, &manifest(), &overrides, &options()).unwrap();

        assert_eq!(out["name"], "instance");
        assert_eq!(out["sdl_version"], "1.2.3-dirty");
        assert_eq!(out["product_version"], "9.9.9");

        let params = out["parameters"].as_array().unwrap();
        // EMPTY and UNSET are dropped; DOMAIN overlaid; UAA_CERT normalized.
        assert_eq!(params.len(), 2);
        assert_eq!(params[0]["name"], "DOMAIN");
        assert_eq!(params[0]["value"], "example.com");
        assert_eq!(params[1]["name"], "uaa-cert");
        assert_eq!(params[1]["value"], "line1\nline2");
    }

    #[test]
    fn existing_parameters_are_replaced() {
        let template = json!({"parameters": [{"name": "OLD", "value": "stale"}]});
        let out =
            merge_instance(template, &manifest(), &BTreeMap::new(), &options()).unwrap();
        let params = out["parameters"].as_array().unwrap();
        assert!(params.iter().all(|p| p["name"] != "OLD"));
    }

    #[test]
    fn non_object_template_is_rejected() {
        let err = merge_instance(json!([]), &manifest(), &BTreeMap::new(), &options())
            .unwrap_err();
        assert!(matches!(err, FlightplanError::InvalidManifest { .. }));
    }
}
