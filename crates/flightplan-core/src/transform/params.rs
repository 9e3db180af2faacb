//! Parameter codec.
//!
//! Converts a single manifest variable into the target parameter
//! representations: a full top-level definition, or the minimal name-only
//! reference used inside a component's parameter list.

use serde_json::Value;

use crate::model::definition::{
    GenerateSpec, GenerateSubjectAltName, ParameterDefinition, ParameterGenerator, ParameterRef,
};
use crate::model::manifest::Variable;

/// Normalize a secret parameter name: the platform's secret store only
/// accepts lowercase names with dashes.
pub fn secret_name(name: &str) -> String {
    name.to_lowercase().replace('_', "-")
}

/// Stringify a loosely-typed manifest value the way the platform expects:
/// strings pass through, scalars format plainly, structures as JSON.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Expand literal `\n` two-character sequences into real line breaks.
///
/// Certificates copied out of env files carry the escaped form. Applied to
/// textual values only; other value kinds pass through untouched.
pub(crate) fn expand_escaped_newlines(value: &Value) -> String {
    match value {
        Value::String(s) => s.replace("\\n", "\n"),
        other => stringify(other),
    }
}

/// Convert a variable declaration into a full parameter definition.
pub fn parameter_definition(var: &Variable) -> ParameterDefinition {
    let secret = var.is_secret();

    let name = if secret {
        secret_name(&var.name)
    } else {
        var.name.clone()
    };

    let mut example = var
        .example
        .as_ref()
        .or(var.default.as_ref())
        .map(stringify)
        .unwrap_or_default();
    if example.is_empty() {
        example = "unknown".to_string();
    }

    let default = if secret {
        None
    } else {
        var.default.as_ref().map(expand_escaped_newlines)
    };

    let generator = var.generator.as_ref().map(|gen| ParameterGenerator {
        id: gen.id.clone().unwrap_or_else(|| name.clone()),
        generate: GenerateSpec {
            generator_type: gen.generator_type.clone(),
            value_type: gen.value_type.clone(),
            length: gen.length,
            characters: gen.characters.clone(),
            key_length: gen.key_length,
            subject_alt_names: gen.subject_alt_names.as_ref().map(|sans| {
                sans.iter()
                    .map(|san| GenerateSubjectAltName {
                        static_name: san.static_name.clone(),
                        parameter: san.parameter.clone(),
                        wildcard: san.wildcard.clone(),
                    })
                    .collect()
            }),
        },
    });

    ParameterDefinition {
        name,
        description: "placeholder".to_string(),
        example,
        required: var.is_required(),
        secret,
        default,
        generator,
    }
}

/// Convert a variable into a name-only reference.
pub fn parameter_ref(var: &Variable) -> ParameterRef {
    ParameterRef::new(var.name.clone())
}

/// Wrap a bare parameter name into a reference.
pub fn parameter_name(name: impl Into<String>) -> ParameterRef {
    ParameterRef::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn var(v: serde_json::Value) -> Variable {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn secret_names_are_lowercase_dashed() {
        let p = parameter_definition(&var(json!({
            "name": "UAA_ADMIN_CLIENT_SECRET",
            "secret": true,
            "default": "sekrit"
        })));
        assert_eq!(p.name, "uaa-admin-client-secret");
        assert!(p.secret);
        assert!(!p.name.contains('_'));
        // Secrets never carry a default value.
        assert!(p.default.is_none());
        // The default still backs the example.
        assert_eq!(p.example, "sekrit");
    }

    #[test]
    fn example_falls_back_to_unknown() {
        let p = parameter_definition(&var(json!({"name": "X"})));
        assert_eq!(p.example, "unknown");
        assert!(p.required);
        assert!(!p.secret);
        assert!(p.default.is_none());
    }

    #[test]
    fn explicit_example_wins_over_default() {
        let p = parameter_definition(&var(json!({
            "name": "DOMAIN",
            "example": "example.com",
            "default": "localhost"
        })));
        assert_eq!(p.example, "example.com");
        assert_eq!(p.default.as_deref(), Some("localhost"));
    }

    #[test]
    fn non_string_defaults_stringify() {
        let p = parameter_definition(&var(json!({"name": "PORT", "default": 8080})));
        assert_eq!(p.default.as_deref(), Some("8080"));
        assert_eq!(p.example, "8080");

        let p = parameter_definition(&var(json!({"name": "FLAG", "default": true})));
        assert_eq!(p.default.as_deref(), Some("true"));
    }

    #[test]
    fn escaped_newlines_expand_in_textual_defaults_only() {
        let p = parameter_definition(&var(json!({
            "name": "CERT",
            "default": "-----BEGIN-----\\nabc\\n-----END-----"
        })));
        assert_eq!(p.default.as_deref(), Some("-----BEGIN-----\nabc\n-----END-----"));

        let p = parameter_definition(&var(json!({"name": "N", "default": 1})));
        assert_eq!(p.default.as_deref(), Some("1"));
    }

    #[test]
    fn generator_keeps_recognized_keys() {
        let p = parameter_definition(&var(json!({
            "name": "SSL_CERT",
            "secret": true,
            "generator": {
                "type": "certificate",
                "value_type": "certificate",
                "key_length": 4096,
                "subject_alt_names": [
                    {"static": "uaa", "parameter": "DOMAIN"},
                    {"wildcard": "*.uaa"}
                ]
            }
        })));
        let gen = p.generator.unwrap();
        // Generator id defaults to the normalized variable name.
        assert_eq!(gen.id, "ssl-cert");
        assert_eq!(gen.generate.generator_type, "certificate");
        assert_eq!(gen.generate.key_length, Some(4096));
        assert!(gen.generate.length.is_none());
        let sans = gen.generate.subject_alt_names.unwrap();
        assert_eq!(sans.len(), 2);
        assert_eq!(sans[0].static_name.as_deref(), Some("uaa"));
        assert_eq!(sans[1].wildcard.as_deref(), Some("*.uaa"));
    }

    #[test]
    fn generator_explicit_id_wins() {
        let p = parameter_definition(&var(json!({
            "name": "TOKEN",
            "generator": {"id": "shared_token", "type": "password"}
        })));
        assert_eq!(p.generator.unwrap().id, "shared_token");
    }

    #[test]
    fn reference_forms_carry_names_through() {
        let r = parameter_ref(&var(json!({"name": "SOME_VAR", "secret": true})));
        // References do not normalize; they carry the name as declared.
        assert_eq!(r.name, "SOME_VAR");

        assert_eq!(parameter_name("x").name, "x");
    }
}
