//! Authentication feature synthesis.
//!
//! Converts the manifest's auth block into the platform's auth feature.
//! Upstream configuration is permissive (comma strings, boolean
//! autoapprove, omitted grant types); the platform wants explicit lists, so
//! everything is normalized here. Generated client secrets are wired in as
//! parameter references resolved from the configuration templates.

use std::collections::BTreeMap;

use crate::model::definition::{AuthClientConfig, AuthFeature, ParameterRef};
use crate::model::manifest::{Auth, AutoApprove};
use crate::transform::params::secret_name;

/// Grant types required when upstream configuration omits them; the
/// platform's auth API insists on an explicit list.
const DEFAULT_GRANT_TYPES: [&str; 2] = ["authorization_code", "refresh_token"];

/// Build the auth feature from the manifest's auth block.
///
/// `templates` is the manifest's global template catalog, consulted for each
/// client's generated secret.
pub fn synthesize_auth(auth: &Auth, templates: Option<&BTreeMap<String, String>>) -> AuthFeature {
    let clients = auth
        .clients
        .iter()
        .flatten()
        .map(|(id, client)| {
            let scopes = client
                .scope
                .clone()
                .map(|s| s.into_list())
                .unwrap_or_default();

            let autoapprove = match client.autoapprove.clone() {
                // Boolean true means "approve every scope".
                Some(AutoApprove::All(true)) => scopes.clone(),
                Some(AutoApprove::All(false)) | None => Vec::new(),
                Some(AutoApprove::Scopes(list)) => list.into_list(),
            };

            let authorized_grant_types = client
                .authorized_grant_types
                .clone()
                .map(|s| s.into_list())
                .unwrap_or_else(|| DEFAULT_GRANT_TYPES.map(String::from).to_vec());

            let mut parameters = Vec::new();
            if let Some(secret) = templates
                .and_then(|t| t.get(&format!("properties.uaa.clients.{id}.secret")))
            {
                parameters.push(ParameterRef::new(secret_parameter_name(secret)));
            }

            AuthClientConfig {
                id: id.clone(),
                authorized_grant_types,
                scopes,
                autoapprove,
                authorities: client.authorities.clone().map(|a| a.into_list()),
                access_token_validity: client.access_token_validity,
                refresh_token_validity: client.refresh_token_validity,
                parameters,
            }
        })
        .collect();

    AuthFeature {
        auth_zone: "self".to_string(),
        user_authorities: auth.authorities.clone().unwrap_or_default(),
        clients,
    }
}

/// Reduce a secret's template text to the backing parameter name: strip one
/// layer of matching surrounding quotes, unwrap one layer of `((...))`
/// placeholder syntax, then apply secret-name normalization.
fn secret_parameter_name(template: &str) -> String {
    let unquoted = strip_matching_quotes(template);
    secret_name(unwrap_placeholders(unquoted).trim())
}

fn strip_matching_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && matches!(first, b'"' | b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn unwrap_placeholders(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find("((") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find("))") {
            Some(close) => {
                out.push_str(&after[..close]);
                rest = &after[close + 2..];
            }
            None => {
                // Unbalanced placeholder; keep the text as-is.
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}
