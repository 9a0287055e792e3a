use std::env;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Process configuration, loaded from a JSON file whose raw text is run
/// through environment-placeholder expansion before parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Identifier of this connector's webhook subscription in the inventory.
    pub web_hook_id: String,
    /// Base URL of the inventory REST API.
    pub inventory_url: String,
    /// Value for the `Authorization` header on registration requests, if any.
    #[serde(default)]
    pub inventory_authorization_header: String,
    /// Externally reachable base URL of this connector, used as the webhook
    /// callback endpoint.
    pub external_url: String,
    /// Base URL of the PowerDNS API, e.g. "http://127.0.0.1:8081/api/v1".
    pub powerdns_url: String,
    #[serde(default)]
    pub powerdns_api_key: String,
    #[serde(default = "default_server_id")]
    pub powerdns_server_id: String,
    /// Nameservers assigned to every zone this connector creates.
    pub nameservers: Vec<String>,
}

fn default_server_id() -> String {
    "localhost".into()
}

pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let expanded = expand_env_placeholders(&raw);
    let config: Config = serde_json::from_str(&expanded)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Expands `$NAME` and `${NAME}` placeholders from the environment.
/// The braced form supports a literal fallback: `${NAME:default}` resolves to
/// `default` when `NAME` is unset. A `$` not followed by a name passes through.
pub fn expand_env_placeholders(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(inner) = after.strip_prefix('{') {
            if let Some(end) = inner.find('}') {
                out.push_str(&resolve_placeholder(&inner[..end]));
                rest = &inner[end + 1..];
                continue;
            }
        }

        let name_len = after
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        if name_len > 0 {
            out.push_str(&resolve_placeholder(&after[..name_len]));
            rest = &after[name_len..];
        } else {
            out.push('$');
            rest = after;
        }
    }

    out.push_str(rest);
    out
}

/// Resolves a single placeholder name, honoring the `NAME:default` convention.
pub fn resolve_placeholder(placeholder: &str) -> String {
    let (name, fallback) = match placeholder.split_once(':') {
        Some((name, fallback)) => (name, Some(fallback)),
        None => (placeholder, None),
    };
    match env::var(name) {
        Ok(value) => value,
        Err(_) => fallback.unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn placeholder_resolution_with_default_support() {
        unsafe {
            env::set_var("PDNSC_NAME", "gopher");
            env::set_var("PDNSC_BURROW", "/usr/gopher");
        }

        let cases = [
            ("PDNSC_NAME", "gopher"),
            ("PDNSC_BURROW", "/usr/gopher"),
            ("PDNSC_UNSET:default", "default"),
            ("PDNSC_URL:http://default.com", "http://default.com"),
            ("PDNSC_UNSET", ""),
        ];
        for (placeholder, want) in cases {
            assert_eq!(resolve_placeholder(placeholder), want, "{placeholder}");
        }
    }

    #[test]
    fn expansion_handles_both_placeholder_forms() {
        unsafe {
            env::set_var("PDNSC_ANIMAL", "gopher");
        }
        assert_eq!(
            expand_env_placeholders("$PDNSC_ANIMAL lives in ${PDNSC_HOME:/usr/gopher}."),
            "gopher lives in /usr/gopher."
        );
        // a bare dollar sign is left alone
        assert_eq!(expand_env_placeholders("costs 5$ each"), "costs 5$ each");
    }

    #[test]
    fn load_config_expands_placeholders() {
        unsafe {
            env::set_var("PDNSC_AUTH_HEADER", "ah");
        }

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{
                "web_hook_id": "52acd668-3171-45a3-b23a-05adc76dc809",
                "inventory_url": "${{PDNSC_INVENTORY:http://inventory.local}}",
                "inventory_authorization_header": "${{PDNSC_AUTH_HEADER}}",
                "external_url": "http://connector.local",
                "powerdns_url": "http://127.0.0.1:8081/api/v1",
                "nameservers": ["ns1.example.net.", "ns2.example.net."]
            }}"#
        )
        .expect("write config");

        let config = load_config(file.path()).expect("load config");
        assert_eq!(config.web_hook_id, "52acd668-3171-45a3-b23a-05adc76dc809");
        assert_eq!(config.inventory_url, "http://inventory.local");
        assert_eq!(config.inventory_authorization_header, "ah");
        assert_eq!(config.powerdns_server_id, "localhost");
        assert_eq!(config.nameservers.len(), 2);
    }

    #[test]
    fn load_config_missing_file_is_an_error() {
        assert!(load_config("./testdata/nofile").is_err());
    }
}
