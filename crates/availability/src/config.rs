//! Target list loading.
//!
//! Targets are read once at startup from a YAML sequence and never change
//! afterwards.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{fmt, fs};

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Method used when a target does not specify one
pub const DEFAULT_METHOD: &str = "GET";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read targets file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse targets file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// One configured endpoint to poll
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Target {
    /// Informational only, never part of the report
    pub name: String,

    pub url: String,

    /// HTTP method, normalised to upper case with `GET` as the default
    #[serde(default, deserialize_with = "null_as_empty")]
    pub method: String,

    /// Request body, only sent for write methods
    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
}

/// YAML null (`~` or a bare key) reads as an unset string
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Target {
    /// Create a GET target with no body or headers
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            method: DEFAULT_METHOD.to_string(),
            body: None,
            headers: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self.normalize();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.get_or_insert_with(BTreeMap::new).insert(name.into(), value.into());
        self
    }

    /// Fill in the default method and upper-case whatever was configured
    fn normalize(&mut self) {
        let method = self.method.trim();
        self.method = if method.is_empty() {
            DEFAULT_METHOD.to_string()
        } else {
            method.to_uppercase()
        };
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.method, self.url)
    }
}

/// Parse a YAML sequence of targets and normalise their methods
pub fn parse_targets(raw: &str) -> Result<Vec<Target>, serde_yaml::Error> {
    // An empty document has no sequence at all
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut targets: Vec<Target> = serde_yaml::from_str(raw)?;
    targets.iter_mut().for_each(Target::normalize);
    Ok(targets)
}

/// Read the targets file at `path`
///
/// URLs are not validated here; a malformed URL only shows up when the target
/// is probed.
pub fn load_targets(path: impl AsRef<Path>) -> Result<Vec<Target>, ConfigError> {
    let path = path.as_ref();

    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

    let targets = parse_targets(&raw)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

    tracing::debug!("Loaded {} targets from {}", targets.len(), path.display());
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
- name: status page
  url: https://status.example.com/health
- name: login
  url: https://api.example.com:8443/login
  method: post
  body: '{"user":"probe"}'
  headers:
    content-type: application/json
    x-probe: "1"
- name: blank method
  url: http://api.example.com/ping
  method: ""
"#;

    #[test]
    fn test_parse_targets_defaults_method() {
        let targets = parse_targets(SAMPLE).unwrap();

        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].method, "GET");
        assert_eq!(targets[2].method, "GET");
    }

    #[test]
    fn test_parse_targets_null_method_defaults_to_get() {
        let targets = parse_targets(
            "- name: tilde\n  url: https://a.example.com/\n  method: ~\n\
             - name: bare\n  url: https://b.example.com/\n  method:\n\
             - name: explicit\n  url: https://c.example.com/\n  method: null\n",
        )
        .unwrap();

        let methods: Vec<&str> = targets.iter().map(|target| target.method.as_str()).collect();
        assert_eq!(methods, vec!["GET", "GET", "GET"]);
    }

    #[test]
    fn test_parse_targets_keeps_order_and_fields() {
        let targets = parse_targets(SAMPLE).unwrap();

        let login = &targets[1];
        assert_eq!(login.name, "login");
        assert_eq!(login.method, "POST");
        assert_eq!(login.body.as_deref(), Some(r#"{"user":"probe"}"#));

        let headers = login.headers.as_ref().unwrap();
        assert_eq!(headers.get("content-type").map(String::as_str), Some("application/json"));
        assert_eq!(headers.get("x-probe").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_parse_targets_requires_url() {
        let result = parse_targets("- name: missing url\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_targets_rejects_mapping() {
        let result = parse_targets("name: not-a-list\nurl: https://example.com\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_targets_empty_document() {
        assert!(parse_targets("").unwrap().is_empty());
        assert!(parse_targets("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_url_is_accepted_at_load() {
        let targets = parse_targets("- name: broken\n  url: not a url\n").unwrap();
        assert_eq!(targets[0].url, "not a url");
    }

    #[test]
    fn test_load_targets_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");

        let err = load_targets(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("missing.yaml"));
    }

    #[test]
    fn test_load_targets_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("targets.yaml");
        fs::write(&path, SAMPLE).unwrap();

        let targets = load_targets(&path).unwrap();
        assert_eq!(targets.len(), 3);
    }

    #[test]
    fn test_target_builder() {
        let target = Target::new("t", "https://example.com")
            .with_method("put")
            .with_body("{}")
            .with_header("x-a", "b");

        assert_eq!(target.method, "PUT");
        assert_eq!(target.body.as_deref(), Some("{}"));
        assert_eq!(target.to_string(), "t (PUT https://example.com)");
    }
}
