//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::scope::{ScopeError, ScopeTable};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Scope(#[from] ScopeError),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A validated configuration with every scope resolved.
///
/// Immutable; a reload builds a new one.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub service: ServiceConfig,
    pub scopes: ScopeTable,
}

impl RuntimeConfig {
    pub fn from_config(service: ServiceConfig) -> Result<Self, ConfigError> {
        validate_config(&service).map_err(ConfigError::Validation)?;
        let scopes = ScopeTable::new(&service.server)?;
        Ok(Self { service, scopes })
    }
}

/// Parse, validate and resolve configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RuntimeConfig, ConfigError> {
    let config: ServiceConfig = toml::from_str(content)?;
    RuntimeConfig::from_config(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RuntimeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vhost::Mode;

    const SAMPLE: &str = r#"
[listener]
bind_address = "127.0.0.1:8088"

[server]
server_names = ["example.com"]
virtual_document_root = "VirtualDocumentRootWithFallback /sites/%1/htdocs /sites/default"
document_root = "/var/www"

[[server.aliases]]
url_prefix = "/icons"
path = "/usr/share/icons"

[[server.vhost]]
name = "intranet"
server_names = ["intra.example.com"]
virtual_document_root = "VirtualDocumentRootIPWithFallback /ip/%0 /sites/default"

[[server.vhost]]
server_names = ["legacy.example.com"]

[[server.vhost.vhost]]
server_names = ["old.legacy.example.com"]
virtual_document_root = "VirtualDocumentRootWithFallback none /sites/default"
"#;

    #[test]
    fn test_parse_sample() {
        let runtime = parse_config(SAMPLE).unwrap();
        assert_eq!(runtime.service.listener.bind_address, "127.0.0.1:8088");
        assert_eq!(runtime.scopes.len(), 4);

        assert_eq!(runtime.scopes.main().vhost.mode(), Mode::Name);
        assert_eq!(runtime.scopes.for_host("intra.example.com").name, "intranet");
        assert_eq!(runtime.scopes.for_host("intra.example.com").vhost.mode(), Mode::Ip);
        assert_eq!(runtime.scopes.for_host("legacy.example.com").vhost.mode(), Mode::Name);
        assert_eq!(
            runtime.scopes.for_host("old.legacy.example.com").vhost.mode(),
            Mode::None
        );
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let runtime = parse_config("").unwrap();
        assert_eq!(runtime.service.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(runtime.scopes.main().vhost.mode(), Mode::Unset);
    }

    #[test]
    fn test_bad_template_fails_load() {
        let err = parse_config(
            r#"
[server]
virtual_document_root = "VirtualDocumentRootWithFallback /sites/%1.x /fb"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        assert!(err.to_string().contains("syntax error in format string"));
    }

    #[test]
    fn test_toml_errors_surface() {
        assert!(matches!(parse_config("[server"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vhost.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(load_config(&path).unwrap().scopes.len(), 4);

        assert!(matches!(
            load_config(&dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
