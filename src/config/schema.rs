//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.
//!
//! ```toml
//! [server]
//! server_names = ["example.com"]
//! virtual_document_root = "VirtualDocumentRootWithFallback /sites/%1/htdocs /sites/default"
//!
//! [[server.vhost]]
//! name = "intranet"
//! server_names = ["intra.example.com"]
//! virtual_document_root = "VirtualDocumentRootIPWithFallback /ip/%0 /sites/default"
//! ```

use serde::{Deserialize, Serialize};

/// Root configuration for the translation service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Main server scope; virtual hosts nest inside it.
    pub server: ScopeConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter (e.g. "info", "vhost_fallback=debug").
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "vhost_fallback=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// A server or virtual-host scope.
///
/// Unset fields are inherited from the enclosing scope.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ScopeConfig {
    /// Scope identifier for logging. Defaults to the first server name.
    pub name: Option<String>,

    /// Host names this scope answers for (exact, case-insensitive).
    pub server_names: Vec<String>,

    /// A `VirtualDocumentRoot*WithFallback` directive line.
    pub virtual_document_root: Option<String>,

    /// Plain document root used when no earlier stage maps the request.
    pub document_root: Option<String>,

    /// URL prefix to filesystem path mappings; the first match in config
    /// order wins.
    pub aliases: Vec<AliasConfig>,

    /// Per-user directories under `/~user`.
    pub userdir: Option<UserDirConfig>,

    /// Nested scopes.
    pub vhost: Vec<ScopeConfig>,
}

/// One `Alias <url-prefix> <path>` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AliasConfig {
    pub url_prefix: String,
    pub path: String,
}

/// User directory settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UserDirConfig {
    pub enabled: bool,

    /// Directory holding per-user home directories.
    pub home_base: String,

    /// Directory inside each home that is published.
    pub dir: String,
}

impl Default for UserDirConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            home_base: "/home".to_string(),
            dir: "public_html".to_string(),
        }
    }
}
