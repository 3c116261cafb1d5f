//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every directive so template errors surface at load time
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect server names claimed by more than one scope
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashMap;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::directive::{parse_directive, DirectiveError};
use crate::config::schema::{ScopeConfig, ServiceConfig};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("scope {scope}: {source}")]
    Directive {
        scope: String,
        #[source]
        source: DirectiveError,
    },

    #[error("scope {scope}: {field} {path:?} must be an absolute path")]
    RelativePath {
        scope: String,
        field: &'static str,
        path: String,
    },

    #[error("scope {scope}: alias prefix {prefix:?} must start with '/'")]
    AliasPrefix { scope: String, prefix: String },

    #[error("server name {name:?} is claimed by both {first} and {second}")]
    DuplicateServerName {
        name: String,
        first: String,
        second: String,
    },
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let mut seen = HashMap::new();
    validate_scope(&config.server, "main".to_string(), &mut seen, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_scope(
    scope: &ScopeConfig,
    fallback_name: String,
    seen: &mut HashMap<String, String>,
    errors: &mut Vec<ValidationError>,
) {
    let name = scope
        .name
        .clone()
        .or_else(|| scope.server_names.first().cloned())
        .unwrap_or(fallback_name);

    if let Some(line) = &scope.virtual_document_root {
        if let Err(source) = parse_directive(line) {
            errors.push(ValidationError::Directive {
                scope: name.clone(),
                source,
            });
        }
    }

    if let Some(root) = &scope.document_root {
        if !root.starts_with('/') {
            errors.push(ValidationError::RelativePath {
                scope: name.clone(),
                field: "document_root",
                path: root.clone(),
            });
        }
    }

    for alias in &scope.aliases {
        if !alias.url_prefix.starts_with('/') {
            errors.push(ValidationError::AliasPrefix {
                scope: name.clone(),
                prefix: alias.url_prefix.clone(),
            });
        }
        if !alias.path.starts_with('/') {
            errors.push(ValidationError::RelativePath {
                scope: name.clone(),
                field: "alias path",
                path: alias.path.clone(),
            });
        }
    }

    if let Some(userdir) = &scope.userdir {
        if userdir.enabled && !userdir.home_base.starts_with('/') {
            errors.push(ValidationError::RelativePath {
                scope: name.clone(),
                field: "userdir.home_base",
                path: userdir.home_base.clone(),
            });
        }
    }

    for server_name in &scope.server_names {
        let key = server_name.to_ascii_lowercase();
        if let Some(first) = seen.get(&key) {
            errors.push(ValidationError::DuplicateServerName {
                name: server_name.clone(),
                first: first.clone(),
                second: name.clone(),
            });
        } else {
            seen.insert(key, name.clone());
        }
    }

    for (i, child) in scope.vhost.iter().enumerate() {
        validate_scope(child, format!("{name}/vhost-{i}"), seen, errors);
    }
}
