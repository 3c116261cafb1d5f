//! Scope resolution.
//!
//! # Responsibilities
//! - Walk the scope tree once at load time
//! - Apply inheritance so every scope is fully resolved
//! - Look up the scope for a host name at request time
//!
//! # Design Decisions
//! - The directive is inherited as a unit: mode, template and fallback
//!   always come from the same scope
//! - An explicit `none` is a setting, so it is not inherited over
//! - Unknown host names get the main scope

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::config::directive::{parse_directive, DirectiveError};
use crate::config::schema::{AliasConfig, ScopeConfig, UserDirConfig};
use crate::vhost::VhostAlias;

pub const MAIN_SCOPE: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("scope {scope}: {source}")]
pub struct ScopeError {
    pub scope: String,
    #[source]
    pub source: DirectiveError,
}

/// A scope with inheritance already applied.
#[derive(Debug, Clone)]
pub struct ResolvedScope {
    pub name: String,
    pub server_names: Vec<String>,
    pub vhost: Arc<VhostAlias>,
    pub document_root: Option<String>,
    pub aliases: Vec<AliasConfig>,
    pub userdir: Option<UserDirConfig>,
}

impl ResolvedScope {
    fn empty() -> Self {
        Self {
            name: MAIN_SCOPE.to_string(),
            server_names: Vec::new(),
            vhost: Arc::new(VhostAlias::unset()),
            document_root: None,
            aliases: Vec::new(),
            userdir: None,
        }
    }

    /// Name used when the request carries no usable Host header.
    pub fn default_server_name(&self) -> Option<&str> {
        self.server_names.first().map(String::as_str)
    }
}

/// All resolved scopes, indexed by server name.
#[derive(Debug, Clone)]
pub struct ScopeTable {
    scopes: Vec<ResolvedScope>,
    by_name: HashMap<String, usize>,
}

impl ScopeTable {
    pub fn new(root: &ScopeConfig) -> Result<Self, ScopeError> {
        let mut scopes = Vec::new();
        resolve_into(root, &ResolvedScope::empty(), MAIN_SCOPE.to_string(), &mut scopes)?;

        let mut by_name = HashMap::new();
        for (i, scope) in scopes.iter().enumerate() {
            for name in &scope.server_names {
                by_name.entry(name.to_ascii_lowercase()).or_insert(i);
            }
        }

        Ok(Self { scopes, by_name })
    }

    /// The outermost server scope.
    pub fn main(&self) -> &ResolvedScope {
        &self.scopes[0]
    }

    /// Scope answering for `host`, or the main scope.
    pub fn for_host(&self, host: &str) -> &ResolvedScope {
        self.index_for_host(host)
            .map(|i| &self.scopes[i])
            .unwrap_or_else(|| self.main())
    }

    /// Position of the scope answering for `host`, if any.
    pub fn index_for_host(&self, host: &str) -> Option<usize> {
        self.by_name.get(&host.to_ascii_lowercase()).copied()
    }

    pub fn scopes(&self) -> &[ResolvedScope] {
        &self.scopes
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

fn resolve_into(
    scope: &ScopeConfig,
    parent: &ResolvedScope,
    fallback_name: String,
    out: &mut Vec<ResolvedScope>,
) -> Result<(), ScopeError> {
    let name = scope
        .name
        .clone()
        .or_else(|| scope.server_names.first().cloned())
        .unwrap_or(fallback_name);

    let vhost = match &scope.virtual_document_root {
        Some(line) => Arc::new(parse_directive(line).map_err(|source| ScopeError {
            scope: name.clone(),
            source,
        })?),
        None => parent.vhost.clone(),
    };

    let resolved = ResolvedScope {
        server_names: scope.server_names.clone(),
        vhost,
        document_root: scope
            .document_root
            .clone()
            .or_else(|| parent.document_root.clone()),
        aliases: if scope.aliases.is_empty() {
            parent.aliases.clone()
        } else {
            scope.aliases.clone()
        },
        userdir: scope.userdir.clone().or_else(|| parent.userdir.clone()),
        name,
    };

    tracing::debug!(
        scope = %resolved.name,
        mode = ?resolved.vhost.mode(),
        inherited = scope.virtual_document_root.is_none(),
        "Scope resolved"
    );

    out.push(resolved.clone());
    for (i, child) in scope.vhost.iter().enumerate() {
        resolve_into(child, &resolved, format!("{}/vhost-{}", resolved.name, i), out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vhost::Mode;

    fn scope(names: &[&str], directive: Option<&str>) -> ScopeConfig {
        ScopeConfig {
            server_names: names.iter().map(|s| s.to_string()).collect(),
            virtual_document_root: directive.map(String::from),
            ..ScopeConfig::default()
        }
    }

    #[test]
    fn test_child_inherits_whole_directive() {
        let mut root = scope(&["example.com"], Some("VirtualDocumentRootWithFallback /p/%1 /p/default"));
        root.vhost.push(scope(&["child.example.com"], None));

        let table = ScopeTable::new(&root).unwrap();
        let child = table.for_host("child.example.com");
        assert_eq!(child.name, "child.example.com");
        assert_eq!(child.vhost.mode(), Mode::Name);
        assert_eq!(child.vhost.template().unwrap().source(), "/p/%1");
        assert_eq!(child.vhost.fallback(), Some("/p/default"));
    }

    #[test]
    fn test_child_overrides_atomically() {
        let mut root = scope(&[], Some("VirtualDocumentRootWithFallback /p/%1 /p/default"));
        root.vhost.push(scope(&["ip.example"], Some("VirtualDocumentRootIPWithFallback /ip/%0 /ip/default")));

        let table = ScopeTable::new(&root).unwrap();
        let child = table.for_host("ip.example");
        assert_eq!(child.vhost.mode(), Mode::Ip);
        assert_eq!(child.vhost.template().unwrap().source(), "/ip/%0");
        assert_eq!(child.vhost.fallback(), Some("/ip/default"));
    }

    #[test]
    fn test_explicit_none_is_not_inherited_over() {
        let mut root = scope(&[], Some("VirtualDocumentRootWithFallback /p/%1 /p/default"));
        let mut off = scope(&["off.example"], Some("VirtualDocumentRootWithFallback none /p/default"));
        off.vhost.push(scope(&["deep.off.example"], None));
        root.vhost.push(off);

        let table = ScopeTable::new(&root).unwrap();
        assert_eq!(table.for_host("off.example").vhost.mode(), Mode::None);
        // nearest ancestor wins, even when it disabled the mapping
        assert_eq!(table.for_host("deep.off.example").vhost.mode(), Mode::None);
    }

    #[test]
    fn test_main_without_directive_is_unset() {
        let root = scope(&[], None);
        let table = ScopeTable::new(&root).unwrap();
        assert_eq!(table.main().name, MAIN_SCOPE);
        assert_eq!(table.main().vhost.mode(), Mode::Unset);
    }

    #[test]
    fn test_unknown_host_gets_main_scope() {
        let mut root = scope(&["example.com"], None);
        root.vhost.push(scope(&["a.example.com"], None));
        let table = ScopeTable::new(&root).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.for_host("A.EXAMPLE.COM").name, "a.example.com");
        assert_eq!(table.for_host("nowhere.test").name, "example.com");
        assert_eq!(table.index_for_host("nowhere.test"), None);
    }

    #[test]
    fn test_other_settings_inherit() {
        let mut root = scope(&[], None);
        root.document_root = Some("/var/www".into());
        root.aliases.push(AliasConfig {
            url_prefix: "/icons".into(),
            path: "/usr/share/icons".into(),
        });
        root.vhost.push(scope(&["x.test"], None));

        let table = ScopeTable::new(&root).unwrap();
        let child = table.for_host("x.test");
        assert_eq!(child.document_root.as_deref(), Some("/var/www"));
        assert_eq!(child.aliases.len(), 1);
    }

    #[test]
    fn test_bad_directive_names_scope() {
        let mut root = scope(&[], None);
        let mut bad = scope(&["bad.test"], Some("VirtualDocumentRootWithFallback /p/%q /fb"));
        bad.name = Some("broken".into());
        root.vhost.push(bad);

        let err = ScopeTable::new(&root).unwrap_err();
        assert_eq!(err.scope, "broken");
    }
}
