//! Translate stages.
//!
//! # Stages
//! - `alias`: URL prefix → filesystem path, first match in config order
//! - `userdir`: `/~user/rest` → `<home_base>/<user>/<dir>/rest`
//! - `vhost_alias_fallback`: host-derived document root with fallback
//! - `document_root`: plain `document_root + uri`
//!
//! # Design Decisions
//! - A stage either handles the request or leaves it untouched
//! - Stages hold only immutable, already-resolved configuration

use std::fmt;
use std::sync::Arc;

use crate::config::schema::{AliasConfig, UserDirConfig};
use crate::routing::request::RequestRec;
use crate::vhost::{DirProbe, Translation, VhostAlias};

/// Result of offering a request to one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    Declined,
}

/// One step of name translation.
pub trait TranslateStage: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn translate(&self, req: &mut RequestRec) -> Outcome;
}

/// `Alias` mappings.
#[derive(Debug, Clone)]
pub struct AliasStage {
    aliases: Vec<AliasConfig>,
}

impl AliasStage {
    pub const NAME: &'static str = "alias";

    pub fn new(aliases: Vec<AliasConfig>) -> Self {
        Self { aliases }
    }
}

/// Length of the URI prefix matched by `prefix`, if it matches on a
/// segment boundary.
fn alias_match(uri: &str, prefix: &str) -> Option<usize> {
    let rest = uri.strip_prefix(prefix)?;
    if prefix.ends_with('/') || rest.is_empty() || rest.starts_with('/') {
        Some(prefix.len())
    } else {
        None
    }
}

impl TranslateStage for AliasStage {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn translate(&self, req: &mut RequestRec) -> Outcome {
        for alias in &self.aliases {
            if let Some(len) = alias_match(&req.uri, &alias.url_prefix) {
                req.filename = Some(format!("{}{}", alias.path, &req.uri[len..]));
                return Outcome::Handled;
            }
        }
        Outcome::Declined
    }
}

/// Per-user public directories.
#[derive(Debug, Clone)]
pub struct UserDirStage {
    config: Option<UserDirConfig>,
}

impl UserDirStage {
    pub const NAME: &'static str = "userdir";

    pub fn new(config: Option<UserDirConfig>) -> Self {
        Self { config }
    }
}

impl TranslateStage for UserDirStage {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn translate(&self, req: &mut RequestRec) -> Outcome {
        let Some(config) = self.config.as_ref().filter(|c| c.enabled) else {
            return Outcome::Declined;
        };
        let Some(rest) = req.uri.strip_prefix("/~") else {
            return Outcome::Declined;
        };

        let (user, tail) = match rest.find('/') {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };
        if user.is_empty() || user.starts_with('.') {
            return Outcome::Declined;
        }

        let home = format!("{}/{}/{}", config.home_base.trim_end_matches('/'), user, config.dir);
        req.filename = Some(format!("{home}{tail}"));
        req.context_prefix = Some(home);
        Outcome::Handled
    }
}

/// Virtual document root with fallback.
pub struct VhostStage {
    vhost: Arc<VhostAlias>,
    probe: Arc<dyn DirProbe>,
}

impl VhostStage {
    pub const NAME: &'static str = "vhost_alias_fallback";

    pub fn new(vhost: Arc<VhostAlias>, probe: Arc<dyn DirProbe>) -> Self {
        Self { vhost, probe }
    }
}

impl fmt::Debug for VhostStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VhostStage")
            .field("vhost", &self.vhost)
            .finish_non_exhaustive()
    }
}

impl TranslateStage for VhostStage {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn translate(&self, req: &mut RequestRec) -> Outcome {
        let translation = self.vhost.translate(&req.host_request(), self.probe.as_ref());
        match translation {
            Translation::Resolved(resolved) => {
                req.apply(resolved);
                Outcome::Handled
            }
            Translation::Declined => Outcome::Declined,
        }
    }
}

/// Core fallback: serve from the configured document root.
#[derive(Debug, Clone)]
pub struct DocumentRootStage {
    root: Option<String>,
}

impl DocumentRootStage {
    pub const NAME: &'static str = "document_root";

    pub fn new(root: Option<String>) -> Self {
        Self { root }
    }
}

impl TranslateStage for DocumentRootStage {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn translate(&self, req: &mut RequestRec) -> Outcome {
        let Some(root) = &self.root else {
            return Outcome::Declined;
        };
        if !req.uri.starts_with('/') {
            return Outcome::Declined;
        }

        let root = root.trim_end_matches('/');
        req.filename = Some(format!("{root}{}", req.uri));
        req.document_root = Some(root.to_string());
        req.context_prefix = Some(root.to_string());
        Outcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use std::path::Path;

    fn req(uri: &str) -> RequestRec {
        RequestRec::new(uri, "www.example.com", IpAddr::V4(Ipv4Addr::LOCALHOST), 80)
    }

    #[test]
    fn test_alias_matches_on_segment_boundary() {
        let stage = AliasStage::new(vec![AliasConfig {
            url_prefix: "/icons".into(),
            path: "/usr/share/icons".into(),
        }]);

        let mut r = req("/icons/a.png");
        assert_eq!(stage.translate(&mut r), Outcome::Handled);
        assert_eq!(r.filename.as_deref(), Some("/usr/share/icons/a.png"));

        let mut r = req("/icons");
        assert_eq!(stage.translate(&mut r), Outcome::Handled);
        assert_eq!(r.filename.as_deref(), Some("/usr/share/icons"));

        let mut r = req("/iconsets/a.png");
        assert_eq!(stage.translate(&mut r), Outcome::Declined);
        assert_eq!(r.filename, None);
    }

    #[test]
    fn test_alias_first_match_wins() {
        let stage = AliasStage::new(vec![
            AliasConfig {
                url_prefix: "/a/".into(),
                path: "/first/".into(),
            },
            AliasConfig {
                url_prefix: "/a/b".into(),
                path: "/second".into(),
            },
        ]);
        let mut r = req("/a/b/c");
        stage.translate(&mut r);
        assert_eq!(r.filename.as_deref(), Some("/first/b/c"));
    }

    #[test]
    fn test_alias_shorter_prefix_listed_first_shadows_longer() {
        let stage = AliasStage::new(vec![
            AliasConfig {
                url_prefix: "/a".into(),
                path: "/short".into(),
            },
            AliasConfig {
                url_prefix: "/a/b".into(),
                path: "/long".into(),
            },
        ]);
        let mut r = req("/a/b/c");
        assert_eq!(stage.translate(&mut r), Outcome::Handled);
        assert_eq!(r.filename.as_deref(), Some("/short/b/c"));

        let stage = AliasStage::new(vec![
            AliasConfig {
                url_prefix: "/a/b".into(),
                path: "/long".into(),
            },
            AliasConfig {
                url_prefix: "/a".into(),
                path: "/short".into(),
            },
        ]);
        let mut r = req("/a/b/c");
        stage.translate(&mut r);
        assert_eq!(r.filename.as_deref(), Some("/long/c"));
    }

    #[test]
    fn test_userdir() {
        let stage = UserDirStage::new(Some(UserDirConfig::default()));

        let mut r = req("/~alice/notes/index.html");
        assert_eq!(stage.translate(&mut r), Outcome::Handled);
        assert_eq!(r.filename.as_deref(), Some("/home/alice/public_html/notes/index.html"));
        assert_eq!(r.context_prefix.as_deref(), Some("/home/alice/public_html"));

        let mut r = req("/~bob");
        stage.translate(&mut r);
        assert_eq!(r.filename.as_deref(), Some("/home/bob/public_html"));

        for uri in ["/~", "/~/x", "/~.hidden/x", "/alice"] {
            assert_eq!(stage.translate(&mut req(uri)), Outcome::Declined, "{uri}");
        }
    }

    #[test]
    fn test_userdir_disabled() {
        let stage = UserDirStage::new(Some(UserDirConfig {
            enabled: false,
            ..UserDirConfig::default()
        }));
        assert_eq!(stage.translate(&mut req("/~alice/")), Outcome::Declined);
        assert_eq!(UserDirStage::new(None).translate(&mut req("/~alice/")), Outcome::Declined);
    }

    #[test]
    fn test_vhost_stage_writes_all_outputs() {
        let vhost = crate::config::directive::parse_directive(
            "VirtualDocumentRootWithFallback /sites/%1 /sites/default",
        )
        .unwrap();
        let probe: Arc<dyn DirProbe> = Arc::new(|_: &Path| false);
        let stage = VhostStage::new(Arc::new(vhost), probe);

        let mut r = req("/index.html");
        assert_eq!(stage.translate(&mut r), Outcome::Handled);
        assert_eq!(r.filename.as_deref(), Some("/sites/default/index.html"));
        assert_eq!(r.document_root.as_deref(), Some("/sites/default"));
        assert_eq!(r.context_prefix.as_deref(), Some("/sites/default"));
        assert_eq!(r.root_source, Some(crate::vhost::RootSource::Fallback));
    }

    #[test]
    fn test_declined_vhost_leaves_record_untouched() {
        let probe: Arc<dyn DirProbe> = Arc::new(|_: &Path| true);
        let stage = VhostStage::new(Arc::new(VhostAlias::unset()), probe);
        let mut r = req("/index.html");
        assert_eq!(stage.translate(&mut r), Outcome::Declined);
        assert_eq!(r, req("/index.html"));
    }

    #[test]
    fn test_document_root() {
        let stage = DocumentRootStage::new(Some("/var/www/".into()));
        let mut r = req("/a.html");
        assert_eq!(stage.translate(&mut r), Outcome::Handled);
        assert_eq!(r.filename.as_deref(), Some("/var/www/a.html"));
        assert_eq!(r.document_root.as_deref(), Some("/var/www"));

        assert_eq!(stage.translate(&mut req("*")), Outcome::Declined);
        assert_eq!(DocumentRootStage::new(None).translate(&mut req("/")), Outcome::Declined);
    }
}
