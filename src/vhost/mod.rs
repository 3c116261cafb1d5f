//! Virtual document roots with fallback.
//!
//! # Data Flow
//! ```text
//! Configuration time:
//!     "VirtualDocumentRootWithFallback <template> <fallback>"
//!     → format.rs (compile template)
//!     → VhostAlias (immutable, shared via Arc)
//!
//! Per request:
//!     host identity (server name or local IP)
//!     → labels.rs (split on dots)
//!     → interpolate.rs (expand template → path suffix)
//!     → resolve.rs (probe directory, pick computed or fallback root)
//!     → ResolvedPath { filename, document_root, context_prefix }
//! ```
//!
//! # Design Decisions
//! - Nothing here fails at request time; bad templates are rejected at load
//! - No state survives a request
//! - URIs that are not absolute paths are left to other stages

pub mod format;
pub mod interpolate;
pub mod labels;
pub mod resolve;

use std::borrow::Cow;
use std::net::IpAddr;

use serde::Serialize;

pub use format::{compile, DocRootMap, FormatError, Template};
pub use interpolate::interpolate;
pub use labels::LabelIndex;
pub use resolve::{resolve, DirProbe, FsProbe, ResolvedPath, RootSource};

/// Where the host identity for a request comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// No directive in this scope or any ancestor.
    #[default]
    Unset,
    /// Explicitly disabled with `none`.
    None,
    /// Negotiated server name.
    Name,
    /// Local IP address of the connection.
    Ip,
}

/// Per-request inputs taken from the host runtime.
#[derive(Debug, Clone, Copy)]
pub struct HostRequest<'a> {
    pub uri: &'a str,
    pub server_name: &'a str,
    pub local_ip: IpAddr,
    pub port: u16,
}

/// Outcome of running the engine on one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Declined,
    Resolved(ResolvedPath),
}

/// Resolved per-scope settings: the mode, template, and fallback root.
///
/// The three fields always come from the same directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VhostAlias {
    mode: Mode,
    template: Option<Template>,
    fallback: Option<String>,
}

impl VhostAlias {
    /// A scope with no mapping configured.
    pub fn unset() -> Self {
        Self::default()
    }

    /// Build from a compiled template. `DocRootMap::None` disables the scope.
    pub fn new(mode: Mode, map: DocRootMap, fallback: impl Into<String>) -> Self {
        match map {
            DocRootMap::None => Self {
                mode: Mode::None,
                template: None,
                fallback: Some(fallback.into()),
            },
            DocRootMap::Template(template) => Self {
                mode,
                template: Some(template),
                fallback: Some(fallback.into()),
            },
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    /// Whether this scope set anything at all (including `none`).
    pub fn is_set(&self) -> bool {
        self.mode != Mode::Unset
    }

    /// Map a request to a document root, or decline.
    pub fn translate(&self, req: &HostRequest<'_>, probe: &dyn DirProbe) -> Translation {
        if !req.uri.starts_with('/') {
            return Translation::Declined;
        }

        let host: Cow<'_, str> = match self.mode {
            Mode::Name => Cow::Borrowed(req.server_name),
            Mode::Ip => Cow::Owned(req.local_ip.to_string()),
            Mode::None | Mode::Unset => return Translation::Declined,
        };

        let (Some(template), Some(fallback)) = (&self.template, &self.fallback) else {
            return Translation::Declined;
        };

        let labels = LabelIndex::build(&host);
        let suffix = interpolate(template, &labels, req.port);
        let resolved = resolve("", &suffix, fallback, req.uri, probe);

        tracing::debug!(
            host = %host,
            template = %template,
            suffix = %suffix,
            source = %resolved.source,
            document_root = %resolved.document_root,
            "Virtual document root resolved"
        );

        Translation::Resolved(resolved)
    }
}
