//! Document-root selection with fallback.
//!
//! # Responsibilities
//! - Join the mapped suffix onto any accumulated prefix
//! - Probe the candidate directory exactly once
//! - Pick the candidate or the fallback root, never a mix of the two
//!
//! # Design Decisions
//! - Any probe failure counts as "directory absent"
//! - The check is not atomic with later file access by other stages

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Directory existence check consumed by the resolver.
pub trait DirProbe: Send + Sync {
    /// Returns true only if `path` names an existing directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// Probes the local filesystem (symlinks followed).
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl DirProbe for FsProbe {
    fn is_dir(&self, path: &Path) -> bool {
        std::fs::metadata(path)
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }
}

impl<F> DirProbe for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn is_dir(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Which root a request ended up under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RootSource {
    Computed,
    Fallback,
}

impl RootSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RootSource::Computed => "computed",
            RootSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for RootSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final resolution written back into the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPath {
    pub filename: String,
    pub document_root: String,
    pub context_prefix: String,
    pub source: RootSource,
}

/// Choose between `prefix + suffix` and `fallback` and append `uri`.
pub fn resolve(
    prefix: &str,
    suffix: &str,
    fallback: &str,
    uri: &str,
    probe: &dyn DirProbe,
) -> ResolvedPath {
    let candidate = format!("{prefix}{suffix}");

    let (root, source) = if probe.is_dir(Path::new(&candidate)) {
        (candidate, RootSource::Computed)
    } else {
        (fallback.to_string(), RootSource::Fallback)
    };

    ResolvedPath {
        filename: format!("{root}{uri}"),
        context_prefix: root.clone(),
        document_root: root,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_existing_directory_wins() {
        let probe = |p: &Path| p == Path::new("/sites/www/htdocs");
        let r = resolve("", "/sites/www/htdocs", "/sites/default", "/index.html", &probe);

        assert_eq!(r.source, RootSource::Computed);
        assert_eq!(r.document_root, "/sites/www/htdocs");
        assert_eq!(r.context_prefix, "/sites/www/htdocs");
        assert_eq!(r.filename, "/sites/www/htdocs/index.html");
    }

    #[test]
    fn test_missing_directory_uses_fallback_exactly() {
        let probe = |_: &Path| false;
        let r = resolve("", "/sites/a/htdocs", "/sites/default", "/index.html", &probe);

        assert_eq!(r.source, RootSource::Fallback);
        assert_eq!(r.document_root, "/sites/default");
        assert_eq!(r.context_prefix, "/sites/default");
        assert_eq!(r.filename, "/sites/default/index.html");
    }

    #[test]
    fn test_prefix_is_joined_before_probing() {
        let probe = |p: &Path| p == Path::new("/srv/sites/www");
        let r = resolve("/srv", "/sites/www", "/fb", "/", &probe);
        assert_eq!(r.document_root, "/srv/sites/www");
        assert_eq!(r.filename, "/srv/sites/www/");
    }

    #[test]
    fn test_probe_called_once() {
        let calls = AtomicUsize::new(0);
        let probe = |_: &Path| {
            calls.fetch_add(1, Ordering::SeqCst);
            true
        };
        resolve("", "/x", "/fb", "/a", &probe);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fs_probe_on_real_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();

        assert!(FsProbe.is_dir(dir.path()));
        assert!(!FsProbe.is_dir(&file));
        assert!(!FsProbe.is_dir(&dir.path().join("missing")));
        assert!(!FsProbe.is_dir(Path::new("")));
    }
}
