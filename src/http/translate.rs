//! Request → RequestRec → pipeline.
//!
//! # Responsibilities
//! - Derive server name and port from the request authority
//! - Pick the scope for the server name
//! - Run that scope's pipeline
//!
//! # Design Decisions
//! - One `Runtime` per configuration snapshot; reload swaps the whole thing
//! - Without a usable Host, the scope's first server name stands in, then
//!   the local IP

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::RuntimeConfig;
use crate::routing::{Pipeline, RequestRec};
use crate::vhost::DirProbe;

/// A configuration snapshot with its per-scope pipelines.
#[derive(Debug)]
pub struct Runtime {
    config: RuntimeConfig,
    pipelines: Vec<Pipeline>,
}

/// Outcome of translating one request.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub scope: String,
    pub stage: Option<&'static str>,
    pub request: RequestRec,
}

impl Resolution {
    /// Metrics label: the root source for the vhost stage, `other_stage`
    /// for any other handling stage, `declined` when nothing applied.
    pub fn outcome(&self) -> &'static str {
        match (self.stage, self.request.root_source) {
            (None, _) => "declined",
            (Some(_), Some(source)) => source.as_str(),
            (Some(_), None) => "other_stage",
        }
    }
}

impl Runtime {
    pub fn new(config: RuntimeConfig, probe: Arc<dyn DirProbe>) -> Self {
        let pipelines = config
            .scopes
            .scopes()
            .iter()
            .map(|scope| Pipeline::for_scope(scope, probe.clone()))
            .collect();
        Self { config, pipelines }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Translate a request path received on `local`, given its authority
    /// (`host[:port]`), if any.
    pub fn translate(&self, authority: Option<&str>, uri: &str, local: SocketAddr) -> Resolution {
        let (host, port) = authority.and_then(split_authority).unzip();
        let port = port.flatten().unwrap_or_else(|| local.port());

        let index = host
            .as_deref()
            .and_then(|h| self.config.scopes.index_for_host(h))
            .unwrap_or(0);
        let scope = &self.config.scopes.scopes()[index];

        let server_name = host
            .or_else(|| scope.default_server_name().map(String::from))
            .unwrap_or_else(|| local.ip().to_string());

        let mut request = RequestRec::new(uri, server_name, local.ip(), port);
        let stage = self.pipelines[index].run(&mut request);

        Resolution {
            scope: scope.name.clone(),
            stage,
            request,
        }
    }
}

/// Split `host[:port]`; IPv6 brackets and a single trailing dot are dropped.
fn split_authority(authority: &str) -> Option<(String, Option<u16>)> {
    let authority: axum::http::uri::Authority = authority.parse().ok()?;
    let host = authority
        .host()
        .trim_start_matches('[')
        .trim_end_matches(']');
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() {
        return None;
    }
    Some((host.to_string(), authority.port_u16()))
}
