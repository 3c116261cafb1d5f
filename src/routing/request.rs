//! Per-request translation record.
//!
//! Inputs are filled in by the HTTP layer; translate stages write the
//! output fields, or leave them alone when they decline.

use std::net::IpAddr;

use crate::vhost::{HostRequest, ResolvedPath, RootSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRec {
    /// Raw request path, as received.
    pub uri: String,
    /// Negotiated server name (Host header, or the scope's default).
    pub server_name: String,
    /// Local address the connection was accepted on.
    pub local_ip: IpAddr,
    pub port: u16,

    pub filename: Option<String>,
    pub document_root: Option<String>,
    pub context_prefix: Option<String>,
    /// Set only by the virtual document root stage.
    pub root_source: Option<RootSource>,
    /// Name of the stage that handled the request.
    pub handled_by: Option<&'static str>,
}

impl RequestRec {
    pub fn new(uri: impl Into<String>, server_name: impl Into<String>, local_ip: IpAddr, port: u16) -> Self {
        Self {
            uri: uri.into(),
            server_name: server_name.into(),
            local_ip,
            port,
            filename: None,
            document_root: None,
            context_prefix: None,
            root_source: None,
            handled_by: None,
        }
    }

    pub fn host_request(&self) -> HostRequest<'_> {
        HostRequest {
            uri: &self.uri,
            server_name: &self.server_name,
            local_ip: self.local_ip,
            port: self.port,
        }
    }

    /// Record a virtual document root resolution.
    pub fn apply(&mut self, resolved: ResolvedPath) {
        self.filename = Some(resolved.filename);
        self.document_root = Some(resolved.document_root);
        self.context_prefix = Some(resolved.context_prefix);
        self.root_source = Some(resolved.source);
    }
}
