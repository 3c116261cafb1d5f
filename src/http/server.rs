//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the translation handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Swap in reloaded configuration without dropping requests
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RuntimeConfig;
use crate::http::request::{request_id, ConnectionAddrs, MakeRequestUuid};
use crate::http::translate::Runtime;
use crate::observability::metrics;
use crate::vhost::{DirProbe, FsProbe};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<ArcSwap<Runtime>>,
}

/// HTTP front end for the translate pipeline.
pub struct HttpServer {
    router: Router,
    runtime: Arc<ArcSwap<Runtime>>,
    probe: Arc<dyn DirProbe>,
}

impl HttpServer {
    /// Create a server that probes the local filesystem.
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_probe(config, Arc::new(FsProbe))
    }

    /// Create a server with a custom directory probe.
    pub fn with_probe(config: RuntimeConfig, probe: Arc<dyn DirProbe>) -> Self {
        let request_secs = config.service.timeouts.request_secs;
        let runtime = Arc::new(ArcSwap::from_pointee(Runtime::new(config, probe.clone())));
        let state = AppState {
            runtime: runtime.clone(),
        };

        Self {
            router: Self::build_router(request_secs, state),
            runtime,
            probe,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(request_secs: u64, state: AppState) -> Router {
        Router::new()
            .fallback(translate_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(request_secs)))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Current configuration snapshot.
    pub fn runtime(&self) -> Arc<Runtime> {
        self.runtime.load_full()
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configurations received on `config_updates` replace the running one.
    /// Listener and timeout settings only take effect on restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RuntimeConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            scopes = self.runtime.load().config().scopes.len(),
            "HTTP server starting"
        );

        let runtime = self.runtime.clone();
        let probe = self.probe.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                let scopes = config.scopes.len();
                runtime.store(Arc::new(Runtime::new(config, probe.clone())));
                tracing::info!(scopes, "Configuration reloaded");
            }
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<ConnectionAddrs>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Translate the request and report the mapping.
async fn translate_handler(
    State(state): State<AppState>,
    ConnectInfo(conn): ConnectInfo<ConnectionAddrs>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request).to_string();

    let authority = request
        .uri()
        .authority()
        .map(|a| a.as_str().to_string())
        .or_else(|| {
            request
                .headers()
                .get(axum::http::header::HOST)
                .and_then(|h| h.to_str().ok())
                .map(String::from)
        });
    let path = request.uri().path();

    let runtime = state.runtime.load();
    let resolution = runtime.translate(authority.as_deref(), path, conn.local);

    metrics::record_translation(resolution.outcome(), start_time);

    tracing::debug!(
        request_id = %request_id,
        peer = %conn.peer,
        scope = %resolution.scope,
        stage = resolution.stage.unwrap_or("none"),
        filename = resolution.request.filename.as_deref().unwrap_or("-"),
        "Request translated"
    );

    resolution.into_response()
}
