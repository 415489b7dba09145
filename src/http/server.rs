//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the introspection routes and the forwarder
//! - Wire up middleware (request ID, metrics, tracing, timeout, admission)
//! - Bind server to listener
//! - Forward admitted requests to the upstream application

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{uri::Authority, Request, Version},
    middleware,
    response::Response,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::setup_admin_router;
use crate::config::{ConfigError, GuardConfig, ValidationError};
use crate::http::middleware::{admission_middleware, track_requests};
use crate::http::request::{
    propagate_request_id_layer, request_id_of, set_request_id_layer, strip_hop_by_hop,
    upstream_uri,
};
use crate::http::response;
use crate::lifecycle::StartupError;
use crate::observability::metrics;
use crate::policy::AdmissionPolicy;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub policy: Arc<AdmissionPolicy>,
    pub upstream: Authority,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server fronting the upstream application.
pub struct HttpServer {
    router: Router,
    config: GuardConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and policy.
    pub fn new(config: GuardConfig, policy: AdmissionPolicy) -> Result<Self, StartupError> {
        let upstream = Authority::from_str(&config.upstream.address).map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidUpstream(
                config.upstream.address.clone(),
            )])
        })?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(
            config.upstream.connect_timeout_secs,
        )));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = AppState {
            policy: Arc::new(policy),
            upstream,
            client,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Admission runs innermost, after request ID and tracing, and before
    /// any route including the forwarder. Request metrics sit outside the
    /// timeout so 408s and denials are counted with forwarded requests.
    #[allow(deprecated)]
    fn build_router(config: &GuardConfig, state: AppState) -> Router {
        let admission = middleware::from_fn_with_state(state.policy.clone(), admission_middleware);

        setup_admin_router()
            .fallback(proxy_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(middleware::from_fn(track_requests))
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(admission),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), StartupError> {
        let addr = listener.local_addr().map_err(StartupError::Serve)?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await
            .map_err(StartupError::Serve)?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Forward an admitted request to the upstream, streaming both bodies.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request_id_of(&request);
    let method = request.method().clone();

    let (mut parts, body) = request.into_parts();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %parts.uri.path(),
        "Forwarding request"
    );

    parts.uri = match upstream_uri(&parts.uri, &state.upstream) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Invalid upstream URI");
            metrics::record_upstream_error();
            return response::bad_gateway();
        }
    };
    // The upstream connection is always HTTP/1.1, whatever the client spoke.
    parts.version = Version::HTTP_11;
    strip_hop_by_hop(&mut parts.headers);

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(upstream_response) => response::from_upstream(upstream_response),
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            metrics::record_upstream_error();
            response::bad_gateway()
        }
    }
}
