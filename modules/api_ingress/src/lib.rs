//! HTTP host: owns the listener, the middleware stack and the top-level routes;
//! feature modules plug their routers in with [`ApiIngress::mount`].

use std::future::Future;
use std::net::SocketAddr;

use anyhow::Context;
use axum::{extract::DefaultBodyLimit, middleware::from_fn, routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

pub struct ApiIngress {
    config: ApiIngressConfig,
    router: Router,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        let router = Router::new()
            .route("/", get(web::root))
            .route("/health", get(web::health_check));
        Self { config, router }
    }

    /// Nest a module router under `prefix` (e.g. `/api/polls`).
    pub fn mount(mut self, prefix: &str, routes: Router) -> Self {
        tracing::debug!(prefix, "mounting routes");
        self.router = self.router.nest(prefix, routes);
        self
    }

    /// Finish the router with the middleware stack.
    ///
    /// Outermost to innermost: SetRequestId -> PropagateRequestId -> Trace ->
    /// push_req_id_to_extensions -> Timeout -> CORS -> BodyLimit.
    pub fn into_router(self) -> Router {
        let cfg = self.config;
        let x_request_id = request_id::header();

        let mut router = self
            .router
            .fallback(web::fallback)
            .layer(DefaultBodyLimit::max(cfg.body_limit_bytes))
            .layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes));

        if cfg.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        if !cfg.request_timeout.is_zero() {
            router = router.layer(TimeoutLayer::new(cfg.request_timeout));
        }

        router
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_id::make_request_span)
                    .on_response(request_id::record_response),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }
}

/// Bind `addr` and serve until `shutdown` resolves; in-flight requests are
/// allowed to finish.
pub async fn serve<F>(addr: SocketAddr, router: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
