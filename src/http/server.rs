//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the redirect and health handlers
//! - Wire up middleware (tracing, limits, request ID, security headers)
//! - Bind server to listener
//! - Apply site map updates from the config watcher
//! - Stop on the shutdown broadcast

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigError, RedirectConfig, TimeoutConfig};
use crate::http::{request, response};
use crate::negotiation::{resolve_with, InvalidWeight, SiteMap};
use crate::observability::metrics;
use crate::security::headers;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub sites: Arc<ArcSwap<SiteMap>>,
    pub invalid_weight: InvalidWeight,
}

/// HTTP server for the redirect service.
pub struct HttpServer {
    router: Router,
    config: RedirectConfig,
    sites: Arc<ArcSwap<SiteMap>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails if the site map has no fallback entry.
    pub fn new(config: RedirectConfig) -> Result<Self, ConfigError> {
        let sites = Arc::new(ArcSwap::from_pointee(config.site_map()?));
        let state = AppState {
            sites: sites.clone(),
            invalid_weight: config.negotiation.invalid_weight,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            sites,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RedirectConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_handler))
            .fallback(redirect_handler)
            .with_state(state);

        if config.security.enable_headers {
            router = headers::apply(router);
        }

        router
            .layer(timeout_layer(&config.timeouts))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(GlobalConcurrencyLimitLayer::new(config.listener.max_concurrent_requests))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(request::X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(request::X_REQUEST_ID, request::UuidRequestId))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Site maps received on `config_updates` replace the current one between
    /// requests. Returns once `shutdown` fires and in-flight requests finish.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<RedirectConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            languages = self.sites.load().len(),
            "HTTP server starting"
        );

        let updater = tokio::spawn(apply_updates(
            self.sites.clone(),
            self.config.clone(),
            config_updates,
        ));

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await;

        updater.abort();
        result?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Router with all layers, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Currently active site map.
    pub fn site_map(&self) -> Arc<SiteMap> {
        self.sites.load_full()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RedirectConfig {
        &self.config
    }
}

/// Requests running past the deadline are answered with 408.
fn timeout_layer(config: &TimeoutConfig) -> TimeoutLayer {
    TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(config.request_secs),
    )
}

async fn apply_updates(
    sites: Arc<ArcSwap<SiteMap>>,
    running: RedirectConfig,
    mut updates: mpsc::UnboundedReceiver<RedirectConfig>,
) {
    while let Some(config) = updates.recv().await {
        apply_update(&sites, &running, &config);
    }
}

/// Sections of `next` that differ from the running config and only take
/// effect after a restart.
fn restart_required(running: &RedirectConfig, next: &RedirectConfig) -> Vec<&'static str> {
    let mut changed = Vec::new();
    if next.listener != running.listener {
        changed.push("listener");
    }
    if next.negotiation != running.negotiation {
        changed.push("negotiation");
    }
    if next.timeouts != running.timeouts {
        changed.push("timeouts");
    }
    if next.observability != running.observability {
        changed.push("observability");
    }
    if next.security != running.security {
        changed.push("security");
    }
    if next.reload != running.reload {
        changed.push("reload");
    }
    changed
}

fn apply_update(sites: &ArcSwap<SiteMap>, running: &RedirectConfig, config: &RedirectConfig) {
    match config.site_map() {
        Ok(site_map) => {
            tracing::info!(
                languages = ?site_map.languages().collect::<Vec<_>>(),
                "Site map reloaded"
            );
            sites.store(Arc::new(site_map));
        }
        Err(e) => {
            tracing::error!(error = %e, "Rejected site map update");
        }
    }

    for section in restart_required(running, config) {
        tracing::warn!(section, "Settings changed; restart required to apply them");
    }
}

/// Redirect to the landing page matching the client's languages.
async fn redirect_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let accept_language = request::accept_language(&headers);

    let sites = state.sites.load();
    let resolution = resolve_with(accept_language.as_deref(), &sites, state.invalid_weight);

    tracing::debug!(
        request_id = %request::request_id(&headers),
        accept_language = ?accept_language,
        language = %resolution.language,
        fallback = resolution.fallback,
        location = %resolution.location,
        "Redirecting"
    );
    metrics::record_redirect(&resolution.language, resolution.fallback, start);

    response::redirect(&resolution.location)
}

async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sites = state.sites.load();
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "languages": sites.languages().collect::<Vec<_>>(),
    }))
}
