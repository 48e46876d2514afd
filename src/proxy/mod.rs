//! Signing reverse proxy
//!
//! Serves the browser-facing HTTP surface:
//! - `{mount_path}/*path` relays to the upstream trade API
//! - `/api/markets/:view` returns a ranked market list
//! - `/health` reports liveness and whether credentials are loaded
//!
//! Every response carries the CORS header set from [`cors`].

pub mod cors;
mod dispatcher;
mod rankings;
mod types;
mod upstream;

pub use dispatcher::{proxy_handler, upstream_url};
pub use rankings::ranked_markets_handler;
pub use types::{ErrorBody, ProxyError};
pub use upstream::{HttpUpstream, Upstream, UpstreamRequest, UpstreamResponse};

use crate::auth::Credentials;
use crate::config::Config;
use crate::market::{MarketClient, MarketClientConfig, MarketRanker};
use axum::extract::State;
use axum::routing::{any, get};
use axum::{middleware, Json, Router};
use reqwest::Url;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

/// Immutable proxy settings resolved at startup
#[derive(Debug, Clone)]
pub struct ProxySettings {
    /// Inbound prefix, without trailing slash (e.g. `/api/kalshi`)
    pub mount_path: String,
    /// Upstream base including the API prefix (e.g. `https://host/trade-api/v2`)
    pub upstream_base: Url,
    /// `max-age` for relayed GET responses
    pub cache_max_age_secs: u32,
    /// Forward GETs unsigned when no credentials are configured
    pub allow_unauthenticated_reads: bool,
}

impl ProxySettings {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let upstream_base = Url::parse(&config.upstream.base_url)?;
        Ok(Self {
            mount_path: config.server.mount_path.trim_end_matches('/').to_string(),
            upstream_base,
            cache_max_age_secs: config.server.cache_max_age_secs,
            allow_unauthenticated_reads: config.server.allow_unauthenticated_reads,
        })
    }
}

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<ProxySettings>,
    pub credentials: Option<Arc<Credentials>>,
    pub upstream: Arc<dyn Upstream>,
    pub ranker: MarketRanker,
}

impl AppState {
    /// Wire up the real reqwest upstream and market client
    pub fn from_config(config: &Config, credentials: Option<Credentials>) -> anyhow::Result<Self> {
        let settings = ProxySettings::from_config(config)?;
        let timeout = config.upstream.timeout_secs.map(Duration::from_secs);
        let upstream = HttpUpstream::new(&config.upstream.user_agent, timeout)?;

        let market_client = MarketClient::with_config(MarketClientConfig {
            base_url: config.upstream.base_url.clone(),
            timeout: timeout.unwrap_or(Duration::from_secs(30)),
            user_agent: config.upstream.user_agent.clone(),
        })?
        .with_credentials(credentials.clone());

        Ok(Self {
            settings: Arc::new(settings),
            credentials: credentials.map(Arc::new),
            upstream: Arc::new(upstream),
            ranker: MarketRanker::new(Arc::new(market_client)),
        })
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    authenticated: bool,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        authenticated: state.credentials.is_some(),
    })
}

/// Build the router
pub fn router(state: AppState) -> Router {
    let proxy_route = format!("{}/*path", state.settings.mount_path);

    Router::new()
        .route(&proxy_route, any(proxy_handler))
        .route("/api/markets/:view", get(ranked_markets_handler))
        .route("/health", get(health_handler))
        .layer(middleware::map_response(cors::add_cors_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn serve(state: AppState, bind_addr: &str) -> anyhow::Result<()> {
    tracing::info!("Registering routes:");
    tracing::info!("  ANY {}/*path (upstream {})", state.settings.mount_path, state.settings.upstream_base);
    tracing::info!("  GET /api/markets/:view (trending, ending-soon, hot)");
    tracing::info!("  GET /health");

    if state.credentials.is_none() {
        tracing::warn!("No API credentials configured; GETs are forwarded unsigned and POSTs are rejected");
    }

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
