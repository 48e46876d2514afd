//! Market API client
//!
//! Reads market listings from the Kalshi trade API, either directly or through
//! this crate's proxy (point `base_url` at `http://host/api/kalshi`). When
//! credentials are set, requests are signed the same way the proxy signs them.

use super::{MarketApiError, MarketSource, MarketStatus, RawMarket};
use crate::auth::Credentials;
use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::Deserialize;
use std::time::Duration;

/// Kalshi trade API base URL
pub const KALSHI_API_URL: &str = "https://api.elections.kalshi.com/trade-api/v2";

/// Configuration for the market client
#[derive(Debug, Clone)]
pub struct MarketClientConfig {
    /// Base URL, including the `/trade-api/v2` prefix when talking to Kalshi
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent sent with every request
    pub user_agent: String,
}

impl Default for MarketClientConfig {
    fn default() -> Self {
        Self {
            base_url: KALSHI_API_URL.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: concat!("kalshi-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Filters for `GET /markets`
#[derive(Debug, Clone, Default)]
pub struct MarketsQuery {
    pub status: Option<MarketStatus>,
    pub limit: Option<usize>,
    pub cursor: Option<String>,
    pub event_ticker: Option<String>,
}

impl MarketsQuery {
    /// Open markets, up to `limit`
    pub fn open(limit: usize) -> Self {
        Self {
            status: Some(MarketStatus::Open),
            limit: Some(limit),
            ..Self::default()
        }
    }

    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(ref cursor) = self.cursor {
            pairs.push(("cursor", cursor.clone()));
        }
        if let Some(ref event_ticker) = self.event_ticker {
            pairs.push(("event_ticker", event_ticker.clone()));
        }
        pairs
    }
}

/// One page of `GET /markets`
#[derive(Debug, Clone, Deserialize)]
pub struct MarketsPage {
    pub markets: Vec<RawMarket>,
    /// Empty or absent on the last page
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MarketEnvelope {
    market: RawMarket,
}

/// Client for the market endpoints of the trade API
pub struct MarketClient {
    config: MarketClientConfig,
    client: Client,
    credentials: Option<Credentials>,
}

impl MarketClient {
    /// Create a client with default configuration and no credentials
    pub fn new() -> Result<Self, MarketApiError> {
        Self::with_config(MarketClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: MarketClientConfig) -> Result<Self, MarketApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            config,
            client,
            credentials: None,
        })
    }

    /// Sign outgoing requests with these credentials
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// List markets
    pub async fn get_markets(&self, query: &MarketsQuery) -> Result<MarketsPage, MarketApiError> {
        let mut url = self.endpoint("markets")?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.pairs() {
                pairs.append_pair(key, &value);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        self.get_json(url).await
    }

    /// Fetch a single market by ticker
    pub async fn get_market(&self, ticker: &str) -> Result<RawMarket, MarketApiError> {
        let url = market_url(&self.config.base_url, ticker)?;
        let envelope: MarketEnvelope = self.get_json(url).await?;
        Ok(envelope.market)
    }

    fn endpoint(&self, path: &str) -> Result<Url, MarketApiError> {
        build_url(&self.config.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, MarketApiError> {
        tracing::debug!(url = %url, "Fetching from market API");

        let mut request = self.client.get(url.clone());
        if let Some(ref credentials) = self.credentials {
            for (name, value) in credentials.authorize(&Method::GET, url.path())?.to_pairs() {
                request = request.header(name, value);
            }
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %url, "Market API returned error status");
            return Err(MarketApiError::from_response(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| MarketApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MarketSource for MarketClient {
    async fn fetch_open_markets(&self, limit: usize) -> Result<Vec<RawMarket>, MarketApiError> {
        let page = self.get_markets(&MarketsQuery::open(limit)).await?;
        Ok(page.markets)
    }
}

/// Join a relative API path onto the base URL
fn build_url(base_url: &str, path: &str) -> Result<Url, MarketApiError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| MarketApiError::Transport(format!("invalid URL {}: {}", joined, e)))
}

/// `{base}/markets/{ticker}` with the ticker escaped as a single path segment
fn market_url(base_url: &str, ticker: &str) -> Result<Url, MarketApiError> {
    let mut url = build_url(base_url, "markets")?;
    url.path_segments_mut()
        .map_err(|_| MarketApiError::Transport(format!("{} cannot take a path", base_url)))?
        .push(ticker);
    Ok(url)
}
