//! Market data module
//!
//! Raw Kalshi market records, their normalized dashboard form, and the
//! ranking views built on top of them.

mod client;
mod normalize;
mod ranking;
mod types;

pub use client::{MarketClient, MarketClientConfig, MarketsPage, MarketsQuery, KALSHI_API_URL};
pub use normalize::{change_24h, normalize, normalize_all};
pub use ranking::{
    hot_score, is_active, rank, MarketRanker, RankingView, DEFAULT_LIMIT, FETCH_LIMIT,
};
pub use types::MarketApiError;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status reported by the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    Unopened,
    Open,
    Closed,
    Settled,
    Active,
    /// Any status this client does not know about
    #[default]
    #[serde(other)]
    Unknown,
}

impl MarketStatus {
    /// Query-string form
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketStatus::Unopened => "unopened",
            MarketStatus::Open => "open",
            MarketStatus::Closed => "closed",
            MarketStatus::Settled => "settled",
            MarketStatus::Active => "active",
            MarketStatus::Unknown => "unknown",
        }
    }
}

/// Market record exactly as the upstream API returns it
///
/// Prices are integer cents (0-100). Volume-like fields may be null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMarket {
    pub ticker: String,
    #[serde(default)]
    pub event_ticker: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub status: MarketStatus,
    #[serde(default)]
    pub yes_ask: i64,
    #[serde(default)]
    pub yes_bid: i64,
    #[serde(default)]
    pub no_ask: i64,
    #[serde(default)]
    pub no_bid: i64,
    #[serde(default)]
    pub last_price: i64,
    #[serde(default)]
    pub previous_price: i64,
    #[serde(default)]
    pub volume: Option<i64>,
    #[serde(default)]
    pub volume_24h: Option<i64>,
    #[serde(default)]
    pub open_interest: Option<i64>,
    #[serde(default)]
    pub liquidity: Option<i64>,
    /// ISO-8601 close time
    #[serde(default)]
    pub close_time: String,
}

/// Dashboard form of a market: the raw record plus derived fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMarket {
    #[serde(flatten)]
    pub raw: RawMarket,
    /// Alias of `ticker`
    pub id: String,
    /// Alias of `title`
    pub question: String,
    /// Alias of `close_time`
    pub end_date: String,
    /// `yes_ask` in dollars
    #[serde(with = "rust_decimal::serde::float")]
    pub yes_price: Decimal,
    /// `no_ask` in dollars
    #[serde(with = "rust_decimal::serde::float")]
    pub no_price: Decimal,
    /// Relative move of `last_price` against `previous_price`
    #[serde(rename = "change24h", with = "rust_decimal::serde::float")]
    pub change_24h: Decimal,
    /// `volume_24h` with null read as zero
    #[serde(rename = "volume24h")]
    pub volume_24h: i64,
    pub outcomes: [&'static str; 2],
    pub outcome_prices: [String; 2],
    /// Parsed `close_time`, if it was valid RFC 3339
    #[serde(skip)]
    pub close_at: Option<DateTime<Utc>>,
}

impl NormalizedMarket {
    pub fn liquidity(&self) -> i64 {
        self.raw.liquidity.unwrap_or(0)
    }

    pub fn open_interest(&self) -> i64 {
        self.raw.open_interest.unwrap_or(0)
    }
}

/// Source of raw open markets for the ranking views
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Fetch up to `limit` markets with status `open`
    async fn fetch_open_markets(&self, limit: usize) -> Result<Vec<RawMarket>, MarketApiError>;
}
