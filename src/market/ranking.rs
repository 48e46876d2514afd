//! Market ranking views
//!
//! Each view fetches open markets, normalizes them, keeps the active ones,
//! orders them and truncates to the requested limit:
//! - Trending: highest 24h volume first
//! - Ending soon: future close times, soonest first
//! - Hot: weighted log-scale blend of volume, liquidity and open interest

use super::{normalize_all, MarketApiError, MarketSource, MarketStatus, NormalizedMarket};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Limit used when the caller does not give one
pub const DEFAULT_LIMIT: usize = 10;
/// Number of open markets pulled from upstream per ranking
pub const FETCH_LIMIT: usize = 200;

const HOT_VOLUME_WEIGHT: f64 = 0.5;
const HOT_LIQUIDITY_WEIGHT: f64 = 0.3;
const HOT_OPEN_INTEREST_WEIGHT: f64 = 0.2;

/// Named ranking policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RankingView {
    Trending,
    EndingSoon,
    Hot,
}

impl RankingView {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingView::Trending => "trending",
            RankingView::EndingSoon => "ending-soon",
            RankingView::Hot => "hot",
        }
    }
}

impl fmt::Display for RankingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trending" => Ok(RankingView::Trending),
            "ending-soon" => Ok(RankingView::EndingSoon),
            "hot" => Ok(RankingView::Hot),
            other => Err(format!("unknown ranking view: {}", other)),
        }
    }
}

/// Active = tradeable status with some 24h volume or resting liquidity
pub fn is_active(market: &NormalizedMarket) -> bool {
    matches!(market.raw.status, MarketStatus::Active | MarketStatus::Open)
        && (market.volume_24h > 0 || market.liquidity() > 0)
}

/// Composite hot score; the +1 offset keeps log10 at zero for empty markets
pub fn hot_score(market: &NormalizedMarket) -> f64 {
    let log = |x: i64| ((x.max(0) as f64) + 1.0).log10();
    HOT_VOLUME_WEIGHT * log(market.volume_24h)
        + HOT_LIQUIDITY_WEIGHT * log(market.liquidity())
        + HOT_OPEN_INTEREST_WEIGHT * log(market.open_interest())
}

/// Apply a view to already-normalized markets
///
/// Sorting is stable: equal keys keep their input order. The input slice is
/// not modified.
pub fn rank(
    view: RankingView,
    markets: &[NormalizedMarket],
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<NormalizedMarket> {
    let mut selected: Vec<NormalizedMarket> =
        markets.iter().filter(|m| is_active(m)).cloned().collect();

    match view {
        RankingView::Trending => {
            selected.sort_by(|a, b| b.volume_24h.cmp(&a.volume_24h));
        }
        RankingView::EndingSoon => {
            selected.retain(|m| m.close_at.is_some_and(|t| t > now));
            selected.sort_by_key(|m| m.close_at);
        }
        RankingView::Hot => {
            let mut scored: Vec<(f64, NormalizedMarket)> =
                selected.into_iter().map(|m| (hot_score(&m), m)).collect();
            scored.sort_by(|a, b| b.0.total_cmp(&a.0));
            selected = scored.into_iter().map(|(_, m)| m).collect();
        }
    }

    selected.truncate(limit);
    selected
}

/// Runs ranking views against a live market source
#[derive(Clone)]
pub struct MarketRanker {
    source: Arc<dyn MarketSource>,
}

impl MarketRanker {
    pub fn new(source: Arc<dyn MarketSource>) -> Self {
        Self { source }
    }

    /// Fetch, normalize and rank; `limit` defaults to [`DEFAULT_LIMIT`]
    pub async fn ranked(
        &self,
        view: RankingView,
        limit: Option<usize>,
    ) -> Result<Vec<NormalizedMarket>, MarketApiError> {
        let raws = self.source.fetch_open_markets(FETCH_LIMIT).await?;
        let markets = normalize_all(&raws);
        let ranked = rank(view, &markets, limit.unwrap_or(DEFAULT_LIMIT), Utc::now());

        tracing::debug!(
            view = %view,
            fetched = raws.len(),
            returned = ranked.len(),
            "Ranked markets"
        );

        Ok(ranked)
    }

    pub async fn trending(&self, limit: Option<usize>) -> Result<Vec<NormalizedMarket>, MarketApiError> {
        self.ranked(RankingView::Trending, limit).await
    }

    pub async fn ending_soon(&self, limit: Option<usize>) -> Result<Vec<NormalizedMarket>, MarketApiError> {
        self.ranked(RankingView::EndingSoon, limit).await
    }

    pub async fn hot(&self, limit: Option<usize>) -> Result<Vec<NormalizedMarket>, MarketApiError> {
        self.ranked(RankingView::Hot, limit).await
    }
}
