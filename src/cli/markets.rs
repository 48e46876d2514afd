//! Markets command implementation

use crate::auth::Credentials;
use crate::config::Config;
use crate::market::{MarketClient, MarketClientConfig, MarketRanker, RankingView, DEFAULT_LIMIT};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct MarketsArgs {
    /// Ranking view
    #[arg(value_enum)]
    pub view: RankingView,

    /// Number of markets to show
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl MarketsArgs {
    pub async fn execute(&self, config: &Config, credentials: Option<Credentials>) -> anyhow::Result<()> {
        let client = MarketClient::with_config(MarketClientConfig {
            base_url: config.upstream.base_url.clone(),
            timeout: Duration::from_secs(config.upstream.timeout_secs.unwrap_or(30)),
            user_agent: config.upstream.user_agent.clone(),
        })?
        .with_credentials(credentials);

        let ranker = MarketRanker::new(Arc::new(client));
        let markets = ranker.ranked(self.view, Some(self.limit)).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&markets)?);
            return Ok(());
        }

        println!("{} markets ({})", self.view, markets.len());
        println!(
            "{:<32} {:>6} {:>6} {:>9} {:>10} {:<25}",
            "TICKER", "YES", "NO", "CHG 24H", "VOL 24H", "CLOSES"
        );
        for m in &markets {
            println!(
                "{:<32} {:>6} {:>6} {:>8.1}% {:>10} {:<25}",
                m.id,
                m.outcome_prices[0],
                m.outcome_prices[1],
                m.change_24h * rust_decimal_macros::dec!(100),
                m.volume_24h,
                m.end_date
            );
        }

        Ok(())
    }
}
