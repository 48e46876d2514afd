//! Raw to normalized market conversion

use super::{NormalizedMarket, RawMarket};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Binary outcome labels, YES first
pub const OUTCOMES: [&str; 2] = ["Yes", "No"];

/// Convert integer cents to a dollar decimal
fn cents_to_dollars(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Relative change of `last` against `previous`; zero when `previous` is zero
pub fn change_24h(last_price: i64, previous_price: i64) -> Decimal {
    if previous_price == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(last_price) - Decimal::from(previous_price)) / Decimal::from(previous_price)
}

/// Build the normalized form of a market
///
/// Prices come from the ask side. The input is left untouched.
pub fn normalize(raw: &RawMarket) -> NormalizedMarket {
    let yes_price = cents_to_dollars(raw.yes_ask);
    let no_price = cents_to_dollars(raw.no_ask);

    let close_at = DateTime::parse_from_rfc3339(&raw.close_time)
        .ok()
        .map(|dt| dt.with_timezone(&Utc));

    NormalizedMarket {
        raw: raw.clone(),
        id: raw.ticker.clone(),
        question: raw.title.clone(),
        end_date: raw.close_time.clone(),
        yes_price,
        no_price,
        change_24h: change_24h(raw.last_price, raw.previous_price),
        volume_24h: raw.volume_24h.unwrap_or(0),
        outcomes: OUTCOMES,
        outcome_prices: [format!("{:.2}", yes_price), format!("{:.2}", no_price)],
        close_at,
    }
}

/// Normalize a batch, preserving order
pub fn normalize_all(raws: &[RawMarket]) -> Vec<NormalizedMarket> {
    raws.iter().map(normalize).collect()
}
