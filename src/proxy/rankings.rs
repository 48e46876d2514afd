//! Ranked market list endpoint

use super::{AppState, ErrorBody};
use crate::market::{MarketApiError, NormalizedMarket, RankingView};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

/// Upper bound on `limit`; the ranker never sees more than this many markets
const MAX_LIMIT: usize = crate::market::FETCH_LIMIT;

#[derive(Debug, Deserialize)]
pub struct RankedQuery {
    pub limit: Option<usize>,
}

/// GET /api/markets/:view?limit=N
///
/// Examples:
/// - /api/markets/trending
/// - /api/markets/ending-soon?limit=5
/// - /api/markets/hot?limit=20
pub async fn ranked_markets_handler(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Query(query): Query<RankedQuery>,
) -> Response {
    let view: RankingView = match view.parse() {
        Ok(view) => view,
        Err(e) => {
            let body = ErrorBody {
                error: e,
                details: None,
            };
            return (StatusCode::NOT_FOUND, Json(body)).into_response();
        }
    };

    let limit = query.limit.map(|l| l.min(MAX_LIMIT));
    match state.ranker.ranked(view, limit).await {
        Ok(markets) => Json::<Vec<NormalizedMarket>>(markets).into_response(),
        Err(e) => {
            tracing::warn!(view = %view, error = %e, "Ranking request failed");
            market_error_response(e)
        }
    }
}

fn market_error_response(err: MarketApiError) -> Response {
    let status = match &err {
        MarketApiError::Api { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        MarketApiError::Transport(_) | MarketApiError::Decode(_) => StatusCode::BAD_GATEWAY,
        MarketApiError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = ErrorBody {
        error: "Failed to load markets".to_string(),
        details: Some(err.to_string()),
    };
    (status, Json(body)).into_response()
}
