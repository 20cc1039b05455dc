//! JSON views of the derived table and aggregate summary.

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::TierDistribution;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::derive::{derive_all, sort_for_display};
use crate::load::load_dataset;
use crate::models::DerivedRecord;
use crate::render::{
    build_render_model, ClassificationCount, ExtremumEntry, Leaderboard, ScoreGainGroup,
    TierGroup,
};

/// The aggregate summary: everything the page shows except the full
/// ranking table.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub as_of: Option<NaiveDate>,
    pub total_players: usize,
    pub classification_counts: Vec<ClassificationCount>,
    pub promotions: Vec<TierGroup>,
    pub demotions: Vec<TierGroup>,
    pub extrema: Vec<ExtremumEntry>,
    pub leaderboards: Vec<Leaderboard>,
    pub distribution: TierDistribution,
    pub score_gains: Vec<ScoreGainGroup>,
}

/// `GET /api/summary`
pub async fn summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, ApiError> {
    let dataset =
        load_dataset(&state.config.data).map_err(|e| ApiError::Internal(e.to_string()))?;
    let model = build_render_model(&dataset, &state.config)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(SummaryResponse {
        as_of: model.as_of,
        total_players: model.total_players,
        classification_counts: model.classification_counts,
        promotions: model.promotions,
        demotions: model.demotions,
        extrema: model.extrema,
        leaderboards: model.leaderboards,
        distribution: model.distribution,
        score_gains: model.score_gains,
    }))
}

#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub players: Vec<DerivedRecord>,
    pub total: usize,
}

/// `GET /api/players` — the derived table in display order.
pub async fn players(State(state): State<AppState>) -> Result<Json<PlayersResponse>, ApiError> {
    let dataset =
        load_dataset(&state.config.data).map_err(|e| ApiError::Internal(e.to_string()))?;
    let policy = state
        .config
        .classification
        .policy()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let display_order = state
        .config
        .classification
        .display_order()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut derived = derive_all(&dataset.players, &policy);
    sort_for_display(&mut derived, &display_order);

    let total = derived.len();
    Ok(Json(PlayersResponse {
        players: derived,
        total,
    }))
}
