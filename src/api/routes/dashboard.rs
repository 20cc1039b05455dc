//! The rendered dashboard page.

use axum::extract::State;
use axum::response::Html;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::load::load_dataset;
use crate::render::{build_render_model, render_html};

/// `GET /` — reload the snapshot, recompute, render.
pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let dataset =
        load_dataset(&state.config.data).map_err(|e| ApiError::Internal(e.to_string()))?;
    let model = build_render_model(&dataset, &state.config)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Html(render_html(&model)))
}
