use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use geria_core::models::history::{FormScoreHistory, PeerComparison};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn score_history(
    State(state): State<AppState>,
    Path(subject_id): Path<Uuid>,
) -> Result<Json<Vec<FormScoreHistory>>, ApiError> {
    Ok(Json(state.history.score_history(subject_id).await?))
}

pub async fn score_history_by_form_type(
    State(state): State<AppState>,
    Path((subject_id, form_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<FormScoreHistory>>, ApiError> {
    Ok(Json(
        state
            .history
            .score_history_by_form_type(subject_id, form_id)
            .await?,
    ))
}

pub async fn compare_with_peers(
    State(state): State<AppState>,
    Path((form_id, subject_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PeerComparison>, ApiError> {
    Ok(Json(
        state.history.compare_with_peers(form_id, subject_id).await?,
    ))
}
