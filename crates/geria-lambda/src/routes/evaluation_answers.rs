use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use geria_core::models::evaluation_answer::{EvaluationAnswerSummary, EvaluationAnswerView};
use geria_core::models::submission::{CreateEvaluationAnswerRequest, FormAnswersRequest};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

pub async fn list_evaluation_answers(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<EvaluationAnswerSummary>>, ApiError> {
    let Query(query) = query?;
    let summaries = state
        .evaluation_answers
        .find_all(query.search.as_deref())
        .await?;
    Ok(Json(summaries))
}

pub async fn list_subject_evaluation_answers(
    State(state): State<AppState>,
    Path(subject_id): Path<Uuid>,
) -> Result<Json<Vec<EvaluationAnswerSummary>>, ApiError> {
    let summaries = state
        .evaluation_answers
        .find_all_by_subject(subject_id)
        .await?;
    Ok(Json(summaries))
}

pub async fn get_evaluation_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EvaluationAnswerView>, ApiError> {
    Ok(Json(state.evaluation_answers.find_one(id).await?))
}

pub async fn create_evaluation_answer(
    State(state): State<AppState>,
    payload: Result<Json<CreateEvaluationAnswerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EvaluationAnswerView>), ApiError> {
    let Json(request) = payload?;
    let view = state.evaluation_answers.create(request).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn add_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<FormAnswersRequest>, JsonRejection>,
) -> Result<Json<EvaluationAnswerView>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.evaluation_answers.add_form(id, request).await?))
}

pub async fn pause(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<FormAnswersRequest>, JsonRejection>,
) -> Result<Json<EvaluationAnswerView>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.evaluation_answers.pause(id, request).await?))
}

pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<FormAnswersRequest>, JsonRejection>,
) -> Result<Json<EvaluationAnswerView>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.evaluation_answers.complete(id, request).await?))
}

pub async fn delete_evaluation_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.evaluation_answers.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
