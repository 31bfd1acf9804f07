use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use models::{Laboratory, LaboratoryPayload};

use crate::errors::ApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "type")]
    pub analysis_type: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Laboratory>>, ApiError> {
    let labs = state.laboratories.list().await?;
    Ok(Json(labs))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Laboratory>, ApiError> {
    let lab = state.laboratories.get_by_id(id).await?;
    Ok(Json(lab))
}

/// `GET /laboratories/search?type=`: a missing or blank `type` lists
/// everything, per the service's fallback.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Laboratory>>, ApiError> {
    let labs = state
        .laboratories
        .find_by_type(query.analysis_type.as_deref())
        .await?;
    Ok(Json(labs))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<LaboratoryPayload>,
) -> Result<(StatusCode, Json<Laboratory>), ApiError> {
    payload.validate()?;
    let created = state.laboratories.create(payload).await?;
    info!(id = ?created.id, "laboratory created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<LaboratoryPayload>,
) -> Result<Json<Laboratory>, ApiError> {
    payload.validate()?;
    let updated = state.laboratories.update(id, payload).await?;
    Ok(Json(updated))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.laboratories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
