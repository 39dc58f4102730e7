// src/handlers/bails.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{RequireRole, Staff},
    },
    models::bail::{BailDetail, CreateBailPayload, TransitionBailPayload},
};

// POST /api/bails
#[utoipa::path(
    post,
    path = "/api/bails",
    tag = "Bails",
    request_body = CreateBailPayload,
    responses(
        (status = 201, description = "Bail criado em DRAFT", body = BailDetail),
        (status = 400, description = "Partes inválidas ou bem não elegível para meublé")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_bail(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Json(payload): Json<CreateBailPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let bail = app_state
        .bail_service
        .create_bail(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(bail)))
}

// GET /api/bails/{id}
#[utoipa::path(
    get,
    path = "/api/bails/{id}",
    tag = "Bails",
    params(("id" = Uuid, Path, description = "ID do bail")),
    responses(
        (status = 200, description = "Bail com as partes", body = BailDetail),
        (status = 404, description = "Bail não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_bail(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let bail = app_state
        .bail_service
        .get_bail(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(bail)))
}

// POST /api/bails/{id}/transition
#[utoipa::path(
    post,
    path = "/api/bails/{id}/transition",
    tag = "Bails",
    params(("id" = Uuid, Path, description = "ID do bail")),
    request_body = TransitionBailPayload,
    responses(
        (status = 200, description = "Status alterado", body = BailDetail),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn transition_bail(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionBailPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let bail = app_state
        .bail_service
        .transition(&app_state.db_pool, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(bail)))
}
