// src/handlers/notaire.rs

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
        rbac::{DossierAccess, RequireRole, Staff},
    },
    models::notaire::{
        AssignNotairePayload, BailMessage, CreateNotaireRequestPayload, DossierNotaireAssignment,
        NotaireRequest, PostMessagePayload, UpdateNotaireRequestPayload,
    },
};

// =============================================================================
//  ATRIBUIÇÃO
// =============================================================================

// PUT /api/bails/{id}/notaire
#[utoipa::path(
    put,
    path = "/api/bails/{id}/notaire",
    tag = "Notaire",
    params(("id" = Uuid, Path, description = "ID do bail")),
    request_body = AssignNotairePayload,
    responses(
        (status = 200, description = "Notário atribuído (ou substituído)", body = DossierNotaireAssignment),
        (status = 403, description = "O usuário indicado não é notário"),
        (status = 409, description = "Bail ainda não está pronto para o notário")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_notaire(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignNotairePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let assignment = app_state
        .notaire_service
        .assign(&app_state.db_pool, id, payload.notaire_id, guard.user.0.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(assignment)))
}

// GET /api/bails/{id}/notaire
#[utoipa::path(
    get,
    path = "/api/bails/{id}/notaire",
    tag = "Notaire",
    params(("id" = Uuid, Path, description = "ID do bail")),
    responses(
        (status = 200, description = "Dossiê notarial do bail", body = DossierNotaireAssignment),
        (status = 404, description = "Nenhum notário atribuído")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dossier(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<DossierAccess>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let assignment = app_state
        .notaire_service
        .dossier(&app_state.db_pool, id, &guard.user.0)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(assignment)))
}

// =============================================================================
//  PEDIDOS
// =============================================================================

// POST /api/bails/{id}/notaire/requests
#[utoipa::path(
    post,
    path = "/api/bails/{id}/notaire/requests",
    tag = "Notaire",
    params(("id" = Uuid, Path, description = "ID do bail")),
    request_body = CreateNotaireRequestPayload,
    responses(
        (status = 201, description = "Pedido criado", body = NotaireRequest),
        (status = 404, description = "Nenhum notário atribuído")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_request(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<DossierAccess>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateNotaireRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let request = app_state
        .notaire_service
        .create_request(&app_state.db_pool, id, &guard.user.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(request)))
}

// GET /api/bails/{id}/notaire/requests
#[utoipa::path(
    get,
    path = "/api/bails/{id}/notaire/requests",
    tag = "Notaire",
    params(("id" = Uuid, Path, description = "ID do bail")),
    responses(
        (status = 200, description = "Pedidos do dossiê", body = Vec<NotaireRequest>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<DossierAccess>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = app_state
        .notaire_service
        .list_requests(&app_state.db_pool, id, &guard.user.0)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(requests)))
}

// PATCH /api/bails/{id}/notaire/requests/{request_id}
#[utoipa::path(
    patch,
    path = "/api/bails/{id}/notaire/requests/{request_id}",
    tag = "Notaire",
    params(
        ("id" = Uuid, Path, description = "ID do bail"),
        ("request_id" = Uuid, Path, description = "ID do pedido")
    ),
    request_body = UpdateNotaireRequestPayload,
    responses(
        (status = 200, description = "Status do pedido alterado", body = NotaireRequest),
        (status = 404, description = "Pedido não encontrado neste dossiê")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_request(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<DossierAccess>,
    Path((id, request_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateNotaireRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state
        .notaire_service
        .update_request_status(&app_state.db_pool, id, request_id, &guard.user.0, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(request)))
}

// =============================================================================
//  MENSAGENS
// =============================================================================

// POST /api/bails/{id}/messages
#[utoipa::path(
    post,
    path = "/api/bails/{id}/messages",
    tag = "Notaire",
    params(("id" = Uuid, Path, description = "ID do bail")),
    request_body = PostMessagePayload,
    responses(
        (status = 201, description = "Mensagem enviada", body = BailMessage),
        (status = 403, description = "Autor não participa do dossiê"),
        (status = 404, description = "Nenhum notário atribuído")
    ),
    security(("api_jwt" = []))
)]
pub async fn post_message(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<DossierAccess>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostMessagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let message = app_state
        .notaire_service
        .post_message(&app_state.db_pool, id, &guard.user.0, &payload.content)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(message)))
}

// GET /api/bails/{id}/messages
#[utoipa::path(
    get,
    path = "/api/bails/{id}/messages",
    tag = "Notaire",
    params(("id" = Uuid, Path, description = "ID do bail")),
    responses(
        (status = 200, description = "Mensagens do bail", body = Vec<BailMessage>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_messages(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<DossierAccess>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = app_state
        .notaire_service
        .list_messages(&app_state.db_pool, id, &guard.user.0)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(messages)))
}
