// src/handlers/intake.rs

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
    models::intake::{CreateIntakeLinkPayload, IntakeForm, IntakeLink, IntakeSubmission},
};

// =============================================================================
//  GESTÃO DOS LINKS (equipe)
// =============================================================================

// POST /api/intake-links
#[utoipa::path(
    post,
    path = "/api/intake-links",
    tag = "Intake",
    request_body = CreateIntakeLinkPayload,
    responses(
        (status = 201, description = "Link de uso único criado", body = IntakeLink),
        (status = 400, description = "Formulário incompatível com o perfil do cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_link(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Json(payload): Json<CreateIntakeLinkPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let link = app_state
        .intake_service
        .create_link(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(link)))
}

// GET /api/clients/{id}/intake-links
#[utoipa::path(
    get,
    path = "/api/clients/{id}/intake-links",
    tag = "Intake",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Links do cliente", body = Vec<IntakeLink>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_client_links(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let links = app_state
        .intake_service
        .list_by_client(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(links)))
}

// POST /api/intake-links/{id}/revoke
#[utoipa::path(
    post,
    path = "/api/intake-links/{id}/revoke",
    tag = "Intake",
    params(("id" = Uuid, Path, description = "ID do link")),
    responses(
        (status = 200, description = "Link revogado", body = IntakeLink),
        (status = 410, description = "Link já utilizado ou revogado")
    ),
    security(("api_jwt" = []))
)]
pub async fn revoke_link(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let link = app_state
        .intake_service
        .revoke(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(link)))
}

// =============================================================================
//  FORMULÁRIO PÚBLICO (sem autenticação, o token é a credencial)
// =============================================================================

// GET /api/intake/{token}
#[utoipa::path(
    get,
    path = "/api/intake/{token}",
    tag = "Intake",
    params(("token" = String, Path, description = "Token do link")),
    responses(
        (status = 200, description = "Dados para pré-preencher o formulário", body = IntakeForm),
        (status = 404, description = "Link não encontrado"),
        (status = 410, description = "Link já utilizado ou revogado")
    )
)]
pub async fn open_form(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let form = app_state
        .intake_service
        .open_form(&app_state.db_pool, &token)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(form)))
}

// POST /api/intake/{token}
#[utoipa::path(
    post,
    path = "/api/intake/{token}",
    tag = "Intake",
    params(("token" = String, Path, description = "Token do link")),
    request_body = IntakeSubmission,
    responses(
        (status = 200, description = "Formulário recebido", body = IntakeLink),
        (status = 400, description = "Dados inválidos"),
        (status = 410, description = "Link já utilizado ou revogado")
    )
)]
pub async fn submit_form(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(token): Path<String>,
    Json(payload): Json<IntakeSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let link = app_state
        .intake_service
        .submit(&app_state.db_pool, &token, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(link)))
}
