// src/handlers/properties.rs

use axum::{
    extract::{Path, Query, State},
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
        rbac::{Admin, RequireRole, Staff},
    },
    models::{
        bail::Bail,
        completion::{CompletionReport, OverrideCompletionPayload},
        property::{CreatePropertyPayload, Property, PropertyAggregate, PropertyInput, PropertyListQuery},
    },
    services::completion_service::CompletionUpdate,
};

// POST /api/properties
#[utoipa::path(
    post,
    path = "/api/properties",
    tag = "Properties",
    request_body = CreatePropertyPayload,
    responses(
        (status = 201, description = "Bem criado", body = Property),
        (status = 400, description = "Dados inválidos ou dono sem perfil PROPRIETAIRE")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_property(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Json(payload): Json<CreatePropertyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let property = app_state
        .property_service
        .create_property(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(property)))
}

// GET /api/properties
#[utoipa::path(
    get,
    path = "/api/properties",
    tag = "Properties",
    params(("ownerId" = Option<Uuid>, Query, description = "Filtra pelo proprietário")),
    responses(
        (status = 200, description = "Lista de bens", body = Vec<Property>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_properties(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Query(query): Query<PropertyListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let properties = app_state
        .property_service
        .list_properties(&app_state.db_pool, query.owner_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(properties)))
}

// GET /api/properties/{id}
#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "ID do bem")),
    responses(
        (status = 200, description = "Bem com documentos e contato do dono", body = PropertyAggregate),
        (status = 404, description = "Bem não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_property(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let property = app_state
        .property_service
        .get_property(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(property)))
}

// PATCH /api/properties/{id}
#[utoipa::path(
    patch,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "ID do bem")),
    request_body = PropertyInput,
    responses(
        (status = 200, description = "Bem atualizado", body = Property),
        (status = 404, description = "Bem não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_property(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PropertyInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let property = app_state
        .property_service
        .update_property(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(property)))
}

// DELETE /api/properties/{id}
#[utoipa::path(
    delete,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "ID do bem")),
    responses(
        (status = 204, description = "Bem removido"),
        (status = 409, description = "Bem ainda ligado a baux")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_property(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .property_service
        .delete_property(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/properties/{id}/bails
#[utoipa::path(
    get,
    path = "/api/properties/{id}/bails",
    tag = "Bails",
    params(("id" = Uuid, Path, description = "ID do bem")),
    responses(
        (status = 200, description = "Baux do bem", body = Vec<Bail>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_property_bails(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let bails = app_state
        .bail_service
        .list_by_property(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(bails)))
}

// GET /api/properties/{id}/completion
#[utoipa::path(
    get,
    path = "/api/properties/{id}/completion",
    tag = "Completion",
    params(("id" = Uuid, Path, description = "ID do bem")),
    responses(
        (status = 200, description = "Campos e documentos faltantes do bem", body = CompletionReport),
        (status = 404, description = "Bem não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_property_completion(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .property_service
        .completion(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(report)))
}

// PUT /api/properties/{id}/completion
#[utoipa::path(
    put,
    path = "/api/properties/{id}/completion",
    tag = "Completion",
    params(("id" = Uuid, Path, description = "ID do bem")),
    request_body = OverrideCompletionPayload,
    responses(
        (status = 200, description = "Status definido manualmente", body = CompletionUpdate),
        (status = 403, description = "Somente administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn override_property_completion(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<Admin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OverrideCompletionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let update = app_state
        .property_service
        .override_completion(id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!(property_id = %id, admin_id = %guard.user.0.id, status = ?payload.status, "status de completude do bem definido manualmente");
    Ok((StatusCode::OK, Json(update)))
}
