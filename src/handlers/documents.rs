// src/handlers/documents.rs

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
        rbac::{RequireRole, Staff},
    },
    models::document::{Document, DocumentListQuery, DocumentOwner, RegisterDocumentPayload},
};

// POST /api/documents
#[utoipa::path(
    post,
    path = "/api/documents",
    tag = "Documents",
    request_body = RegisterDocumentPayload,
    responses(
        (status = 201, description = "Documento registrado", body = Document),
        (status = 400, description = "O documento precisa de exatamente um dono")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_document(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<Staff>,
    Json(payload): Json<RegisterDocumentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let document = app_state
        .document_service
        .register(&app_state.db_pool, &payload, Some(guard.user.0.id))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(document)))
}

// GET /api/documents
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "Documents",
    params(
        ("clientId" = Option<Uuid>, Query, description = "Documentos do cliente"),
        ("personId" = Option<Uuid>, Query, description = "Documentos da pessoa"),
        ("entrepriseId" = Option<Uuid>, Query, description = "Documentos da empresa"),
        ("propertyId" = Option<Uuid>, Query, description = "Documentos do bem"),
        ("bailId" = Option<Uuid>, Query, description = "Documentos do bail")
    ),
    responses(
        (status = 200, description = "Documentos do dono informado", body = Vec<Document>),
        (status = 400, description = "Informe exatamente um filtro")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_documents(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Query(query): Query<DocumentListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = DocumentOwner::from_ids(
        query.client_id,
        query.person_id,
        query.entreprise_id,
        query.property_id,
        query.bail_id,
    )
    .map_err(|e| e.to_api_error(&locale))?;

    let documents = app_state
        .document_service
        .list_for_owner(&app_state.db_pool, owner)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(documents)))
}

// DELETE /api/documents/{id}
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(("id" = Uuid, Path, description = "ID do documento")),
    responses(
        (status = 204, description = "Documento removido"),
        (status = 404, description = "Documento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_document(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .document_service
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
