// src/handlers/notifications.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{RequireRole, Staff},
    },
    models::notification::{Notification, NotificationListQuery},
};

// GET /api/notifications
#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    params(("limit" = Option<i64>, Query, description = "Máximo de itens (padrão 50)")),
    responses(
        (status = 200, description = "Notificações não lidas, mais recentes primeiro", body = Vec<Notification>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_unread(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Query(query): Query<NotificationListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let notifications = app_state
        .notification_service
        .list_unread(&app_state.db_pool, query.limit)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(notifications)))
}

// POST /api/notifications/{id}/read
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    tag = "Notifications",
    params(("id" = Uuid, Path, description = "ID da notificação")),
    responses(
        (status = 204, description = "Marcada como lida"),
        (status = 404, description = "Notificação não encontrada ou já lida")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_read(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .notification_service
        .mark_read(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
