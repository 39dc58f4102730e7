// src/handlers/clients.rs

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
        client::{
            AddPersonPayload, Client, ClientAggregate, ClientListQuery, ConvertLeadPayload,
            CreateClientPayload, Entreprise, EntrepriseInput, Person, PersonInput, ProfilType,
        },
        completion::{DetailedClientCompletion, OverrideCompletionPayload},
    },
    services::completion_service::CompletionUpdate,
};

// =============================================================================
//  CLIENTES
// =============================================================================

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = CreateClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = ClientAggregate),
        (status = 400, description = "Dados inválidos ou bloco incompatível com o tipo")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Json(payload): Json<CreateClientPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let client = app_state
        .client_service
        .create_client(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(client)))
}

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    params(
        ("profilType" = Option<ProfilType>, Query, description = "Filtra por perfil")
    ),
    responses(
        (status = 200, description = "Lista de clientes", body = Vec<Client>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Query(query): Query<ClientListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let clients = app_state
        .client_service
        .list_clients(&app_state.db_pool, query.profil_type)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(clients)))
}

// GET /api/clients/{id}
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente com pessoas, empresa e documentos", body = ClientAggregate),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let client = app_state
        .client_service
        .get_client(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(client)))
}

// DELETE /api/clients/{id}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido"),
        (status = 409, description = "Cliente ainda ligado a bens ou baux")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .client_service
        .delete_client(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/clients/{id}/convert
#[utoipa::path(
    post,
    path = "/api/clients/{id}/convert",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = ConvertLeadPayload,
    responses(
        (status = 200, description = "Lead convertido", body = Client),
        (status = 400, description = "Somente leads podem ser convertidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn convert_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConvertLeadPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let client = app_state
        .client_service
        .convert_lead(&app_state.db_pool, id, payload.profil_type)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(client)))
}

// =============================================================================
//  PESSOAS E EMPRESA
// =============================================================================

// POST /api/clients/{id}/persons
#[utoipa::path(
    post,
    path = "/api/clients/{id}/persons",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = AddPersonPayload,
    responses(
        (status = 201, description = "Pessoa adicionada", body = Person),
        (status = 400, description = "Cliente não é pessoa física")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_person(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddPersonPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let person = app_state
        .client_service
        .add_person(&app_state.db_pool, id, &payload.person, payload.is_primary)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(person)))
}

// POST /api/clients/{id}/persons/{person_id}/primary
#[utoipa::path(
    post,
    path = "/api/clients/{id}/persons/{person_id}/primary",
    tag = "Clients",
    params(
        ("id" = Uuid, Path, description = "ID do cliente"),
        ("person_id" = Uuid, Path, description = "ID da pessoa")
    ),
    responses(
        (status = 204, description = "Pessoa principal alterada"),
        (status = 404, description = "Pessoa não pertence ao cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_primary_person(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path((id, person_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .client_service
        .set_primary_person(&app_state.db_pool, id, person_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/persons/{id}
#[utoipa::path(
    patch,
    path = "/api/persons/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID da pessoa")),
    request_body = PersonInput,
    responses(
        (status = 200, description = "Pessoa atualizada", body = Person),
        (status = 404, description = "Pessoa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_person(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PersonInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let person = app_state
        .client_service
        .update_person(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(person)))
}

// DELETE /api/persons/{id}
#[utoipa::path(
    delete,
    path = "/api/persons/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID da pessoa")),
    responses(
        (status = 204, description = "Pessoa removida"),
        (status = 409, description = "A pessoa principal não pode sair enquanto houver outras")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_person(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .client_service
        .remove_person(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/entreprises/{id}
#[utoipa::path(
    patch,
    path = "/api/entreprises/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = EntrepriseInput,
    responses(
        (status = 200, description = "Empresa atualizada", body = Entreprise),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_entreprise(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EntrepriseInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let entreprise = app_state
        .client_service
        .update_entreprise(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(entreprise)))
}

// =============================================================================
//  COMPLETUDE
// =============================================================================

// GET /api/clients/{id}/completion
#[utoipa::path(
    get,
    path = "/api/clients/{id}/completion",
    tag = "Completion",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Campos e documentos faltantes, por pessoa", body = DetailedClientCompletion)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client_completion(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let completion = app_state
        .client_service
        .completion(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(completion)))
}

// PUT /api/clients/{id}/completion
#[utoipa::path(
    put,
    path = "/api/clients/{id}/completion",
    tag = "Completion",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = OverrideCompletionPayload,
    responses(
        (status = 200, description = "Status definido manualmente", body = CompletionUpdate),
        (status = 403, description = "Somente administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn override_client_completion(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<Admin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OverrideCompletionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let update = app_state
        .client_service
        .override_completion(id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!(client_id = %id, admin_id = %guard.user.0.id, status = ?payload.status, "status de completude definido manualmente");
    Ok((StatusCode::OK, Json(update)))
}
