// src/models/notaire.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notaire_request_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotaireRequestType {
    Document,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notaire_request_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotaireRequestStatus {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "party_side", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartySide {
    Owner,
    Tenant,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DossierNotaireAssignment {
    pub id: Uuid,
    pub bail_id: Uuid,
    pub notaire_id: Uuid,
    pub assigned_by: Option<Uuid>,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotaireRequest {
    pub id: Uuid,
    pub dossier_id: Uuid,
    pub request_type: NotaireRequestType,
    pub target_party: PartySide,
    #[schema(example = "Attestation d'assurance habitation")]
    pub title: String,
    pub content: Option<String>,
    pub status: NotaireRequestStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BailMessage {
    pub id: Uuid,
    pub bail_id: Uuid,
    pub dossier_id: Option<Uuid>,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignNotairePayload {
    pub notaire_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotaireRequestPayload {
    pub request_type: NotaireRequestType,
    pub target_party: PartySide,
    #[validate(length(min = 1, max = 200, message = "required"))]
    pub title: String,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotaireRequestPayload {
    pub status: NotaireRequestStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostMessagePayload {
    #[validate(length(min = 1, max = 5000, message = "required"))]
    pub content: String,
}
