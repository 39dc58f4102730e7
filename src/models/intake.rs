// src/models/intake.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::client::{ClientAggregate, EntrepriseInput, PersonInput};
use crate::models::property::{Property, PropertyInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "intake_target", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntakeTarget {
    Owner,
    Tenant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "intake_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntakeStatus {
    Pending,
    Submitted,
    Revoked,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntakeLink {
    pub id: Uuid,
    #[schema(example = "5b0c0f6f2d9b4a4c8f7f2b8a9d1e3c4f")]
    pub token: String,
    pub client_id: Uuid,
    pub target: IntakeTarget,
    pub property_id: Option<Uuid>,
    pub bail_id: Option<Uuid>,
    pub status: IntakeStatus,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl IntakeLink {
    pub fn is_usable(&self) -> bool {
        self.status == IntakeStatus::Pending
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntakeLinkPayload {
    pub client_id: Uuid,
    pub target: IntakeTarget,
    pub property_id: Option<Uuid>,
    pub bail_id: Option<Uuid>,
}

/// Formulário enviado pelo cliente através do link.
/// O bloco `property` só é aceito em formulários de proprietário.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntakeSubmission {
    #[validate(nested)]
    pub person: Option<PersonInput>,
    #[validate(nested)]
    pub entreprise: Option<EntrepriseInput>,
    #[validate(nested)]
    pub property: Option<PropertyInput>,
}

/// O que o formulário público precisa para se pré-preencher.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntakeForm {
    pub link: IntakeLink,
    pub client: ClientAggregate,
    pub property: Option<Property>,
}
