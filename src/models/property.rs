// src/models/property.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::client::{CompletionStatus, ProfilType};
use crate::models::document::Document;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "property_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    Appartement,
    Maison,
    Studio,
    Local,
    Autre,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "property_legal_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyLegalStatus {
    Monopropriete,
    CoPropriete,
    Lotissement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "property_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    NonLouer,
    Prospect,
    InProgress,
    Active,
    Archived,
}

// --- Entidade ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[schema(example = "T3 Croix-Rousse")]
    pub label: Option<String>,
    #[schema(example = "12 rue des Tables Claudiennes, 69001 Lyon")]
    pub full_address: String,
    #[schema(example = "64.50")]
    pub surface_m2: Option<Decimal>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub legal_status: Option<PropertyLegalStatus>,
    pub status: PropertyStatus,
    pub completion_status: CompletionStatus,

    // Mobiliário mínimo exigido para um bail meublé
    pub has_bedding: bool,
    pub has_blackout: bool,
    pub has_hob: bool,
    pub has_oven_or_microwave: bool,
    pub has_fridge: bool,
    pub has_freezer: bool,
    pub has_tableware: bool,
    pub has_kitchen_utensils: bool,
    pub has_table: bool,
    pub has_seating: bool,
    pub has_storage_shelves: bool,
    pub has_light_fixtures: bool,
    pub has_cleaning_equipment: bool,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_tight_zone: bool,
    pub has_rent_control: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    fn furniture(&self) -> [bool; 13] {
        [
            self.has_bedding,
            self.has_blackout,
            self.has_hob,
            self.has_oven_or_microwave,
            self.has_fridge,
            self.has_freezer,
            self.has_tableware,
            self.has_kitchen_utensils,
            self.has_table,
            self.has_seating,
            self.has_storage_shelves,
            self.has_light_fixtures,
            self.has_cleaning_equipment,
        ]
    }

    /// Um bail meublé só é possível com todo o mobiliário mínimo presente.
    pub fn is_furnished_eligible(&self) -> bool {
        self.furniture().iter().all(|present| *present)
    }

    pub fn display_name(&self) -> String {
        self.label
            .clone()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| self.full_address.clone())
    }
}

/// Contato do proprietário, usado no e-mail de mudança de status.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerContact {
    pub client_id: Uuid,
    pub email: Option<String>,
    pub profil_type: ProfilType,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAggregate {
    #[serde(flatten)]
    pub property: Property,
    pub documents: Vec<Document>,
    pub owner: Option<OwnerContact>,
}

// --- Payloads ---

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FurnitureInput {
    pub has_bedding: Option<bool>,
    pub has_blackout: Option<bool>,
    pub has_hob: Option<bool>,
    pub has_oven_or_microwave: Option<bool>,
    pub has_fridge: Option<bool>,
    pub has_freezer: Option<bool>,
    pub has_tableware: Option<bool>,
    pub has_kitchen_utensils: Option<bool>,
    pub has_table: Option<bool>,
    pub has_seating: Option<bool>,
    pub has_storage_shelves: Option<bool>,
    pub has_light_fixtures: Option<bool>,
    pub has_cleaning_equipment: Option<bool>,
}

/// Campos editáveis de um bem. Campo ausente ou `null` mantém o valor atual;
/// `label: ""` apaga o rótulo. O endereço nunca fica vazio.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    pub label: Option<String>,
    #[validate(length(min = 5, message = "invalid_address"))]
    pub full_address: Option<String>,
    #[schema(example = "42.0")]
    pub surface_m2: Option<Decimal>,
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub legal_status: Option<PropertyLegalStatus>,
    pub status: Option<PropertyStatus>,
    #[serde(default)]
    #[validate(nested)]
    pub furniture: FurnitureInput,
    #[validate(range(min = -90.0, max = 90.0, message = "invalid_latitude"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "invalid_longitude"))]
    pub longitude: Option<f64>,
    pub is_tight_zone: Option<bool>,
    pub has_rent_control: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyPayload {
    pub owner_id: Uuid,
    #[validate(length(min = 5, message = "invalid_address"))]
    pub full_address: String,
    #[serde(default)]
    #[validate(nested)]
    pub details: PropertyInput,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListQuery {
    pub owner_id: Option<Uuid>,
}
