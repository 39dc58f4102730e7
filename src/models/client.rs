// src/models/client.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::document::Document;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "client_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientType {
    PersonnePhysique,
    PersonneMorale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "profil_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfilType {
    Proprietaire,
    Locataire,
    Lead,
}

/// Estado de completude de um cliente ou de um bem.
/// `PendingCheck` e `Completed` são "pegajosos": o recálculo automático nunca os altera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "completion_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionStatus {
    NotStarted,
    Partial,
    PendingCheck,
    Completed,
}

impl CompletionStatus {
    pub fn is_sticky(self) -> bool {
        matches!(self, CompletionStatus::PendingCheck | CompletionStatus::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompletionStatus::NotStarted => "NOT_STARTED",
            CompletionStatus::Partial => "PARTIAL",
            CompletionStatus::PendingCheck => "PENDING_CHECK",
            CompletionStatus::Completed => "COMPLETED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "family_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FamilyStatus {
    Celibataire,
    Marie,
    Pacs,
    Divorce,
    Veuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "matrimonial_regime", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatrimonialRegime {
    CommunauteReduiteAuxAcquets,
    SeparationDeBiens,
    ParticipationAuxAcquets,
    CommunauteUniverselle,
}

// --- ENTIDADES ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub client_type: ClientType,
    pub profil_type: ProfilType,
    pub completion_status: CompletionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: Uuid,
    pub client_id: Uuid,
    pub is_primary: bool,
    #[schema(example = "Camille")]
    pub first_name: Option<String>,
    #[schema(example = "Martin")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_address: Option<String>,
    #[schema(example = "Française")]
    pub nationality: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub profession: Option<String>,
    pub family_status: Option<FamilyStatus>,
    pub matrimonial_regime: Option<MatrimonialRegime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Perfil novo traz requisitos novos: o status volta a NOT_STARTED para o
    /// recálculo valer, mesmo saindo de um PENDING_CHECK de LEAD.
    pub fn convert_to(&mut self, profil_type: ProfilType) {
        self.profil_type = profil_type;
        self.completion_status = CompletionStatus::NotStarted;
    }
}

impl Person {
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();

        if parts.is_empty() { None } else { Some(parts.join(" ")) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entreprise {
    pub id: Uuid,
    pub client_id: Uuid,
    #[schema(example = "SCI Les Tilleuls")]
    pub legal_name: Option<String>,
    pub name: Option<String>,
    #[schema(example = "812 345 678 00012")]
    pub registration: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- AGREGADOS (leitura com includes) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonWithDocuments {
    #[serde(flatten)]
    pub person: Person,
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntrepriseWithDocuments {
    #[serde(flatten)]
    pub entreprise: Entreprise,
    pub documents: Vec<Document>,
}

/// Cliente carregado com pessoas, empresa e documentos numa única leitura.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientAggregate {
    #[serde(flatten)]
    pub client: Client,
    pub persons: Vec<PersonWithDocuments>,
    pub entreprise: Option<EntrepriseWithDocuments>,
    pub documents: Vec<Document>,
}

impl ClientAggregate {
    /// Primeira pessoa marcada como principal, senão a primeira pessoa.
    pub fn primary_person(&self) -> Option<&PersonWithDocuments> {
        self.persons
            .iter()
            .find(|p| p.person.is_primary)
            .or_else(|| self.persons.first())
    }

    pub fn display_name(&self) -> String {
        let name = match self.client.client_type {
            ClientType::PersonnePhysique => self.primary_person().and_then(|p| p.person.display_name()),
            ClientType::PersonneMorale => self.entreprise.as_ref().and_then(|e| {
                e.entreprise.legal_name.clone().or_else(|| e.entreprise.name.clone())
            }),
        };
        name.unwrap_or_else(|| "Client".to_string())
    }

    pub fn contact_email(&self) -> Option<String> {
        match self.client.client_type {
            ClientType::PersonnePhysique => self.primary_person().and_then(|p| p.person.email.clone()),
            ClientType::PersonneMorale => self.entreprise.as_ref().and_then(|e| e.entreprise.email.clone()),
        }
    }
}

// --- PAYLOADS ---

/// Campos editáveis de uma pessoa.
///
/// Atualização parcial: campo ausente ou `null` mantém o valor atual. Para apagar
/// um texto, envie `""`; texto vazio conta como não preenchido na completude.
/// Nome, sobrenome e e-mail não aceitam `""`, só podem ser trocados.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonInput {
    #[validate(length(min = 1, message = "required"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub last_name: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_address: Option<String>,
    pub nationality: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "1985-04-12")]
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub profession: Option<String>,
    pub family_status: Option<FamilyStatus>,
    pub matrimonial_regime: Option<MatrimonialRegime>,
}

/// Campos editáveis de uma empresa. Mesma regra de `PersonInput`: `null` mantém,
/// `""` apaga; razão social, registro e e-mail só podem ser trocados.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntrepriseInput {
    #[validate(length(min = 1, message = "required"))]
    pub legal_name: Option<String>,
    pub name: Option<String>,
    #[validate(length(min = 9, max = 20, message = "invalid_registration"))]
    pub registration: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_address: Option<String>,
}

/// Cliente físico nasce com a pessoa principal; moral, com a empresa.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[serde(rename = "type")]
    pub client_type: ClientType,
    #[serde(default = "default_profil")]
    pub profil_type: ProfilType,
    #[validate(nested)]
    pub person: Option<PersonInput>,
    #[validate(nested)]
    pub entreprise: Option<EntrepriseInput>,
}

fn default_profil() -> ProfilType {
    ProfilType::Lead
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPersonPayload {
    #[serde(flatten)]
    #[validate(nested)]
    pub person: PersonInput,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertLeadPayload {
    pub profil_type: ProfilType,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientListQuery {
    pub profil_type: Option<ProfilType>,
}
