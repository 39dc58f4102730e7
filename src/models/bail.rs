// src/models/bail.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::client::{CompletionStatus, ProfilType};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "bail_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BailType {
    #[sqlx(rename = "BAIL_NU_3_ANS")]
    #[serde(rename = "BAIL_NU_3_ANS")]
    BailNu3Ans,
    #[sqlx(rename = "BAIL_NU_6_ANS")]
    #[serde(rename = "BAIL_NU_6_ANS")]
    BailNu6Ans,
    #[sqlx(rename = "BAIL_MEUBLE_1_AN")]
    #[serde(rename = "BAIL_MEUBLE_1_AN")]
    BailMeuble1An,
    BailMeubleEtudiant,
    BailMobilite,
    BailCommercial,
}

impl BailType {
    pub fn is_furnished(self) -> bool {
        matches!(
            self,
            BailType::BailMeuble1An | BailType::BailMeubleEtudiant | BailType::BailMobilite
        )
    }

    pub fn family(self) -> BailFamily {
        match self {
            BailType::BailCommercial => BailFamily::Commercial,
            _ => BailFamily::Habitation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "bail_family", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BailFamily {
    Habitation,
    Commercial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "bail_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BailStatus {
    Draft,
    PendingValidation,
    ReadyForNotary,
    ClientContacted,
    Signed,
    Terminated,
    Canceled,
}

impl BailStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BailStatus::Draft => "DRAFT",
            BailStatus::PendingValidation => "PENDING_VALIDATION",
            BailStatus::ReadyForNotary => "READY_FOR_NOTARY",
            BailStatus::ClientContacted => "CLIENT_CONTACTED",
            BailStatus::Signed => "SIGNED",
            BailStatus::Terminated => "TERMINATED",
            BailStatus::Canceled => "CANCELED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BailStatus::Terminated | BailStatus::Canceled)
    }

    /// Ainda aguardando a propagação automática (completude das partes).
    pub fn is_open_for_propagation(self) -> bool {
        matches!(self, BailStatus::Draft | BailStatus::PendingValidation)
    }

    /// Já chegou (ou passou) do estágio em que um notário pode assumir o dossiê.
    pub fn is_notary_stage(self) -> bool {
        matches!(
            self,
            BailStatus::ReadyForNotary | BailStatus::ClientContacted | BailStatus::Signed
        )
    }

    /// Grafo do ciclo de vida para transições manuais.
    pub fn can_transition_to(self, next: BailStatus) -> bool {
        use BailStatus::*;

        if self.is_terminal() || self == next {
            return false;
        }
        if next == Canceled {
            return true;
        }

        matches!(
            (self, next),
            (Draft, PendingValidation)
                | (Draft, ReadyForNotary)
                | (PendingValidation, ReadyForNotary)
                | (PendingValidation, Draft)
                | (ReadyForNotary, ClientContacted)
                | (ClientContacted, Signed)
                | (Signed, Terminated)
        )
    }
}

// --- Entidade ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bail {
    pub id: Uuid,
    pub property_id: Uuid,
    pub bail_type: BailType,
    pub bail_family: BailFamily,
    pub status: BailStatus,
    #[schema(example = "950.00")]
    pub rent_amount: Decimal,
    #[schema(example = "80.00")]
    pub monthly_charges: Decimal,
    #[schema(example = "950.00")]
    pub security_deposit: Decimal,
    pub effective_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[schema(example = 5)]
    pub payment_day: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BailParty {
    pub client_id: Uuid,
    pub profil_type: ProfilType,
    pub completion_status: CompletionStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BailDetail {
    #[serde(flatten)]
    pub bail: Bail,
    pub parties: Vec<BailParty>,
}

impl BailDetail {
    pub fn owner(&self) -> Option<&BailParty> {
        self.parties.iter().find(|p| p.profil_type == ProfilType::Proprietaire)
    }

    pub fn tenant(&self) -> Option<&BailParty> {
        self.parties.iter().find(|p| p.profil_type == ProfilType::Locataire)
    }
}

/// Snapshot mínimo para decidir a propagação de status de um bail.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BailPropagationView {
    pub bail_id: Uuid,
    pub status: BailStatus,
    pub owner_status: Option<CompletionStatus>,
    pub tenant_status: Option<CompletionStatus>,
    pub property_status: Option<CompletionStatus>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBailPayload {
    pub property_id: Uuid,
    pub bail_type: BailType,
    #[validate(length(min = 1, max = 2, message = "invalid_parties"))]
    pub party_ids: Vec<Uuid>,
    pub rent_amount: Decimal,
    #[serde(default)]
    pub monthly_charges: Decimal,
    #[serde(default)]
    pub security_deposit: Decimal,
    #[schema(value_type = String, format = Date, example = "2025-09-01")]
    pub effective_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 31, message = "invalid_payment_day"))]
    pub payment_day: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionBailPayload {
    pub status: BailStatus,
}

#[cfg(test)]
mod tests {
    use super::BailStatus::*;
    use super::*;

    #[test]
    fn lifecycle_moves_forward_one_step_at_a_time() {
        assert!(Draft.can_transition_to(PendingValidation));
        assert!(ReadyForNotary.can_transition_to(ClientContacted));
        assert!(ClientContacted.can_transition_to(Signed));
        assert!(Signed.can_transition_to(Terminated));

        assert!(!Draft.can_transition_to(Signed));
        assert!(!ReadyForNotary.can_transition_to(Terminated));
    }

    #[test]
    fn cancel_is_allowed_until_terminal() {
        assert!(Draft.can_transition_to(Canceled));
        assert!(Signed.can_transition_to(Canceled));
        assert!(!Terminated.can_transition_to(Canceled));
        assert!(!Canceled.can_transition_to(Draft));
    }

    #[test]
    fn furnished_types_and_family() {
        assert!(BailType::BailMeuble1An.is_furnished());
        assert!(BailType::BailMobilite.is_furnished());
        assert!(!BailType::BailNu3Ans.is_furnished());
        assert_eq!(BailType::BailCommercial.family(), BailFamily::Commercial);
        assert_eq!(BailType::BailNu6Ans.family(), BailFamily::Habitation);
    }

    #[test]
    fn bail_type_wire_names_keep_the_digits() {
        let json = serde_json::to_string(&BailType::BailNu3Ans).unwrap();
        assert_eq!(json, "\"BAIL_NU_3_ANS\"");
        let parsed: BailType = serde_json::from_str("\"BAIL_MEUBLE_1_AN\"").unwrap();
        assert_eq!(parsed, BailType::BailMeuble1An);
    }
}
