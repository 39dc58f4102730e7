// src/models/document.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "document_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    IdIdentity,
    Kbis,
    Statutes,
    LivretDeFamille,
    ContratDePacs,
    Insurance,
    Rib,
    Diagnostics,
    TitleDeed,
    ReglementCopropriete,
    CahierDeChargeLotissement,
    StatutDeLassociationSyndicale,
    BailSigne,
    EtatDesLieux,
    Other,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::IdIdentity => "ID_IDENTITY",
            DocumentKind::Kbis => "KBIS",
            DocumentKind::Statutes => "STATUTES",
            DocumentKind::LivretDeFamille => "LIVRET_DE_FAMILLE",
            DocumentKind::ContratDePacs => "CONTRAT_DE_PACS",
            DocumentKind::Insurance => "INSURANCE",
            DocumentKind::Rib => "RIB",
            DocumentKind::Diagnostics => "DIAGNOSTICS",
            DocumentKind::TitleDeed => "TITLE_DEED",
            DocumentKind::ReglementCopropriete => "REGLEMENT_COPROPRIETE",
            DocumentKind::CahierDeChargeLotissement => "CAHIER_DE_CHARGE_LOTISSEMENT",
            DocumentKind::StatutDeLassociationSyndicale => "STATUT_DE_LASSOCIATION_SYNDICALE",
            DocumentKind::BailSigne => "BAIL_SIGNE",
            DocumentKind::EtatDesLieux => "ETAT_DES_LIEUX",
            DocumentKind::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub kind: DocumentKind,
    #[schema(example = "clients/2f1c/id-recto.pdf")]
    pub file_key: String,
    #[schema(example = "application/pdf")]
    pub mime_type: String,
    pub label: Option<String>,
    pub client_id: Option<Uuid>,
    pub person_id: Option<Uuid>,
    pub entreprise_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub bail_id: Option<Uuid>,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn owner(&self) -> Result<DocumentOwner, AppError> {
        DocumentOwner::from_ids(
            self.client_id,
            self.person_id,
            self.entreprise_id,
            self.property_id,
            self.bail_id,
        )
    }
}

/// Dono de um documento: exatamente uma das cinco chaves estrangeiras.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOwner {
    Client(Uuid),
    Person(Uuid),
    Entreprise(Uuid),
    Property(Uuid),
    Bail(Uuid),
}

impl DocumentOwner {
    pub fn from_ids(
        client_id: Option<Uuid>,
        person_id: Option<Uuid>,
        entreprise_id: Option<Uuid>,
        property_id: Option<Uuid>,
        bail_id: Option<Uuid>,
    ) -> Result<Self, AppError> {
        let candidates = [
            client_id.map(DocumentOwner::Client),
            person_id.map(DocumentOwner::Person),
            entreprise_id.map(DocumentOwner::Entreprise),
            property_id.map(DocumentOwner::Property),
            bail_id.map(DocumentOwner::Bail),
        ];

        let mut owners = candidates.into_iter().flatten();
        match (owners.next(), owners.next()) {
            (Some(owner), None) => Ok(owner),
            _ => Err(AppError::InvalidDocumentOwner),
        }
    }

    /// Colunas (client_id, person_id, entreprise_id, property_id, bail_id).
    pub fn columns(self) -> [Option<Uuid>; 5] {
        match self {
            DocumentOwner::Client(id) => [Some(id), None, None, None, None],
            DocumentOwner::Person(id) => [None, Some(id), None, None, None],
            DocumentOwner::Entreprise(id) => [None, None, Some(id), None, None],
            DocumentOwner::Property(id) => [None, None, None, Some(id), None],
            DocumentOwner::Bail(id) => [None, None, None, None, Some(id)],
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDocumentPayload {
    pub kind: DocumentKind,
    #[validate(length(min = 1, message = "required"))]
    pub file_key: String,
    #[validate(length(min = 3, message = "invalid_mime_type"))]
    #[schema(example = "application/pdf")]
    pub mime_type: String,
    pub label: Option<String>,
    pub client_id: Option<Uuid>,
    pub person_id: Option<Uuid>,
    pub entreprise_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub bail_id: Option<Uuid>,
}

/// Filtro da listagem: exatamente um dos ids.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListQuery {
    pub client_id: Option<Uuid>,
    pub person_id: Option<Uuid>,
    pub entreprise_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub bail_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_requires_exactly_one_reference() {
        let id = Uuid::new_v4();

        assert_eq!(
            DocumentOwner::from_ids(None, Some(id), None, None, None).unwrap(),
            DocumentOwner::Person(id)
        );
        assert!(matches!(
            DocumentOwner::from_ids(None, None, None, None, None),
            Err(AppError::InvalidDocumentOwner)
        ));
        assert!(matches!(
            DocumentOwner::from_ids(Some(id), None, None, Some(Uuid::new_v4()), None),
            Err(AppError::InvalidDocumentOwner)
        ));
    }

    #[test]
    fn owner_columns_place_the_id_in_its_slot() {
        let id = Uuid::new_v4();
        assert_eq!(DocumentOwner::Property(id).columns(), [None, None, None, Some(id), None]);
        assert_eq!(DocumentOwner::Client(id).columns()[0], Some(id));
    }
}
