// src/models/completion.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::client::CompletionStatus;
use crate::models::document::DocumentKind;

/// Campo exigido para considerar um cliente ou um bem completo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum RequiredField {
    FirstName,
    LastName,
    Nationality,
    BirthDate,
    BirthPlace,
    Email,
    Phone,
    FullAddress,
    MatrimonialRegime,
    LegalName,
    Registration,
}

impl RequiredField {
    /// Subconjunto de identidade exigido de co-titulares (pessoas não principais).
    pub const IDENTITY: [RequiredField; 5] = [
        RequiredField::FirstName,
        RequiredField::LastName,
        RequiredField::Nationality,
        RequiredField::BirthDate,
        RequiredField::BirthPlace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequiredField::FirstName => "firstName",
            RequiredField::LastName => "lastName",
            RequiredField::Nationality => "nationality",
            RequiredField::BirthDate => "birthDate",
            RequiredField::BirthPlace => "birthPlace",
            RequiredField::Email => "email",
            RequiredField::Phone => "phone",
            RequiredField::FullAddress => "fullAddress",
            RequiredField::MatrimonialRegime => "matrimonialRegime",
            RequiredField::LegalName => "legalName",
            RequiredField::Registration => "registration",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    pub required_fields: Vec<RequiredField>,
    pub required_documents: Vec<DocumentKind>,
}

impl Requirements {
    pub fn is_empty(&self) -> bool {
        self.required_fields.is_empty() && self.required_documents.is_empty()
    }

    pub(crate) fn field(&mut self, field: RequiredField) {
        if !self.required_fields.contains(&field) {
            self.required_fields.push(field);
        }
    }

    pub(crate) fn document(&mut self, kind: DocumentKind) {
        if !self.required_documents.contains(&kind) {
            self.required_documents.push(kind);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionCheck {
    pub has_all_fields: bool,
    pub has_all_documents: bool,
    pub missing_fields: Vec<RequiredField>,
    pub missing_documents: Vec<DocumentKind>,
}

impl CompletionCheck {
    /// Resultado de uma entidade inexistente: nada preenchido, nada listado.
    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn from_missing(missing_fields: Vec<RequiredField>, missing_documents: Vec<DocumentKind>) -> Self {
        Self {
            has_all_fields: missing_fields.is_empty(),
            has_all_documents: missing_documents.is_empty(),
            missing_fields,
            missing_documents,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.has_all_fields && self.has_all_documents
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonCompletion {
    pub person_id: Uuid,
    pub is_primary: bool,
    pub missing_fields: Vec<RequiredField>,
    pub missing_documents: Vec<DocumentKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntrepriseCompletion {
    pub entreprise_id: Uuid,
    pub missing_fields: Vec<RequiredField>,
    pub missing_documents: Vec<DocumentKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailedClientCompletion {
    #[serde(flatten)]
    pub summary: CompletionCheck,
    pub persons: Vec<PersonCompletion>,
    pub entreprise: Option<EntrepriseCompletion>,
    /// Documentos ligados ao cliente como um todo (família, seguro, RIB...).
    pub client_missing_documents: Vec<DocumentKind>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    pub status: CompletionStatus,
    pub requirements: Requirements,
    pub check: CompletionCheck,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverrideCompletionPayload {
    pub status: CompletionStatus,
}
