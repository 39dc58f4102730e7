// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;
use crate::models::bail::BailStatus;

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Cliente não encontrado")]
    ClientNotFound,

    #[error("Pessoa não encontrada")]
    PersonNotFound,

    #[error("Empresa não encontrada")]
    EntrepriseNotFound,

    #[error("Bem não encontrado")]
    PropertyNotFound,

    #[error("Bail não encontrado")]
    BailNotFound,

    #[error("Documento não encontrado")]
    DocumentNotFound,

    #[error("Link de intake não encontrado")]
    IntakeLinkNotFound,

    #[error("Link de intake já utilizado ou revogado")]
    IntakeLinkUnavailable,

    #[error("Formulário de locatário não aceita dados de bem")]
    IntakePropertyNotAllowed,

    #[error("Dossiê notarial não encontrado")]
    AssignmentNotFound,

    #[error("Pedido do notário não encontrado")]
    NotaireRequestNotFound,

    #[error("Notificação não encontrada")]
    NotificationNotFound,

    #[error("Documento deve ter exatamente um dono")]
    InvalidDocumentOwner,

    #[error("Partes do bail inválidas: {0}")]
    InvalidBailParties(&'static str),

    #[error("O bem não tem o mobiliário mínimo para um bail meublé")]
    FurnishedLeaseNotAllowed,

    #[error("Transição de status inválida: {from:?} -> {to:?}")]
    InvalidBailTransition { from: BailStatus, to: BailStatus },

    #[error("Cliente ainda ligado a bens ou baux")]
    ClientDeletionBlocked,

    #[error("Bem ainda ligado a baux")]
    PropertyDeletionBlocked,

    #[error("A pessoa principal não pode ser removida enquanto houver outras")]
    PrimaryPersonRequired,

    #[error("Operação incompatível com o tipo de cliente")]
    ClientTypeMismatch,

    #[error("O dono do bem precisa ser PROPRIETAIRE")]
    OwnerMustBeProprietaire,

    #[error("Somente leads podem ser convertidos")]
    InvalidLeadConversion,

    #[error("O bail ainda não está pronto para o notário")]
    BailNotReadyForNotary,

    #[error("O usuário não é notário")]
    NotANotaire,

    #[error("Violação de restrição única: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados (exemplo com sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Erro pronto para sair pela API, já traduzido.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidDocumentOwner
            | AppError::InvalidBailParties(_)
            | AppError::FurnishedLeaseNotAllowed
            | AppError::ClientTypeMismatch
            | AppError::OwnerMustBeProprietaire
            | AppError::InvalidLeadConversion
            | AppError::IntakePropertyNotAllowed => StatusCode::BAD_REQUEST,

            AppError::InvalidToken | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::NotANotaire => StatusCode::FORBIDDEN,

            AppError::UserNotFound
            | AppError::ClientNotFound
            | AppError::PersonNotFound
            | AppError::EntrepriseNotFound
            | AppError::PropertyNotFound
            | AppError::BailNotFound
            | AppError::DocumentNotFound
            | AppError::IntakeLinkNotFound
            | AppError::AssignmentNotFound
            | AppError::NotaireRequestNotFound
            | AppError::NotificationNotFound => StatusCode::NOT_FOUND,

            AppError::IntakeLinkUnavailable => StatusCode::GONE,

            AppError::InvalidBailTransition { .. }
            | AppError::ClientDeletionBlocked
            | AppError::PropertyDeletionBlocked
            | AppError::PrimaryPersonRequired
            | AppError::BailNotReadyForNotary
            | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,

            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Mensagem para o usuário final. Francês por padrão, inglês se pedido.
    pub fn user_message(&self, lang: &str) -> String {
        let en = lang == "en";
        let pick = |fr: &str, en_msg: &str| if en { en_msg.to_string() } else { fr.to_string() };

        match self {
            AppError::ValidationError(_) => pick("Un ou plusieurs champs sont invalides.", "One or more fields are invalid."),
            AppError::InvalidToken | AppError::JwtError(_) => pick("Jeton d'authentification invalide ou absent.", "Missing or invalid authentication token."),
            AppError::Forbidden => pick("Accès refusé.", "Access denied."),
            AppError::UserNotFound => pick("Utilisateur introuvable.", "User not found."),
            AppError::ClientNotFound => pick("Client introuvable.", "Client not found."),
            AppError::PersonNotFound => pick("Personne introuvable.", "Person not found."),
            AppError::EntrepriseNotFound => pick("Entreprise introuvable.", "Company not found."),
            AppError::PropertyNotFound => pick("Bien introuvable.", "Property not found."),
            AppError::BailNotFound => pick("Bail introuvable.", "Lease not found."),
            AppError::DocumentNotFound => pick("Document introuvable.", "Document not found."),
            AppError::IntakeLinkNotFound => pick("Lien de formulaire introuvable.", "Form link not found."),
            AppError::IntakeLinkUnavailable => pick("Ce lien a déjà été utilisé ou a été révoqué.", "This link was already used or has been revoked."),
            AppError::IntakePropertyNotAllowed => pick("Ce formulaire ne permet pas de renseigner un bien.", "This form does not accept property data."),
            AppError::AssignmentNotFound => pick("Aucun notaire n'est assigné à ce bail.", "No notary is assigned to this lease."),
            AppError::NotaireRequestNotFound => pick("Demande introuvable.", "Request not found."),
            AppError::NotificationNotFound => pick("Notification introuvable.", "Notification not found."),
            AppError::InvalidDocumentOwner => pick("Un document doit être rattaché à exactement un élément.", "A document must belong to exactly one record."),
            AppError::InvalidBailParties(reason) => {
                if en { format!("Invalid lease parties: {}.", reason) } else { format!("Parties du bail invalides : {}.", reason) }
            }
            AppError::FurnishedLeaseNotAllowed => pick("Le bien ne comporte pas le mobilier minimum d'un bail meublé.", "The property lacks the minimum furniture for a furnished lease."),
            AppError::InvalidBailTransition { from, to } => {
                if en {
                    format!("Cannot move a lease from {} to {}.", from.as_str(), to.as_str())
                } else {
                    format!("Impossible de passer le bail de {} à {}.", from.as_str(), to.as_str())
                }
            }
            AppError::ClientDeletionBlocked => pick("Ce client est encore lié à un bien ou à un bail.", "This client is still linked to a property or a lease."),
            AppError::PropertyDeletionBlocked => pick("Ce bien est encore lié à un bail.", "This property is still linked to a lease."),
            AppError::PrimaryPersonRequired => pick("La personne principale ne peut pas être supprimée.", "The primary person cannot be removed."),
            AppError::ClientTypeMismatch => pick("Opération incompatible avec le type de client.", "Operation not allowed for this client type."),
            AppError::OwnerMustBeProprietaire => pick("Le propriétaire doit avoir le profil PROPRIETAIRE.", "The owner must have the PROPRIETAIRE profile."),
            AppError::InvalidLeadConversion => pick("Seul un prospect peut être converti.", "Only a lead can be converted."),
            AppError::BailNotReadyForNotary => pick("Le bail n'est pas encore prêt pour le notaire.", "The lease is not ready for a notary yet."),
            AppError::NotANotaire => pick("Cet utilisateur n'est pas notaire.", "This user is not a notary."),
            AppError::UniqueConstraintViolation(detail) => {
                if en { format!("Already exists: {}", detail) } else { format!("Existe déjà : {}", detail) }
            }
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                pick("Une erreur inattendue est survenue.", "An unexpected error occurred.")
            }
        }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` loga a mensagem detalhada; o cliente recebe só a genérica.
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let codes = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), codes);
                }
                Some(json!(details))
            }
            _ => None,
        };

        ApiError {
            status,
            error: self.user_message(&locale.0),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_map_to_404() {
        assert_eq!(AppError::ClientNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::BailNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::IntakeLinkUnavailable.status_code(), StatusCode::GONE);
    }

    #[test]
    fn messages_follow_locale() {
        let err = AppError::PropertyNotFound;
        assert_eq!(err.to_api_error(&Locale("en".into())).error, "Property not found.");
        assert_eq!(err.to_api_error(&Locale("fr".into())).error, "Bien introuvable.");
        // Idioma desconhecido cai no francês
        assert_eq!(err.to_api_error(&Locale("de".into())).error, "Bien introuvable.");
    }

    #[test]
    fn transition_error_names_both_states() {
        let err = AppError::InvalidBailTransition {
            from: BailStatus::Draft,
            to: BailStatus::Signed,
        };
        let api = err.to_api_error(&Locale("en".into()));
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert!(api.error.contains("DRAFT"));
        assert!(api.error.contains("SIGNED"));
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let mut errors = validator::ValidationErrors::new();
        let mut e = validator::ValidationError::new("length");
        e.message = Some("required".into());
        errors.add("fullAddress", e);

        let api = AppError::ValidationError(errors).to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.details.unwrap()["fullAddress"][0], "required");
    }
}
