// src/services/intake_service.rs

use sqlx::PgPool;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    db::{load_client_aggregate, BailRepository, ClientRepository, IntakeRepository, NotificationRepository, PropertyRepository},
    models::{
        client::{ClientType, ProfilType},
        intake::{CreateIntakeLinkPayload, IntakeForm, IntakeLink, IntakeStatus, IntakeSubmission, IntakeTarget},
        notification::{NewNotification, NotificationType},
    },
    services::completion_service::CompletionService,
};

pub fn ensure_usable(link: &IntakeLink) -> Result<(), AppError> {
    match link.status {
        IntakeStatus::Pending => Ok(()),
        IntakeStatus::Submitted | IntakeStatus::Revoked => Err(AppError::IntakeLinkUnavailable),
    }
}

pub fn profil_for(target: IntakeTarget) -> ProfilType {
    match target {
        IntakeTarget::Owner => ProfilType::Proprietaire,
        IntakeTarget::Tenant => ProfilType::Locataire,
    }
}

/// Um LEAD pode receber qualquer formulário; os demais só o do próprio perfil.
pub fn accepts_target(profil_type: ProfilType, target: IntakeTarget) -> bool {
    profil_type == ProfilType::Lead || profil_type == profil_for(target)
}

fn missing_address() -> AppError {
    let mut errors = ValidationErrors::new();
    let mut error = ValidationError::new("required");
    error.message = Some("required".into());
    errors.add("fullAddress", error);
    AppError::ValidationError(errors)
}

#[derive(Clone)]
pub struct IntakeService {
    repo: IntakeRepository,
    clients: ClientRepository,
    properties: PropertyRepository,
    bails: BailRepository,
    notifications: NotificationRepository,
    completion: CompletionService,
}

impl IntakeService {
    pub fn new(
        repo: IntakeRepository,
        clients: ClientRepository,
        properties: PropertyRepository,
        bails: BailRepository,
        notifications: NotificationRepository,
        completion: CompletionService,
    ) -> Self {
        Self { repo, clients, properties, bails, notifications, completion }
    }

    pub async fn create_link(&self, pool: &PgPool, payload: &CreateIntakeLinkPayload) -> Result<IntakeLink, AppError> {
        let client = self
            .clients
            .find_client(pool, payload.client_id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        if !accepts_target(client.profil_type, payload.target) {
            return Err(AppError::ClientTypeMismatch);
        }

        if let Some(property_id) = payload.property_id {
            let property = self.properties.find(pool, property_id).await?.ok_or(AppError::PropertyNotFound)?;
            if payload.target == IntakeTarget::Owner && property.owner_id != client.id {
                return Err(AppError::PropertyNotFound);
            }
        }

        if let Some(bail_id) = payload.bail_id {
            self.bails.find(pool, bail_id).await?.ok_or(AppError::BailNotFound)?;
        }

        let token = Uuid::new_v4().simple().to_string();
        let link = self
            .repo
            .insert(pool, &token, client.id, payload.target, payload.property_id, payload.bail_id)
            .await?;

        tracing::info!(link_id = %link.id, client_id = %client.id, target = ?link.target, "link de intake criado");
        Ok(link)
    }

    /// Abre o formulário público. Links usados ou revogados respondem 410.
    pub async fn open_form(&self, pool: &PgPool, token: &str) -> Result<IntakeForm, AppError> {
        let link = self.repo.find_by_token(pool, token).await?.ok_or(AppError::IntakeLinkNotFound)?;
        ensure_usable(&link)?;

        let mut tx = pool.begin().await?;
        let client = load_client_aggregate(&mut tx, link.client_id)
            .await?
            .ok_or(AppError::ClientNotFound)?;
        let property = match link.property_id {
            Some(id) => self.properties.find(&mut *tx, id).await?,
            None => None,
        };
        tx.commit().await?;

        Ok(IntakeForm { link, client, property })
    }

    pub async fn submit(&self, pool: &PgPool, token: &str, submission: &IntakeSubmission) -> Result<IntakeLink, AppError> {
        let mut tx = pool.begin().await?;

        let link = self
            .repo
            .find_by_token(&mut *tx, token)
            .await?
            .ok_or(AppError::IntakeLinkNotFound)?;
        ensure_usable(&link)?;

        // Marca primeiro: uma segunda submissão concorrente não passa daqui
        if !self.repo.mark_submitted(&mut *tx, link.id).await? {
            return Err(AppError::IntakeLinkUnavailable);
        }

        if link.target == IntakeTarget::Tenant && submission.property.is_some() {
            return Err(AppError::IntakePropertyNotAllowed);
        }

        let mut client = self
            .clients
            .find_client(&mut *tx, link.client_id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        if client.profil_type == ProfilType::Lead {
            client.convert_to(profil_for(link.target));
            self.clients.update_profil_type(&mut *tx, &client).await?;
        }

        match client.client_type {
            ClientType::PersonnePhysique => {
                if submission.entreprise.is_some() {
                    return Err(AppError::ClientTypeMismatch);
                }
                if let Some(input) = &submission.person {
                    let persons = self.clients.list_persons(&mut *tx, client.id).await?;
                    let primary = persons.iter().find(|p| p.is_primary).or_else(|| persons.first());
                    match primary {
                        Some(person) => {
                            self.clients.update_person(&mut *tx, person.id, input).await?;
                        }
                        None => {
                            self.clients.insert_person(&mut *tx, client.id, true, input).await?;
                        }
                    }
                }
            }
            ClientType::PersonneMorale => {
                if submission.person.is_some() {
                    return Err(AppError::ClientTypeMismatch);
                }
                if let Some(input) = &submission.entreprise {
                    match self.clients.find_entreprise_by_client(&mut *tx, client.id).await? {
                        Some(entreprise) => {
                            self.clients.update_entreprise(&mut *tx, entreprise.id, input).await?;
                        }
                        None => {
                            self.clients.insert_entreprise(&mut *tx, client.id, input).await?;
                        }
                    }
                }
            }
        }

        let mut property_id = link.property_id;
        if let Some(input) = &submission.property {
            match link.property_id {
                Some(id) => {
                    self.properties.update(&mut *tx, id, input).await?;
                }
                None => {
                    let address = input
                        .full_address
                        .clone()
                        .filter(|a| !a.trim().is_empty())
                        .ok_or_else(missing_address)?;
                    let property = self.properties.insert(&mut *tx, client.id, &address, input).await?;
                    property_id = Some(property.id);
                }
            }
        }

        self.notifications
            .insert(
                &mut *tx,
                &NewNotification::for_client(
                    NotificationType::IntakeSubmitted,
                    client.id,
                    "Formulaire client reçu",
                ),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(link_id = %link.id, client_id = %client.id, "formulário de intake recebido");

        self.completion.update_client_completion_status(client.id).await?;
        if let Some(id) = property_id {
            self.completion.update_property_completion_status(id).await?;
        }

        self.repo.find(pool, link.id).await?.ok_or(AppError::IntakeLinkNotFound)
    }

    pub async fn revoke(&self, pool: &PgPool, id: Uuid) -> Result<IntakeLink, AppError> {
        if let Some(link) = self.repo.revoke(pool, id).await? {
            tracing::info!(link_id = %id, "link de intake revogado");
            return Ok(link);
        }

        // Não revogou: ou não existe, ou já não está pendente
        match self.repo.find(pool, id).await? {
            Some(_) => Err(AppError::IntakeLinkUnavailable),
            None => Err(AppError::IntakeLinkNotFound),
        }
    }

    pub async fn list_by_client(&self, pool: &PgPool, client_id: Uuid) -> Result<Vec<IntakeLink>, AppError> {
        self.repo.list_by_client(pool, client_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn link(status: IntakeStatus) -> IntakeLink {
        IntakeLink {
            id: Uuid::new_v4(),
            token: Uuid::new_v4().simple().to_string(),
            client_id: Uuid::new_v4(),
            target: IntakeTarget::Tenant,
            property_id: None,
            bail_id: None,
            status,
            created_at: Utc::now(),
            submitted_at: None,
            revoked_at: None,
        }
    }

    #[test]
    fn only_pending_links_are_usable() {
        assert!(ensure_usable(&link(IntakeStatus::Pending)).is_ok());
        assert!(matches!(ensure_usable(&link(IntakeStatus::Submitted)), Err(AppError::IntakeLinkUnavailable)));
        assert!(matches!(ensure_usable(&link(IntakeStatus::Revoked)), Err(AppError::IntakeLinkUnavailable)));
    }

    #[test]
    fn leads_accept_any_form() {
        assert!(accepts_target(ProfilType::Lead, IntakeTarget::Owner));
        assert!(accepts_target(ProfilType::Lead, IntakeTarget::Tenant));
        assert!(accepts_target(ProfilType::Proprietaire, IntakeTarget::Owner));
        assert!(!accepts_target(ProfilType::Locataire, IntakeTarget::Owner));
        assert!(!accepts_target(ProfilType::Proprietaire, IntakeTarget::Tenant));
    }

    #[test]
    fn tokens_are_32_hex_chars() {
        let token = Uuid::new_v4().simple().to_string();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
