// src/services/client_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{load_client_aggregate, ClientRepository},
    models::{
        client::{
            Client, ClientAggregate, ClientType, CompletionStatus, CreateClientPayload, Entreprise,
            EntrepriseInput, Person, PersonInput, ProfilType,
        },
        completion::DetailedClientCompletion,
    },
    services::completion_service::{CompletionService, CompletionUpdate},
};

/// Só um LEAD pode ser convertido, e nunca para LEAD.
pub fn validate_lead_conversion(current: ProfilType, target: ProfilType) -> Result<(), AppError> {
    if current != ProfilType::Lead || target == ProfilType::Lead {
        return Err(AppError::InvalidLeadConversion);
    }
    Ok(())
}

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
    completion: CompletionService,
}

impl ClientService {
    pub fn new(repo: ClientRepository, completion: CompletionService) -> Self {
        Self { repo, completion }
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn create_client(&self, pool: &PgPool, payload: &CreateClientPayload) -> Result<ClientAggregate, AppError> {
        let mut tx = pool.begin().await?;

        let client = self.repo.create_client(&mut *tx, payload.client_type, payload.profil_type).await?;

        match payload.client_type {
            ClientType::PersonnePhysique => {
                if payload.entreprise.is_some() {
                    return Err(AppError::ClientTypeMismatch);
                }
                let person = payload.person.clone().unwrap_or_default();
                self.repo.insert_person(&mut *tx, client.id, true, &person).await?;
            }
            ClientType::PersonneMorale => {
                if payload.person.is_some() {
                    return Err(AppError::ClientTypeMismatch);
                }
                let entreprise = payload.entreprise.clone().unwrap_or_default();
                self.repo.insert_entreprise(&mut *tx, client.id, &entreprise).await?;
            }
        }

        tx.commit().await?;

        tracing::info!(client_id = %client.id, client_type = ?client.client_type, "cliente criado");

        self.completion.update_client_completion_status(client.id).await?;
        self.get_client(pool, client.id).await
    }

    pub async fn get_client(&self, pool: &PgPool, id: Uuid) -> Result<ClientAggregate, AppError> {
        let mut tx = pool.begin().await?;
        let aggregate = load_client_aggregate(&mut tx, id).await?.ok_or(AppError::ClientNotFound)?;
        tx.commit().await?;
        Ok(aggregate)
    }

    pub async fn list_clients(&self, pool: &PgPool, profil_type: Option<ProfilType>) -> Result<Vec<Client>, AppError> {
        self.repo.list_clients(pool, profil_type).await
    }

    pub async fn convert_lead(&self, pool: &PgPool, id: Uuid, target: ProfilType) -> Result<Client, AppError> {
        let mut tx = pool.begin().await?;

        let mut client = self.repo.find_client(&mut *tx, id).await?.ok_or(AppError::ClientNotFound)?;
        validate_lead_conversion(client.profil_type, target)?;

        client.convert_to(target);
        self.repo.update_profil_type(&mut *tx, &client).await?;
        tx.commit().await?;

        tracing::info!(client_id = %id, profil = ?target, "lead convertido");

        self.completion.update_client_completion_status(id).await?;
        self.repo.find_client(pool, id).await?.ok_or(AppError::ClientNotFound)
    }

    pub async fn delete_client(&self, pool: &PgPool, id: Uuid) -> Result<(), AppError> {
        if self.repo.count_blocking_links(pool, id).await? > 0 {
            return Err(AppError::ClientDeletionBlocked);
        }

        if !self.repo.delete_client(pool, id).await? {
            return Err(AppError::ClientNotFound);
        }

        tracing::info!(client_id = %id, "cliente removido");
        Ok(())
    }

    // =========================================================================
    //  PESSOAS
    // =========================================================================

    pub async fn add_person(
        &self,
        pool: &PgPool,
        client_id: Uuid,
        input: &PersonInput,
        make_primary: bool,
    ) -> Result<Person, AppError> {
        let mut tx = pool.begin().await?;

        let client = self.repo.find_client(&mut *tx, client_id).await?.ok_or(AppError::ClientNotFound)?;
        if client.client_type != ClientType::PersonnePhysique {
            return Err(AppError::ClientTypeMismatch);
        }

        let existing = self.repo.list_persons(&mut *tx, client_id).await?;
        let is_primary = existing.is_empty() || make_primary;
        if is_primary && !existing.is_empty() {
            self.repo.clear_primary(&mut *tx, client_id).await?;
        }

        let person = self.repo.insert_person(&mut *tx, client_id, is_primary, input).await?;
        tx.commit().await?;

        self.completion.update_client_completion_status(client_id).await?;
        Ok(person)
    }

    pub async fn update_person(&self, pool: &PgPool, person_id: Uuid, input: &PersonInput) -> Result<Person, AppError> {
        let person = self.repo.update_person(pool, person_id, input).await?;
        self.completion.update_client_completion_status(person.client_id).await?;
        Ok(person)
    }

    pub async fn set_primary_person(&self, pool: &PgPool, client_id: Uuid, person_id: Uuid) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;

        let person = self.repo.find_person(&mut *tx, person_id).await?.ok_or(AppError::PersonNotFound)?;
        if person.client_id != client_id {
            return Err(AppError::PersonNotFound);
        }

        // Desmarca antes de marcar: o índice parcial só admite uma principal
        self.repo.clear_primary(&mut *tx, client_id).await?;
        self.repo.mark_primary(&mut *tx, person_id).await?;
        tx.commit().await?;

        self.completion.update_client_completion_status(client_id).await?;
        Ok(())
    }

    pub async fn remove_person(&self, pool: &PgPool, person_id: Uuid) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;

        let person = self.repo.find_person(&mut *tx, person_id).await?.ok_or(AppError::PersonNotFound)?;
        if person.is_primary {
            let others = self.repo.list_persons(&mut *tx, person.client_id).await?.len() - 1;
            if others > 0 {
                return Err(AppError::PrimaryPersonRequired);
            }
        }

        self.repo.delete_person(&mut *tx, person_id).await?;
        tx.commit().await?;

        self.completion.update_client_completion_status(person.client_id).await?;
        Ok(())
    }

    // =========================================================================
    //  EMPRESA
    // =========================================================================

    pub async fn update_entreprise(
        &self,
        pool: &PgPool,
        entreprise_id: Uuid,
        input: &EntrepriseInput,
    ) -> Result<Entreprise, AppError> {
        let entreprise = self.repo.update_entreprise(pool, entreprise_id, input).await?;
        self.completion.update_client_completion_status(entreprise.client_id).await?;
        Ok(entreprise)
    }

    // =========================================================================
    //  COMPLETUDE
    // =========================================================================

    pub async fn completion(&self, id: Uuid) -> Result<DetailedClientCompletion, AppError> {
        self.completion.client_completion(id).await
    }

    pub async fn override_completion(&self, id: Uuid, status: CompletionStatus) -> Result<CompletionUpdate, AppError> {
        self.completion.override_client_completion_status(id, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_leads_convert_and_never_back_to_lead() {
        assert!(validate_lead_conversion(ProfilType::Lead, ProfilType::Proprietaire).is_ok());
        assert!(validate_lead_conversion(ProfilType::Lead, ProfilType::Locataire).is_ok());

        assert!(matches!(
            validate_lead_conversion(ProfilType::Lead, ProfilType::Lead),
            Err(AppError::InvalidLeadConversion)
        ));
        assert!(matches!(
            validate_lead_conversion(ProfilType::Locataire, ProfilType::Proprietaire),
            Err(AppError::InvalidLeadConversion)
        ));
    }
}
