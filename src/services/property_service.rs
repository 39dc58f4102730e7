// src/services/property_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{load_property_aggregate, ClientRepository, PropertyRepository},
    models::{
        client::{CompletionStatus, ProfilType},
        completion::CompletionReport,
        property::{CreatePropertyPayload, Property, PropertyAggregate, PropertyInput},
    },
    services::completion_service::{CompletionService, CompletionUpdate},
};

#[derive(Clone)]
pub struct PropertyService {
    repo: PropertyRepository,
    clients: ClientRepository,
    completion: CompletionService,
}

impl PropertyService {
    pub fn new(repo: PropertyRepository, clients: ClientRepository, completion: CompletionService) -> Self {
        Self { repo, clients, completion }
    }

    pub async fn create_property(&self, pool: &PgPool, payload: &CreatePropertyPayload) -> Result<Property, AppError> {
        let owner = self
            .clients
            .find_client(pool, payload.owner_id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        if owner.profil_type != ProfilType::Proprietaire {
            return Err(AppError::OwnerMustBeProprietaire);
        }

        let property = self
            .repo
            .insert(pool, payload.owner_id, &payload.full_address, &payload.details)
            .await?;

        tracing::info!(property_id = %property.id, owner_id = %owner.id, "bem criado");

        self.completion.update_property_completion_status(property.id).await?;
        self.repo.find(pool, property.id).await?.ok_or(AppError::PropertyNotFound)
    }

    pub async fn get_property(&self, pool: &PgPool, id: Uuid) -> Result<PropertyAggregate, AppError> {
        let mut tx = pool.begin().await?;
        let aggregate = load_property_aggregate(&mut tx, id).await?.ok_or(AppError::PropertyNotFound)?;
        tx.commit().await?;
        Ok(aggregate)
    }

    pub async fn list_properties(&self, pool: &PgPool, owner_id: Option<Uuid>) -> Result<Vec<Property>, AppError> {
        self.repo.list(pool, owner_id).await
    }

    pub async fn update_property(&self, pool: &PgPool, id: Uuid, input: &PropertyInput) -> Result<Property, AppError> {
        self.repo.update(pool, id, input).await?;
        self.completion.update_property_completion_status(id).await?;
        self.repo.find(pool, id).await?.ok_or(AppError::PropertyNotFound)
    }

    pub async fn delete_property(&self, pool: &PgPool, id: Uuid) -> Result<(), AppError> {
        if self.repo.count_bails(pool, id).await? > 0 {
            return Err(AppError::PropertyDeletionBlocked);
        }

        if !self.repo.delete(pool, id).await? {
            return Err(AppError::PropertyNotFound);
        }

        tracing::info!(property_id = %id, "bem removido");
        Ok(())
    }

    pub async fn completion(&self, id: Uuid) -> Result<CompletionReport, AppError> {
        self.completion.property_report(id).await
    }

    pub async fn override_completion(&self, id: Uuid, status: CompletionStatus) -> Result<CompletionUpdate, AppError> {
        self.completion.override_property_completion_status(id, status).await
    }
}
