// src/services/document_service.rs

use sqlx::{Executor, Postgres, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BailRepository, ClientRepository, DocumentRepository, PropertyRepository},
    models::document::{Document, DocumentOwner, RegisterDocumentPayload},
    services::completion_service::CompletionService,
};

/// Quem precisa ser recalculado quando um documento entra ou sai.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompletionTarget {
    Client(Uuid),
    Property(Uuid),
    // Documentos de bail não entram na completude
    Nothing,
}

#[derive(Clone)]
pub struct DocumentService {
    repo: DocumentRepository,
    clients: ClientRepository,
    properties: PropertyRepository,
    bails: BailRepository,
    completion: CompletionService,
}

impl DocumentService {
    pub fn new(
        repo: DocumentRepository,
        clients: ClientRepository,
        properties: PropertyRepository,
        bails: BailRepository,
        completion: CompletionService,
    ) -> Self {
        Self { repo, clients, properties, bails, completion }
    }

    /// Resolve o dono até o cliente ou o bem, validando que ele existe.
    async fn resolve_target<'e, E>(&self, executor: E, owner: DocumentOwner) -> Result<CompletionTarget, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let target = match owner {
            DocumentOwner::Client(id) => {
                self.clients.find_client(executor, id).await?.ok_or(AppError::ClientNotFound)?;
                CompletionTarget::Client(id)
            }
            DocumentOwner::Person(id) => {
                let person = self.clients.find_person(executor, id).await?.ok_or(AppError::PersonNotFound)?;
                CompletionTarget::Client(person.client_id)
            }
            DocumentOwner::Entreprise(id) => {
                let entreprise = self
                    .clients
                    .find_entreprise(executor, id)
                    .await?
                    .ok_or(AppError::EntrepriseNotFound)?;
                CompletionTarget::Client(entreprise.client_id)
            }
            DocumentOwner::Property(id) => {
                self.properties.find(executor, id).await?.ok_or(AppError::PropertyNotFound)?;
                CompletionTarget::Property(id)
            }
            DocumentOwner::Bail(id) => {
                self.bails.find(executor, id).await?.ok_or(AppError::BailNotFound)?;
                CompletionTarget::Nothing
            }
        };

        Ok(target)
    }

    async fn refresh(&self, target: CompletionTarget) -> Result<(), AppError> {
        match target {
            CompletionTarget::Client(id) => {
                self.completion.update_client_completion_status(id).await?;
            }
            CompletionTarget::Property(id) => {
                self.completion.update_property_completion_status(id).await?;
            }
            CompletionTarget::Nothing => {}
        }
        Ok(())
    }

    /// Registra os metadados de um arquivo já enviado ao storage.
    pub async fn register(
        &self,
        pool: &PgPool,
        payload: &RegisterDocumentPayload,
        uploaded_by: Option<Uuid>,
    ) -> Result<Document, AppError> {
        let owner = DocumentOwner::from_ids(
            payload.client_id,
            payload.person_id,
            payload.entreprise_id,
            payload.property_id,
            payload.bail_id,
        )?;

        let target = self.resolve_target(pool, owner).await?;

        let document = self
            .repo
            .insert(
                pool,
                payload.kind,
                &payload.file_key,
                &payload.mime_type,
                payload.label.as_deref(),
                owner,
                uploaded_by,
            )
            .await?;

        tracing::info!(document_id = %document.id, kind = document.kind.as_str(), "documento registrado");

        self.refresh(target).await?;
        Ok(document)
    }

    pub async fn delete(&self, pool: &PgPool, id: Uuid) -> Result<(), AppError> {
        let document = self.repo.find(pool, id).await?.ok_or(AppError::DocumentNotFound)?;
        let target = self.resolve_target(pool, document.owner()?).await?;

        self.repo.delete(pool, id).await?;
        tracing::info!(document_id = %id, "documento removido");

        self.refresh(target).await
    }

    pub async fn list_for_owner(&self, pool: &PgPool, owner: DocumentOwner) -> Result<Vec<Document>, AppError> {
        self.repo.list_for_owner(pool, owner).await
    }
}
