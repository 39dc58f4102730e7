// src/services/notaire_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BailRepository, NotaireRepository, NotificationRepository, UserRepository},
    models::{
        auth::{User, UserRole},
        notaire::{
            BailMessage, CreateNotaireRequestPayload, DossierNotaireAssignment, NotaireRequest,
            NotaireRequestStatus,
        },
        notification::{NewNotification, NotificationType},
    },
};

/// Admin e agente veem todos os dossiês; o notário só o que lhe foi atribuído.
pub fn can_participate(user: &User, assignment: &DossierNotaireAssignment) -> bool {
    match user.role {
        UserRole::Admin | UserRole::Agent => true,
        UserRole::Notaire => user.id == assignment.notaire_id,
    }
}

#[derive(Clone)]
pub struct NotaireService {
    repo: NotaireRepository,
    bails: BailRepository,
    users: UserRepository,
    notifications: NotificationRepository,
}

impl NotaireService {
    pub fn new(
        repo: NotaireRepository,
        bails: BailRepository,
        users: UserRepository,
        notifications: NotificationRepository,
    ) -> Self {
        Self { repo, bails, users, notifications }
    }

    pub async fn assign(
        &self,
        pool: &PgPool,
        bail_id: Uuid,
        notaire_id: Uuid,
        assigned_by: Uuid,
    ) -> Result<DossierNotaireAssignment, AppError> {
        let bail = self.bails.find(pool, bail_id).await?.ok_or(AppError::BailNotFound)?;
        if !bail.status.is_notary_stage() {
            return Err(AppError::BailNotReadyForNotary);
        }

        let notaire = self
            .users
            .find_by_id_with(pool, notaire_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        if notaire.role != UserRole::Notaire {
            return Err(AppError::NotANotaire);
        }

        let mut tx = pool.begin().await?;

        let assignment = self.repo.upsert_assignment(&mut *tx, bail_id, notaire_id, assigned_by).await?;

        let who = notaire.name.as_deref().unwrap_or(&notaire.email);
        self.notifications
            .insert(
                &mut *tx,
                &NewNotification::for_bail(
                    NotificationType::NotaireAssigned,
                    bail_id,
                    format!("Notaire assigné : {}", who),
                ),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(bail_id = %bail_id, notaire_id = %notaire_id, "notário atribuído");
        Ok(assignment)
    }

    /// Dossiê do bail, se o usuário puder participar dele.
    pub async fn dossier(&self, pool: &PgPool, bail_id: Uuid, user: &User) -> Result<DossierNotaireAssignment, AppError> {
        let assignment = self
            .repo
            .find_assignment_by_bail(pool, bail_id)
            .await?
            .ok_or(AppError::AssignmentNotFound)?;

        if !can_participate(user, &assignment) {
            tracing::warn!(user_id = %user.id, bail_id = %bail_id, "acesso ao dossiê negado");
            return Err(AppError::Forbidden);
        }

        Ok(assignment)
    }

    // --- Pedidos ---

    pub async fn create_request(
        &self,
        pool: &PgPool,
        bail_id: Uuid,
        user: &User,
        payload: &CreateNotaireRequestPayload,
    ) -> Result<NotaireRequest, AppError> {
        let dossier = self.dossier(pool, bail_id, user).await?;

        let request = self
            .repo
            .insert_request(
                pool,
                dossier.id,
                payload.request_type,
                payload.target_party,
                &payload.title,
                payload.content.as_deref(),
                user.id,
            )
            .await?;

        tracing::info!(request_id = %request.id, dossier_id = %dossier.id, "pedido do notário criado");
        Ok(request)
    }

    pub async fn list_requests(&self, pool: &PgPool, bail_id: Uuid, user: &User) -> Result<Vec<NotaireRequest>, AppError> {
        let dossier = self.dossier(pool, bail_id, user).await?;
        self.repo.list_requests(pool, dossier.id).await
    }

    pub async fn update_request_status(
        &self,
        pool: &PgPool,
        bail_id: Uuid,
        request_id: Uuid,
        user: &User,
        status: NotaireRequestStatus,
    ) -> Result<NotaireRequest, AppError> {
        let dossier = self.dossier(pool, bail_id, user).await?;
        self.repo.update_request_status(pool, dossier.id, request_id, status).await
    }

    // --- Mensagens ---

    pub async fn post_message(&self, pool: &PgPool, bail_id: Uuid, user: &User, content: &str) -> Result<BailMessage, AppError> {
        let dossier = self.dossier(pool, bail_id, user).await?;
        self.repo.insert_message(pool, bail_id, dossier.id, user.id, content).await
    }

    pub async fn list_messages(&self, pool: &PgPool, bail_id: Uuid, user: &User) -> Result<Vec<BailMessage>, AppError> {
        self.dossier(pool, bail_id, user).await?;
        self.repo.list_messages(pool, bail_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "someone@example.fr".into(),
            name: None,
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn assignment(notaire_id: Uuid) -> DossierNotaireAssignment {
        DossierNotaireAssignment {
            id: Uuid::new_v4(),
            bail_id: Uuid::new_v4(),
            notaire_id,
            assigned_by: None,
            assigned_at: Utc::now(),
        }
    }

    #[test]
    fn only_the_assigned_notary_participates() {
        let notaire = user(UserRole::Notaire);
        let other = user(UserRole::Notaire);
        let dossier = assignment(notaire.id);

        assert!(can_participate(&notaire, &dossier));
        assert!(!can_participate(&other, &dossier));
    }

    #[test]
    fn staff_participates_in_every_dossier() {
        let dossier = assignment(Uuid::new_v4());
        assert!(can_participate(&user(UserRole::Admin), &dossier));
        assert!(can_participate(&user(UserRole::Agent), &dossier));
    }
}
