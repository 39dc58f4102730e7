// src/db/notaire_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::notaire::{
        BailMessage, DossierNotaireAssignment, NotaireRequest, NotaireRequestStatus,
        NotaireRequestType, PartySide,
    },
};

const REQUEST_COLUMNS: &str = r#"
    id, dossier_id, request_type, target_party, title, content, status,
    created_by, created_at, updated_at
"#;

#[derive(Clone, Default)]
pub struct NotaireRepository;

impl NotaireRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  ATRIBUIÇÃO
    // =========================================================================

    /// Um bail tem no máximo um dossiê: reatribuir troca o notário.
    pub async fn upsert_assignment<'e, E>(
        &self,
        executor: E,
        bail_id: Uuid,
        notaire_id: Uuid,
        assigned_by: Uuid,
    ) -> Result<DossierNotaireAssignment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, DossierNotaireAssignment>(
            r#"
            INSERT INTO dossier_notaire_assignments (bail_id, notaire_id, assigned_by)
            VALUES ($1, $2, $3)
            ON CONFLICT (bail_id) DO UPDATE
                SET notaire_id = EXCLUDED.notaire_id,
                    assigned_by = EXCLUDED.assigned_by,
                    assigned_at = NOW()
            RETURNING id, bail_id, notaire_id, assigned_by, assigned_at
            "#,
        )
        .bind(bail_id)
        .bind(notaire_id)
        .bind(assigned_by)
        .fetch_one(executor)
        .await?;

        Ok(assignment)
    }

    pub async fn find_assignment_by_bail<'e, E>(
        &self,
        executor: E,
        bail_id: Uuid,
    ) -> Result<Option<DossierNotaireAssignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, DossierNotaireAssignment>(
            "SELECT id, bail_id, notaire_id, assigned_by, assigned_at FROM dossier_notaire_assignments WHERE bail_id = $1",
        )
        .bind(bail_id)
        .fetch_optional(executor)
        .await?;

        Ok(assignment)
    }

    // =========================================================================
    //  PEDIDOS DO NOTÁRIO
    // =========================================================================

    pub async fn insert_request<'e, E>(
        &self,
        executor: E,
        dossier_id: Uuid,
        request_type: NotaireRequestType,
        target_party: PartySide,
        title: &str,
        content: Option<&str>,
        created_by: Uuid,
    ) -> Result<NotaireRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO notaire_requests (dossier_id, request_type, target_party, title, content, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        );

        let request = sqlx::query_as::<_, NotaireRequest>(&sql)
            .bind(dossier_id)
            .bind(request_type)
            .bind(target_party)
            .bind(title)
            .bind(content)
            .bind(created_by)
            .fetch_one(executor)
            .await?;

        Ok(request)
    }

    pub async fn list_requests<'e, E>(&self, executor: E, dossier_id: Uuid) -> Result<Vec<NotaireRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM notaire_requests WHERE dossier_id = $1 ORDER BY created_at ASC",
            REQUEST_COLUMNS
        );
        let requests = sqlx::query_as::<_, NotaireRequest>(&sql)
            .bind(dossier_id)
            .fetch_all(executor)
            .await?;

        Ok(requests)
    }

    pub async fn update_request_status<'e, E>(
        &self,
        executor: E,
        dossier_id: Uuid,
        id: Uuid,
        status: NotaireRequestStatus,
    ) -> Result<NotaireRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE notaire_requests SET status = $2, updated_at = NOW() WHERE id = $1 AND dossier_id = $3 RETURNING {}",
            REQUEST_COLUMNS
        );

        sqlx::query_as::<_, NotaireRequest>(&sql)
            .bind(id)
            .bind(status)
            .bind(dossier_id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::NotaireRequestNotFound)
    }

    // =========================================================================
    //  MENSAGENS
    // =========================================================================

    pub async fn insert_message<'e, E>(
        &self,
        executor: E,
        bail_id: Uuid,
        dossier_id: Uuid,
        sender_id: Uuid,
        content: &str,
    ) -> Result<BailMessage, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let message = sqlx::query_as::<_, BailMessage>(
            r#"
            INSERT INTO bail_messages (bail_id, dossier_id, sender_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, bail_id, dossier_id, sender_id, content, created_at
            "#,
        )
        .bind(bail_id)
        .bind(dossier_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(executor)
        .await?;

        Ok(message)
    }

    pub async fn list_messages<'e, E>(&self, executor: E, bail_id: Uuid) -> Result<Vec<BailMessage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let messages = sqlx::query_as::<_, BailMessage>(
            r#"
            SELECT id, bail_id, dossier_id, sender_id, content, created_at
            FROM bail_messages
            WHERE bail_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(bail_id)
        .fetch_all(executor)
        .await?;

        Ok(messages)
    }
}
