// src/db/intake_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::intake::{IntakeLink, IntakeTarget},
};

const INTAKE_COLUMNS: &str = r#"
    id, token, client_id, target, property_id, bail_id, status,
    created_at, submitted_at, revoked_at
"#;

#[derive(Clone, Default)]
pub struct IntakeRepository;

impl IntakeRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        token: &str,
        client_id: Uuid,
        target: IntakeTarget,
        property_id: Option<Uuid>,
        bail_id: Option<Uuid>,
    ) -> Result<IntakeLink, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO intake_links (token, client_id, target, property_id, bail_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            INTAKE_COLUMNS
        );

        sqlx::query_as::<_, IntakeLink>(&sql)
            .bind(token)
            .bind(client_id)
            .bind(target)
            .bind(property_id)
            .bind(bail_id)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::UniqueConstraintViolation("intake token".to_string());
                    }
                }
                e.into()
            })
    }

    pub async fn find_by_token<'e, E>(&self, executor: E, token: &str) -> Result<Option<IntakeLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM intake_links WHERE token = $1", INTAKE_COLUMNS);
        let link = sqlx::query_as::<_, IntakeLink>(&sql)
            .bind(token)
            .fetch_optional(executor)
            .await?;

        Ok(link)
    }

    pub async fn find<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<IntakeLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM intake_links WHERE id = $1", INTAKE_COLUMNS);
        let link = sqlx::query_as::<_, IntakeLink>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(link)
    }

    pub async fn list_by_client<'e, E>(&self, executor: E, client_id: Uuid) -> Result<Vec<IntakeLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM intake_links WHERE client_id = $1 ORDER BY created_at DESC",
            INTAKE_COLUMNS
        );
        let links = sqlx::query_as::<_, IntakeLink>(&sql)
            .bind(client_id)
            .fetch_all(executor)
            .await?;

        Ok(links)
    }

    /// Só marca se ainda estiver PENDING: o link é de uso único.
    pub async fn mark_submitted<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE intake_links SET status = 'SUBMITTED', submitted_at = NOW() WHERE id = $1 AND status = 'PENDING'",
        )
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn revoke<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<IntakeLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE intake_links SET status = 'REVOKED', revoked_at = NOW()
            WHERE id = $1 AND status = 'PENDING'
            RETURNING {}
            "#,
            INTAKE_COLUMNS
        );
        let link = sqlx::query_as::<_, IntakeLink>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(link)
    }
}
