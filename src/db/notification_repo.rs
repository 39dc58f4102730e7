// src/db/notification_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::notification::{NewNotification, Notification},
};

#[derive(Clone, Default)]
pub struct NotificationRepository;

impl NotificationRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert<'e, E>(&self, executor: E, notification: &NewNotification) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO notifications (kind, client_id, property_id, bail_id, message)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(notification.kind)
        .bind(notification.client_id)
        .bind(notification.property_id)
        .bind(notification.bail_id)
        .bind(&notification.message)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn list_unread<'e, E>(&self, executor: E, limit: i64) -> Result<Vec<Notification>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, kind, client_id, property_id, bail_id, message, created_at, read_at
            FROM notifications
            WHERE read_at IS NULL
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(executor)
        .await?;

        Ok(notifications)
    }

    pub async fn mark_read<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE notifications SET read_at = NOW() WHERE id = $1 AND read_at IS NULL")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
