// src/services/notification_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, db::NotificationRepository, models::notification::Notification};

const MAX_UNREAD: i64 = 200;

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
}

impl NotificationService {
    pub fn new(repo: NotificationRepository) -> Self {
        Self { repo }
    }

    pub async fn list_unread(&self, pool: &PgPool, limit: Option<i64>) -> Result<Vec<Notification>, AppError> {
        let limit = limit.unwrap_or(50).clamp(1, MAX_UNREAD);
        self.repo.list_unread(pool, limit).await
    }

    pub async fn mark_read(&self, pool: &PgPool, id: Uuid) -> Result<(), AppError> {
        if !self.repo.mark_read(pool, id).await? {
            return Err(AppError::NotificationNotFound);
        }
        Ok(())
    }
}
