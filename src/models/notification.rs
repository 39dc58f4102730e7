// src/models/notification.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    BailStatusChanged,
    CompletionStatusChanged,
    NotaireAssigned,
    IntakeSubmitted,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationType,
    pub client_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub bail_id: Option<Uuid>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub kind: NotificationType,
    pub client_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub bail_id: Option<Uuid>,
    pub message: String,
}

impl NewNotification {
    pub fn for_bail(kind: NotificationType, bail_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            kind,
            client_id: None,
            property_id: None,
            bail_id: Some(bail_id),
            message: message.into(),
        }
    }

    pub fn for_client(kind: NotificationType, client_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            kind,
            client_id: Some(client_id),
            property_id: None,
            bail_id: None,
            message: message.into(),
        }
    }

    pub fn for_property(kind: NotificationType, property_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            kind,
            client_id: None,
            property_id: Some(property_id),
            bail_id: None,
            message: message.into(),
        }
    }
}
