use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::NotificationRepository;
use crate::domain::types::{DEFAULT_NOTIFICATION_KIND, Notification, User};
use crate::error::ApiError;

pub struct CreateNotificationInput {
    /// Recipient; defaults to the caller, and may not name anyone else.
    pub user_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub kind: Option<String>,
}

pub struct CreateNotificationUseCase<N: NotificationRepository> {
    pub notifications: N,
}

impl<N: NotificationRepository> CreateNotificationUseCase<N> {
    pub async fn execute(
        &self,
        caller: &User,
        input: CreateNotificationInput,
    ) -> Result<Notification, ApiError> {
        let user_id = input.user_id.unwrap_or(caller.id);
        if user_id != caller.id {
            return Err(ApiError::Forbidden);
        }
        if input.title.trim().is_empty() || input.message.trim().is_empty() {
            return Err(ApiError::MissingData);
        }
        let notification = Notification {
            id: Uuid::now_v7(),
            user_id,
            title: input.title,
            message: input.message,
            kind: input
                .kind
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_NOTIFICATION_KIND.to_owned()),
            read: false,
            created_at: Utc::now(),
        };
        self.notifications.create(&notification).await?;
        Ok(notification)
    }
}

pub struct ListNotificationsUseCase<N: NotificationRepository> {
    pub notifications: N,
}

impl<N: NotificationRepository> ListNotificationsUseCase<N> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Notification>, ApiError> {
        self.notifications.list_for_user(user_id).await
    }
}

pub struct MarkNotificationReadUseCase<N: NotificationRepository> {
    pub notifications: N,
}

impl<N: NotificationRepository> MarkNotificationReadUseCase<N> {
    pub async fn execute(&self, id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        if self.notifications.mark_read(id, user_id).await? {
            Ok(())
        } else {
            Err(ApiError::NotificationNotFound)
        }
    }
}
