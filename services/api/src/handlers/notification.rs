use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::Notification;
use crate::error::ApiError;
use crate::handlers::auth::CurrentUser;
use crate::state::AppState;
use crate::usecase::notification::{
    CreateNotificationInput, CreateNotificationUseCase, ListNotificationsUseCase,
    MarkNotificationReadUseCase,
};

#[derive(Serialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub read: bool,
    #[serde(serialize_with = "manareh_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            title: n.title,
            message: n.message,
            kind: n.kind,
            read: n.read,
            created_at: n.created_at,
        }
    }
}

// ── POST /notifications ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateNotificationRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

pub async fn create_notification(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<NotificationResponse>), ApiError> {
    let usecase = CreateNotificationUseCase {
        notifications: state.notification_repo(),
    };
    let notification = usecase
        .execute(
            &user,
            CreateNotificationInput {
                user_id: body.user_id,
                title: body.title,
                message: body.message,
                kind: body.kind,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(NotificationResponse::from(notification)),
    ))
}

// ── GET /users/@me/notifications ─────────────────────────────────────────────

pub async fn list_notifications(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let usecase = ListNotificationsUseCase {
        notifications: state.notification_repo(),
    };
    let notifications = usecase.execute(user.id).await?;
    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}

// ── PATCH /users/@me/notifications/{id}/read ─────────────────────────────────

pub async fn mark_notification_read(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let usecase = MarkNotificationReadUseCase {
        notifications: state.notification_repo(),
    };
    usecase.execute(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
