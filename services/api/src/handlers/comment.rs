use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::Comment;
use crate::error::ApiError;
use crate::handlers::auth::CurrentUser;
use crate::state::AppState;
use crate::usecase::comment::{CreateCommentInput, CreateCommentUseCase, ListCommentsUseCase};

#[derive(Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub comment: String,
    pub rating: u8,
    #[serde(serialize_with = "manareh_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            event_id: c.event_id,
            user_id: c.user_id,
            user_name: c.user_name,
            comment: c.body,
            rating: c.rating,
            created_at: c.created_at,
        }
    }
}

// ── POST /events/{id}/comments ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub comment: String,
    #[serde(default)]
    pub rating: Option<i64>,
}

pub async fn create_comment(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let rating = body
        .rating
        .map(u8::try_from)
        .transpose()
        .map_err(|_| ApiError::InvalidRating)?;
    let usecase = CreateCommentUseCase {
        events: state.event_repo(),
        comments: state.comment_repo(),
    };
    let comment = usecase
        .execute(
            &user,
            CreateCommentInput {
                event_id,
                body: body.comment,
                rating,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

// ── GET /events/{id}/comments ────────────────────────────────────────────────

pub async fn list_comments(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let usecase = ListCommentsUseCase {
        events: state.event_repo(),
        comments: state.comment_repo(),
    };
    let comments = usecase.execute(event_id).await?;
    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}
