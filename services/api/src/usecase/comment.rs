use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{CommentRepository, EventRepository};
use crate::domain::types::{Comment, DEFAULT_RATING, MAX_COMMENT_LEN, User};
use crate::error::ApiError;
use crate::usecase::event::active_event;

pub struct CreateCommentInput {
    pub event_id: Uuid,
    pub body: String,
    pub rating: Option<u8>,
}

pub struct CreateCommentUseCase<E: EventRepository, C: CommentRepository> {
    pub events: E,
    pub comments: C,
}

impl<E: EventRepository, C: CommentRepository> CreateCommentUseCase<E, C> {
    pub async fn execute(&self, author: &User, input: CreateCommentInput) -> Result<Comment, ApiError> {
        let rating = input.rating.unwrap_or(DEFAULT_RATING);
        if !(1..=5).contains(&rating) {
            return Err(ApiError::InvalidRating);
        }
        let body = input.body.trim();
        if body.is_empty() || body.chars().count() > MAX_COMMENT_LEN {
            return Err(ApiError::InvalidComment);
        }
        active_event(&self.events, input.event_id).await?;

        let comment = Comment {
            id: Uuid::now_v7(),
            event_id: input.event_id,
            user_id: author.id,
            user_name: author.full_name(),
            body: body.to_owned(),
            rating,
            created_at: Utc::now(),
        };
        self.comments.create(&comment).await?;
        Ok(comment)
    }
}

pub struct ListCommentsUseCase<E: EventRepository, C: CommentRepository> {
    pub events: E,
    pub comments: C,
}

impl<E: EventRepository, C: CommentRepository> ListCommentsUseCase<E, C> {
    pub async fn execute(&self, event_id: Uuid) -> Result<Vec<Comment>, ApiError> {
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(ApiError::EventNotFound);
        }
        self.comments.list_by_event(event_id).await
    }
}
