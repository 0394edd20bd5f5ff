use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::auth::CurrentUser;
use crate::handlers::event::EventResponse;
use crate::state::AppState;
use crate::usecase::favorite::{AddFavoriteUseCase, ListFavoritesUseCase, RemoveFavoriteUseCase};

// ── POST /favorites ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddFavoriteRequest {
    pub event_id: Uuid,
}

pub async fn add_favorite(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<AddFavoriteRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = AddFavoriteUseCase {
        events: state.event_repo(),
        favorites: state.favorite_repo(),
    };
    usecase.execute(user.id, body.event_id).await?;
    Ok(StatusCode::CREATED)
}

// ── DELETE /favorites/{event_id} ─────────────────────────────────────────────

pub async fn remove_favorite(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let usecase = RemoveFavoriteUseCase {
        favorites: state.favorite_repo(),
    };
    usecase.execute(user.id, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/@me/favorites ─────────────────────────────────────────────────

pub async fn list_favorites(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let usecase = ListFavoritesUseCase {
        favorites: state.favorite_repo(),
    };
    let events = usecase.execute(user.id).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}
