use uuid::Uuid;

use crate::domain::repository::{EventRepository, FavoriteRepository};
use crate::domain::types::Event;
use crate::error::ApiError;

pub struct AddFavoriteUseCase<E: EventRepository, F: FavoriteRepository> {
    pub events: E,
    pub favorites: F,
}

impl<E: EventRepository, F: FavoriteRepository> AddFavoriteUseCase<E, F> {
    pub async fn execute(&self, user_id: Uuid, event_id: Uuid) -> Result<(), ApiError> {
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(ApiError::EventNotFound);
        }
        self.favorites.create(user_id, event_id).await
    }
}

pub struct RemoveFavoriteUseCase<F: FavoriteRepository> {
    pub favorites: F,
}

impl<F: FavoriteRepository> RemoveFavoriteUseCase<F> {
    pub async fn execute(&self, user_id: Uuid, event_id: Uuid) -> Result<(), ApiError> {
        if self.favorites.delete(user_id, event_id).await? {
            Ok(())
        } else {
            Err(ApiError::FavoriteNotFound)
        }
    }
}

pub struct ListFavoritesUseCase<F: FavoriteRepository> {
    pub favorites: F,
}

impl<F: FavoriteRepository> ListFavoritesUseCase<F> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Event>, ApiError> {
        self.favorites.list_events(user_id).await
    }
}
