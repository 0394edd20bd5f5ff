use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{EventRepository, ParticipantRepository};
use crate::domain::types::{Participant, User};
use crate::error::ApiError;
use crate::usecase::event::active_event;

pub struct JoinEventUseCase<E: EventRepository, P: ParticipantRepository> {
    pub events: E,
    pub participants: P,
}

impl<E: EventRepository, P: ParticipantRepository> JoinEventUseCase<E, P> {
    pub async fn execute(&self, user: &User, event_id: Uuid) -> Result<Participant, ApiError> {
        let event = active_event(&self.events, event_id).await?;

        // capacity 0 means unlimited
        let capacity = u64::try_from(event.details.capacity).unwrap_or(0);
        let participant = Participant {
            id: Uuid::now_v7(),
            event_id,
            user_id: user.id,
            user_name: user.full_name(),
            attended: false,
            registered_at: Utc::now(),
        };
        self.participants.create(&participant, capacity).await?;
        Ok(participant)
    }
}

pub struct ListParticipantsUseCase<E: EventRepository, P: ParticipantRepository> {
    pub events: E,
    pub participants: P,
}

impl<E: EventRepository, P: ParticipantRepository> ListParticipantsUseCase<E, P> {
    pub async fn execute(&self, event_id: Uuid) -> Result<Vec<Participant>, ApiError> {
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(ApiError::EventNotFound);
        }
        self.participants.list_by_event(event_id).await
    }
}
