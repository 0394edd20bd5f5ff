use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::types::Participant;
use crate::error::ApiError;
use crate::handlers::auth::CurrentUser;
use crate::state::AppState;
use crate::usecase::participant::{JoinEventUseCase, ListParticipantsUseCase};

#[derive(Serialize)]
pub struct ParticipantResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub attended: bool,
    #[serde(serialize_with = "manareh_core::serde::to_rfc3339_ms")]
    pub registered_at: DateTime<Utc>,
}

impl From<Participant> for ParticipantResponse {
    fn from(p: Participant) -> Self {
        Self {
            id: p.id,
            event_id: p.event_id,
            user_id: p.user_id,
            user_name: p.user_name,
            attended: p.attended,
            registered_at: p.registered_at,
        }
    }
}

// ── POST /events/{id}/participants ───────────────────────────────────────────

pub async fn join_event(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ParticipantResponse>), ApiError> {
    let usecase = JoinEventUseCase {
        events: state.event_repo(),
        participants: state.participant_repo(),
    };
    let participant = usecase.execute(&user, event_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ParticipantResponse::from(participant)),
    ))
}

// ── GET /events/{id}/participants ────────────────────────────────────────────

pub async fn list_participants(
    CurrentUser(_): CurrentUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<ParticipantResponse>>, ApiError> {
    let usecase = ListParticipantsUseCase {
        events: state.event_repo(),
        participants: state.participant_repo(),
    };
    let participants = usecase.execute(event_id).await?;
    Ok(Json(
        participants
            .into_iter()
            .map(ParticipantResponse::from)
            .collect(),
    ))
}
