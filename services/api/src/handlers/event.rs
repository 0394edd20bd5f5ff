use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use manareh_domain::pagination::PageRequest;
use manareh_domain::recurrence::{Frequency, RepeatRule};

use crate::domain::types::{DEFAULT_CAPACITY, Event, EventSummary};
use crate::error::ApiError;
use crate::handlers::auth::CurrentUser;
use crate::state::AppState;
use crate::usecase::event::{
    CreateEventInput, CreateEventUseCase, GetEventUseCase, ListEventsUseCase,
};

#[derive(Serialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "time", serialize_with = "manareh_core::serde::to_rfc3339_ms")]
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub host: String,
    #[serde(rename = "creator")]
    pub creator_id: Uuid,
    #[serde(rename = "type")]
    pub category: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub capacity: i32,
    pub is_free: bool,
    pub price: f64,
    pub active: bool,
    #[serde(serialize_with = "manareh_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        let d = event.details;
        Self {
            id: event.id,
            title: d.title,
            starts_at: event.starts_at,
            location: d.location,
            latitude: d.latitude,
            longitude: d.longitude,
            host: d.host,
            creator_id: d.creator_id,
            category: d.category,
            city: d.city,
            province: d.province,
            country: d.country,
            capacity: d.capacity,
            is_free: d.is_free,
            price: d.price,
            active: event.active,
            created_at: event.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct EventSummaryResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub average_rating: Option<f64>,
    pub comment_count: u64,
    pub current_participants: u64,
    pub is_favorite: bool,
}

impl From<EventSummary> for EventSummaryResponse {
    fn from(summary: EventSummary) -> Self {
        Self {
            event: EventResponse::from(summary.event),
            average_rating: summary.average_rating,
            comment_count: summary.comment_count,
            current_participants: summary.current_participants,
            is_favorite: summary.is_favorite,
        }
    }
}

// ── POST /events ─────────────────────────────────────────────────────────────

fn default_capacity() -> i32 {
    DEFAULT_CAPACITY
}

fn default_is_free() -> bool {
    true
}

fn default_interval() -> u32 {
    1
}

/// Wire form of [`RepeatRule`]; `end_date` takes the same timestamp forms as `time`.
#[derive(Deserialize)]
pub struct RepeatRequest {
    #[serde(rename = "type", alias = "frequency")]
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default)]
    pub days: Option<Vec<u8>>,
    #[serde(default)]
    pub day_of_month: Option<u32>,
    #[serde(
        default,
        deserialize_with = "manareh_core::serde::from_rfc3339_lenient_opt"
    )]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub occurrences: Option<u32>,
}

impl From<RepeatRequest> for RepeatRule {
    fn from(req: RepeatRequest) -> Self {
        Self {
            frequency: req.frequency,
            interval: req.interval,
            days: req.days,
            day_of_month: req.day_of_month,
            end_date: req.end_date,
            occurrences: req.occurrences,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(
        rename = "time",
        alias = "starts_at",
        deserialize_with = "manareh_core::serde::from_rfc3339_lenient"
    )]
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default, rename = "type", alias = "category")]
    pub category: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default = "default_capacity")]
    pub capacity: i32,
    #[serde(default = "default_is_free")]
    pub is_free: bool,
    #[serde(default)]
    pub price: f64,
    #[serde(default, alias = "repeat")]
    pub repeat_pattern: Option<RepeatRequest>,
}

#[derive(Serialize)]
pub struct CreateEventResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub created_count: usize,
}

pub async fn create_event(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<CreateEventResponse>), ApiError> {
    let usecase = CreateEventUseCase {
        events: state.event_repo(),
    };
    let out = usecase
        .execute(
            &user,
            CreateEventInput {
                title: body.title,
                starts_at: body.starts_at,
                location: body.location,
                latitude: body.latitude,
                longitude: body.longitude,
                host: body.host,
                category: body.category,
                city: body.city,
                province: body.province,
                country: body.country,
                capacity: body.capacity,
                is_free: body.is_free,
                price: body.price,
                repeat: body.repeat_pattern.map(RepeatRule::from),
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateEventResponse {
            event: EventResponse::from(out.first),
            created_count: out.created_count,
        }),
    ))
}

// ── GET /events ──────────────────────────────────────────────────────────────

pub async fn list_events(
    viewer: Option<CurrentUser>,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<EventSummaryResponse>>, ApiError> {
    let usecase = ListEventsUseCase {
        events: state.event_repo(),
    };
    let summaries = usecase
        .execute(viewer.map(|CurrentUser(user)| user.id), page)
        .await?;
    Ok(Json(
        summaries
            .into_iter()
            .map(EventSummaryResponse::from)
            .collect(),
    ))
}

// ── GET /events/{id} ─────────────────────────────────────────────────────────

pub async fn get_event(
    viewer: Option<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventSummaryResponse>, ApiError> {
    let usecase = GetEventUseCase {
        events: state.event_repo(),
    };
    let summary = usecase
        .execute(id, viewer.map(|CurrentUser(user)| user.id))
        .await?;
    Ok(Json(EventSummaryResponse::from(summary)))
}
