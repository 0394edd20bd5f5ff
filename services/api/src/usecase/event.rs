use chrono::{DateTime, Utc};
use uuid::Uuid;

use manareh_domain::pagination::PageRequest;
use manareh_domain::recurrence::{EventDetails, EventTemplate, RepeatRule, expand};

use crate::domain::repository::EventRepository;
use crate::domain::types::{DEFAULT_CATEGORY, Event, EventSummary, User};
use crate::error::ApiError;

// ── CreateEvent ──────────────────────────────────────────────────────────────

pub struct CreateEventInput {
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub host: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub capacity: i32,
    pub is_free: bool,
    pub price: f64,
    pub repeat: Option<RepeatRule>,
}

#[derive(Debug)]
pub struct CreateEventOutput {
    /// The first occurrence, echoed back.
    pub first: Event,
    pub created_count: usize,
}

pub struct CreateEventUseCase<E: EventRepository> {
    pub events: E,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl<E: EventRepository> CreateEventUseCase<E> {
    pub async fn execute(
        &self,
        creator: &User,
        input: CreateEventInput,
    ) -> Result<CreateEventOutput, ApiError> {
        if input.title.trim().is_empty() || input.location.trim().is_empty() {
            return Err(ApiError::MissingData);
        }
        if input.capacity < 0 || input.price < 0.0 {
            return Err(ApiError::InvalidEventData);
        }

        let template = EventTemplate {
            details: EventDetails {
                title: input.title,
                location: input.location,
                latitude: input.latitude,
                longitude: input.longitude,
                host: non_blank(input.host).unwrap_or_else(|| creator.full_name()),
                creator_id: creator.id,
                category: non_blank(input.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
                city: non_blank(input.city).unwrap_or_else(|| creator.city.clone()),
                province: non_blank(input.province).unwrap_or_else(|| creator.province.clone()),
                country: non_blank(input.country).unwrap_or_else(|| creator.country.clone()),
                capacity: input.capacity,
                is_free: input.is_free,
                price: if input.is_free { 0.0 } else { input.price },
            },
            starts_at: input.starts_at,
        };

        let now = Utc::now();
        let events: Vec<Event> = expand(&template, input.repeat.as_ref())?
            .into_iter()
            .map(|occurrence| Event {
                id: Uuid::now_v7(),
                details: occurrence.details,
                starts_at: occurrence.starts_at,
                active: true,
                created_at: now,
            })
            .collect();

        self.events.insert_occurrences(&events).await?;

        let created_count = events.len();
        tracing::info!(creator_id = %creator.id, created_count, "events created");
        let first = events
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("expansion produced no occurrences"))?;
        Ok(CreateEventOutput {
            first,
            created_count,
        })
    }
}

// ── ListEvents / GetEvent ────────────────────────────────────────────────────

pub struct ListEventsUseCase<E: EventRepository> {
    pub events: E,
}

impl<E: EventRepository> ListEventsUseCase<E> {
    pub async fn execute(
        &self,
        viewer: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<EventSummary>, ApiError> {
        self.events.list_summaries(viewer, page.clamped()).await
    }
}

pub struct GetEventUseCase<E: EventRepository> {
    pub events: E,
}

impl<E: EventRepository> GetEventUseCase<E> {
    pub async fn execute(&self, id: Uuid, viewer: Option<Uuid>) -> Result<EventSummary, ApiError> {
        self.events
            .find_summary(id, viewer)
            .await?
            .ok_or(ApiError::EventNotFound)
    }
}

/// Look up an event that still accepts interaction (comments, participants).
pub async fn active_event<E: EventRepository>(events: &E, id: Uuid) -> Result<Event, ApiError> {
    events
        .find_by_id(id)
        .await?
        .filter(|event| event.active)
        .ok_or(ApiError::EventNotFound)
}
