#![allow(async_fn_in_trait)]

use manareh_domain::pagination::PageRequest;
use uuid::Uuid;

use crate::domain::types::{
    Comment, Event, EventSummary, Notification, Participant, PendingRegistration, User,
};
use crate::error::ApiError;

/// Repository for permanent user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_national_id(&self, national_id: &str) -> Result<Option<User>, ApiError>;

    /// Insert a new user. A unique-index violation surfaces as
    /// [`ApiError::ConflictIdentity`].
    async fn insert(&self, user: &User) -> Result<(), ApiError>;

    /// Set `is_verified`.
    async fn mark_verified(&self, id: Uuid) -> Result<(), ApiError>;

    /// Store the supplemental national id. Unique-index violation →
    /// [`ApiError::DuplicateIdentity`].
    async fn update_national_id(&self, id: Uuid, national_id: &str) -> Result<(), ApiError>;
}

/// Repository for staged registrations, keyed by email.
pub trait PendingRegistrationRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<PendingRegistration>, ApiError>;

    /// Delete any pending row for the same email and insert `pending`, atomically.
    async fn replace(&self, pending: &PendingRegistration) -> Result<(), ApiError>;

    async fn delete_by_email(&self, email: &str) -> Result<(), ApiError>;
}

/// Outbound SMS capability. One attempt, no delivery receipt.
pub trait SmsSender: Send + Sync {
    async fn send_code(&self, phone_number: &str, code: &str) -> anyhow::Result<()>;
}

/// Repository for event occurrences and their listing aggregates.
pub trait EventRepository: Send + Sync {
    /// Insert every occurrence of one creation request, all or nothing.
    async fn insert_occurrences(&self, events: &[Event]) -> Result<(), ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, ApiError>;

    /// Active events ordered by start time, with aggregates. `viewer` drives `is_favorite`.
    async fn list_summaries(
        &self,
        viewer: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<EventSummary>, ApiError>;

    /// One event with aggregates; `None` when it is missing or inactive.
    async fn find_summary(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<EventSummary>, ApiError>;

    async fn count_by_creator(&self, creator_id: Uuid) -> Result<u64, ApiError>;
}

pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: &Comment) -> Result<(), ApiError>;

    /// Newest first.
    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Comment>, ApiError>;
}

pub trait ParticipantRepository: Send + Sync {
    /// Register a participant unless the event already holds `capacity` of them
    /// (0 = unlimited). The count and the insert are atomic per event.
    ///
    /// Full → [`ApiError::EventFull`]; duplicate (event, user) → [`ApiError::AlreadyParticipating`].
    async fn create(&self, participant: &Participant, capacity: u64) -> Result<(), ApiError>;

    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Participant>, ApiError>;
}

pub trait FavoriteRepository: Send + Sync {
    /// Duplicate (user, event) → [`ApiError::AlreadyFavorite`].
    async fn create(&self, user_id: Uuid, event_id: Uuid) -> Result<(), ApiError>;

    /// Returns `true` if deleted, `false` if not found.
    async fn delete(&self, user_id: Uuid, event_id: Uuid) -> Result<bool, ApiError>;

    async fn list_events(&self, user_id: Uuid) -> Result<Vec<Event>, ApiError>;

    async fn count_for_user(&self, user_id: Uuid) -> Result<u64, ApiError>;
}

pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<(), ApiError>;

    /// Newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, ApiError>;

    /// Returns `true` if a notification owned by `user_id` was marked read.
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool, ApiError>;

    async fn count_for_user(&self, user_id: Uuid) -> Result<u64, ApiError>;
}
