use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use manareh_domain::profile::Gender;
use manareh_domain::recurrence::EventDetails;

/// Smallest and largest one-time code (inclusive). Codes are always 5 digits.
pub const OTP_CODE_MIN: u32 = 10_000;
pub const OTP_CODE_MAX: u32 = 99_999;

/// Default one-time code lifetime in seconds.
pub const DEFAULT_OTP_TTL_SECS: u64 = 300;

/// Longest accepted comment, in characters.
pub const MAX_COMMENT_LEN: usize = 500;

/// Rating applied when a comment is posted without one.
pub const DEFAULT_RATING: u8 = 5;

/// Event category applied when none is given.
pub const DEFAULT_CATEGORY: &str = "religious";

/// Event capacity applied when none is given. Zero means unlimited.
pub const DEFAULT_CAPACITY: i32 = 100;

/// Notification type applied when none is given.
pub const DEFAULT_NOTIFICATION_KIND: &str = "info";

/// Permanent account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub national_id: Option<String>,
    pub country: String,
    pub province: String,
    pub city: String,
    pub gender: Gender,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub is_verified: bool,
    pub terms_accepted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Candidate profile staged inside a pending registration.
///
/// The password is hashed before staging; the plaintext never reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub national_id: Option<String>,
    pub country: String,
    pub province: String,
    pub city: String,
    pub gender: Gender,
    pub password_hash: String,
    pub terms_accepted: bool,
}

impl CandidateProfile {
    /// Materialize a verified user from the staged profile.
    pub fn into_verified_user(self, now: DateTime<Utc>) -> User {
        User {
            id: Uuid::now_v7(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            national_id: self.national_id,
            country: self.country,
            province: self.province,
            city: self.city,
            gender: self.gender,
            password_hash: self.password_hash,
            is_verified: true,
            terms_accepted: self.terms_accepted,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A staged registration awaiting its one-time code. At most one per email.
#[derive(Debug, Clone)]
pub struct PendingRegistration {
    pub id: Uuid,
    pub email: String,
    pub phone_number: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    /// `None` when an unverified user row already exists for the email.
    pub profile: Option<CandidateProfile>,
    pub created_at: DateTime<Utc>,
}

impl PendingRegistration {
    /// A code checked exactly at `expires_at` is still valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// One persisted event occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: Uuid,
    pub details: EventDetails,
    pub starts_at: DateTime<Utc>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// An event with its listing aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSummary {
    pub event: Event,
    /// Mean rating rounded to one decimal, `None` without comments.
    pub average_rating: Option<f64>,
    pub comment_count: u64,
    pub current_participants: u64,
    pub is_favorite: bool,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub body: String,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Participant {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub attended: bool,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-user activity counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    pub events_count: u64,
    pub notifications_count: u64,
    pub favorites_count: u64,
    pub join_year: i32,
}

/// Round a mean rating to one decimal place.
pub fn round_rating(mean: f64) -> f64 {
    (mean * 10.0).round() / 10.0
}
