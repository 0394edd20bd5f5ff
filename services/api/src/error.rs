use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use manareh_domain::profile::ProfileError;
use manareh_domain::recurrence::RecurrenceError;

/// API error variants, grouped by the status they map to.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 400
    #[error(transparent)]
    InvalidProfile(#[from] ProfileError),
    #[error("profile is required for a new registration")]
    MissingProfile,
    #[error("profile email or phone does not match the request")]
    ProfileMismatch,
    #[error("terms must be accepted")]
    TermsNotAccepted,
    #[error(transparent)]
    InvalidRepeatRule(#[from] RecurrenceError),
    #[error("missing data")]
    MissingData,
    #[error("capacity and price must not be negative")]
    InvalidEventData,
    #[error("rating must be between 1 and 5")]
    InvalidRating,
    #[error("comment must be 1 to 500 characters")]
    InvalidComment,

    // 409
    #[error("user already verified")]
    AlreadyVerified,
    #[error("phone number does not match the registered account")]
    PhoneMismatch,
    #[error("{0} already registered")]
    DuplicateIdentity(&'static str),
    #[error("identity was registered concurrently")]
    ConflictIdentity,
    #[error("already participating")]
    AlreadyParticipating,
    #[error("event is full")]
    EventFull,
    #[error("already in favorites")]
    AlreadyFavorite,

    // 404
    #[error("no pending code for this email")]
    PendingNotFound,
    #[error("event not found")]
    EventNotFound,
    #[error("favorite not found")]
    FavoriteNotFound,
    #[error("notification not found")]
    NotificationNotFound,

    // 401
    #[error("code does not match")]
    CodeMismatch,
    #[error("code expired")]
    CodeExpired,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user not verified")]
    UserNotVerified,
    #[error("invalid token")]
    InvalidToken,

    // 403
    #[error("not allowed to act for another user")]
    Forbidden,

    // 503
    #[error("sms delivery unavailable")]
    DeliveryUnavailable,
    #[error("donation unavailable")]
    DonationUnavailable,

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidProfile(e) => match e {
                ProfileError::InvalidEmail => "INVALID_EMAIL",
                ProfileError::InvalidPhone => "INVALID_PHONE",
                ProfileError::InvalidNationalId => "INVALID_NATIONAL_ID",
                ProfileError::InvalidPassword => "INVALID_PASSWORD",
                ProfileError::InvalidGender => "INVALID_GENDER",
                ProfileError::MissingField => "MISSING_FIELD",
            },
            Self::MissingProfile => "MISSING_PROFILE",
            Self::ProfileMismatch => "PROFILE_MISMATCH",
            Self::TermsNotAccepted => "TERMS_NOT_ACCEPTED",
            Self::InvalidRepeatRule(_) => "INVALID_REPEAT_RULE",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidEventData => "INVALID_EVENT_DATA",
            Self::InvalidRating => "INVALID_RATING",
            Self::InvalidComment => "INVALID_COMMENT",
            Self::AlreadyVerified => "ALREADY_VERIFIED",
            Self::PhoneMismatch => "PHONE_MISMATCH",
            Self::DuplicateIdentity(_) => "DUPLICATE_IDENTITY",
            Self::ConflictIdentity => "CONFLICT_IDENTITY",
            Self::AlreadyParticipating => "ALREADY_PARTICIPATING",
            Self::EventFull => "EVENT_FULL",
            Self::AlreadyFavorite => "ALREADY_FAVORITE",
            Self::PendingNotFound => "PENDING_NOT_FOUND",
            Self::EventNotFound => "EVENT_NOT_FOUND",
            Self::FavoriteNotFound => "FAVORITE_NOT_FOUND",
            Self::NotificationNotFound => "NOTIFICATION_NOT_FOUND",
            Self::CodeMismatch => "CODE_MISMATCH",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UserNotVerified => "USER_NOT_VERIFIED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Forbidden => "FORBIDDEN",
            Self::DeliveryUnavailable => "DELIVERY_UNAVAILABLE",
            Self::DonationUnavailable => "DONATION_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidProfile(_)
            | Self::MissingProfile
            | Self::ProfileMismatch
            | Self::TermsNotAccepted
            | Self::InvalidRepeatRule(_)
            | Self::MissingData
            | Self::InvalidEventData
            | Self::InvalidRating
            | Self::InvalidComment => StatusCode::BAD_REQUEST,
            Self::AlreadyVerified
            | Self::PhoneMismatch
            | Self::DuplicateIdentity(_)
            | Self::ConflictIdentity
            | Self::AlreadyParticipating
            | Self::EventFull
            | Self::AlreadyFavorite => StatusCode::CONFLICT,
            Self::PendingNotFound
            | Self::EventNotFound
            | Self::FavoriteNotFound
            | Self::NotificationNotFound => StatusCode::NOT_FOUND,
            Self::CodeMismatch
            | Self::CodeExpired
            | Self::InvalidCredentials
            | Self::UserNotVerified
            | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::DeliveryUnavailable | Self::DonationUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // TraceLayer already records every request; only server-side failures
        // carry a chain worth logging.
        match &self {
            Self::Internal(e) => tracing::error!(error = ?e, kind = "INTERNAL", "internal error"),
            Self::DeliveryUnavailable | Self::DonationUnavailable => {
                tracing::warn!(kind = self.kind(), "dependency unavailable");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
