use chrono::{Datelike, Utc};
use uuid::Uuid;

use manareh_auth_types::token::issue_access_token;
use manareh_domain::profile::validate_national_id;

use crate::domain::repository::{
    EventRepository, FavoriteRepository, NotificationRepository, UserRepository,
};
use crate::domain::types::{User, UserStats};
use crate::error::ApiError;
use crate::infra::password::verify_password;
use crate::usecase::otp::{ProfileInput, ensure_identity_free};

// ── CreateUser (unverified) ──────────────────────────────────────────────────

pub struct CreateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> CreateUserUseCase<U> {
    /// Create an account that stays unverified until it passes the one-time code flow.
    pub async fn execute(&self, input: ProfileInput) -> Result<User, ApiError> {
        let valid = input.validate()?;
        ensure_identity_free(&self.users, &valid.input).await?;
        let candidate = valid.into_candidate()?;
        let mut user = candidate.into_verified_user(Utc::now());
        user.is_verified = false;
        self.users.insert(&user).await?;
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub access_token: String,
    pub access_token_exp: u64,
}

pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
    pub access_token_ttl_secs: u64,
}

impl<U: UserRepository> LoginUseCase<U> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;
        if !verify_password(&input.password, &user.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }
        if !user.is_verified {
            return Err(ApiError::UserNotVerified);
        }
        let issued = issue_access_token(&user.email, &self.jwt_secret, self.access_token_ttl_secs)
            .map_err(|e| ApiError::Internal(e.into()))?;
        Ok(LoginOutput {
            user_id: user.id,
            access_token: issued.access_token,
            access_token_exp: issued.access_token_exp,
        })
    }
}

// ── CheckUser ────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct CheckUserInput {
    pub email: Option<String>,
    pub national_id: Option<String>,
    pub phone_number: Option<String>,
}

/// Name of the first field already taken, in email → national id → phone order.
pub struct CheckUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> CheckUserUseCase<U> {
    pub async fn execute(&self, input: CheckUserInput) -> Result<Option<&'static str>, ApiError> {
        if let Some(email) = input.email.as_deref().filter(|s| !s.is_empty()) {
            if self.users.find_by_email(email).await?.is_some() {
                return Ok(Some("email"));
            }
        }
        if let Some(national_id) = input.national_id.as_deref().filter(|s| !s.is_empty()) {
            if self.users.find_by_national_id(national_id).await?.is_some() {
                return Ok(Some("national_id"));
            }
        }
        if let Some(phone) = input.phone_number.as_deref().filter(|s| !s.is_empty()) {
            if self.users.find_by_phone(phone).await?.is_some() {
                return Ok(Some("phone"));
            }
        }
        Ok(None)
    }
}

// ── Current user ─────────────────────────────────────────────────────────────

/// Resolve the token subject to its account.
pub async fn current_user<U: UserRepository>(users: &U, email: &str) -> Result<User, ApiError> {
    users
        .find_by_email(email)
        .await?
        .ok_or(ApiError::InvalidToken)
}

// ── UpdateNationalId ─────────────────────────────────────────────────────────

pub struct UpdateNationalIdUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateNationalIdUseCase<U> {
    pub async fn execute(&self, user: &User, national_id: &str) -> Result<(), ApiError> {
        validate_national_id(national_id)?;
        if let Some(owner) = self.users.find_by_national_id(national_id).await? {
            if owner.id == user.id {
                return Ok(());
            }
            return Err(ApiError::DuplicateIdentity("national id"));
        }
        self.users.update_national_id(user.id, national_id).await
    }
}

// ── Stats ────────────────────────────────────────────────────────────────────

pub struct GetStatsUseCase<E, N, F>
where
    E: EventRepository,
    N: NotificationRepository,
    F: FavoriteRepository,
{
    pub events: E,
    pub notifications: N,
    pub favorites: F,
}

impl<E, N, F> GetStatsUseCase<E, N, F>
where
    E: EventRepository,
    N: NotificationRepository,
    F: FavoriteRepository,
{
    pub async fn execute(&self, user: &User) -> Result<UserStats, ApiError> {
        Ok(UserStats {
            events_count: self.events.count_by_creator(user.id).await?,
            notifications_count: self.notifications.count_for_user(user.id).await?,
            favorites_count: self.favorites.count_for_user(user.id).await?,
            join_year: user.created_at.year(),
        })
    }
}
