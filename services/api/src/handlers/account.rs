use axum::{
    Form, Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::domain::types::User;
use crate::error::ApiError;
use crate::handlers::auth::CurrentUser;
use crate::handlers::otp::{ProfileRequest, TokenResponse};
use crate::state::AppState;
use crate::usecase::account::{
    CheckUserInput, CheckUserUseCase, CreateUserUseCase, GetStatsUseCase, LoginInput,
    LoginUseCase, UpdateNationalIdUseCase,
};
use crate::usecase::otp::ProfileInput;

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub national_id: Option<String>,
    pub country: String,
    pub province: String,
    pub city: String,
    pub gender: &'static str,
    pub is_verified: bool,
    #[serde(serialize_with = "manareh_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone_number: user.phone_number,
            national_id: user.national_id,
            country: user.country,
            province: user.province,
            city: user.city,
            gender: user.gender.as_str(),
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

// ── POST /users ──────────────────────────────────────────────────────────────

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<ProfileRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let usecase = CreateUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(ProfileInput::from(body)).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

// ── POST /login, POST /token ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub username: String,
    pub password: String,
}

async fn login_with(state: &AppState, body: LoginRequest) -> Result<TokenResponse, ApiError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
        access_token_ttl_secs: state.access_token_ttl_secs,
    };
    let out = usecase
        .execute(LoginInput {
            email: body.username,
            password: body.password,
        })
        .await?;
    Ok(TokenResponse::bearer(
        out.access_token,
        out.user_id,
        out.access_token_exp,
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    Ok(Json(login_with(&state, body).await?))
}

/// OAuth2 password-grant form variant of [`login`].
pub async fn token(
    State(state): State<AppState>,
    Form(body): Form<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    Ok(Json(login_with(&state, body).await?))
}

// ── GET /check-user ──────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct CheckUserQuery {
    pub email: Option<String>,
    pub national_id: Option<String>,
    #[serde(alias = "phone_number")]
    pub phone: Option<String>,
}

#[derive(Serialize)]
pub struct CheckUserResponse {
    pub exists: bool,
    pub field: Option<&'static str>,
}

pub async fn check_user(
    State(state): State<AppState>,
    Query(query): Query<CheckUserQuery>,
) -> Result<Json<CheckUserResponse>, ApiError> {
    let usecase = CheckUserUseCase {
        users: state.user_repo(),
    };
    let field = usecase
        .execute(CheckUserInput {
            email: query.email,
            national_id: query.national_id,
            phone_number: query.phone,
        })
        .await?;
    Ok(Json(CheckUserResponse {
        exists: field.is_some(),
        field,
    }))
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

// ── PATCH /users/@me/national-id ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateNationalIdRequest {
    pub national_id: String,
}

pub async fn update_national_id(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<UpdateNationalIdRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = UpdateNationalIdUseCase {
        users: state.user_repo(),
    };
    usecase.execute(&user, body.national_id.trim()).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/@me/stats ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatsResponse {
    pub events_count: u64,
    pub notifications_count: u64,
    pub favorites_count: u64,
    pub join_year: i32,
}

pub async fn get_stats(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, ApiError> {
    let usecase = GetStatsUseCase {
        events: state.event_repo(),
        notifications: state.notification_repo(),
        favorites: state.favorite_repo(),
    };
    let stats = usecase.execute(&user).await?;
    Ok(Json(StatsResponse {
        events_count: stats.events_count,
        notifications_count: stats.notifications_count,
        favorites_count: stats.favorites_count,
        join_year: stats.join_year,
    }))
}
