use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::otp::{
    ProfileInput, RequestCodeInput, RequestCodeUseCase, VerifyCodeInput, VerifyCodeUseCase,
};

// ── POST /send-otp, POST /resend-otp ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct ProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(alias = "phone")]
    pub phone_number: String,
    #[serde(default)]
    pub national_id: Option<String>,
    pub country: String,
    pub province: String,
    pub city: String,
    pub gender: String,
    pub password: String,
    #[serde(default)]
    pub terms_accepted: bool,
}

impl From<ProfileRequest> for ProfileInput {
    fn from(body: ProfileRequest) -> Self {
        Self {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            phone_number: body.phone_number,
            national_id: body.national_id.filter(|id| !id.is_empty()),
            country: body.country,
            province: body.province,
            city: body.city,
            gender: body.gender,
            password: body.password,
            terms_accepted: body.terms_accepted,
        }
    }
}

#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
    #[serde(alias = "phone")]
    pub phone_number: String,
    #[serde(default)]
    pub profile: Option<ProfileRequest>,
}

#[derive(Serialize)]
pub struct SendOtpResponse {
    pub ok: bool,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>, ApiError> {
    let usecase = RequestCodeUseCase {
        users: state.user_repo(),
        pending: state.pending_repo(),
        sms: state.sms.clone(),
        code_ttl: state.otp_ttl,
    };
    usecase
        .execute(RequestCodeInput {
            email: body.email,
            phone_number: body.phone_number,
            profile: body.profile.map(ProfileInput::from),
        })
        .await?;
    Ok(Json(SendOtpResponse { ok: true }))
}

// ── POST /verify-otp ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

/// Token payload shared by verification and password login.
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user_id: Uuid,
    pub expires_at: u64,
}

impl TokenResponse {
    pub fn bearer(access_token: String, user_id: Uuid, expires_at: u64) -> Self {
        Self {
            access_token,
            token_type: "bearer",
            user_id,
            expires_at,
        }
    }
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let usecase = VerifyCodeUseCase {
        users: state.user_repo(),
        pending: state.pending_repo(),
        jwt_secret: state.jwt_secret.clone(),
        access_token_ttl_secs: state.access_token_ttl_secs,
    };
    let out = usecase
        .execute(VerifyCodeInput {
            email: body.email,
            code: body.code.trim().to_owned(),
        })
        .await?;
    Ok(Json(TokenResponse::bearer(
        out.access_token,
        out.user_id,
        out.access_token_exp,
    )))
}
