use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use manareh_auth_types::token::issue_access_token;
use manareh_domain::profile::{
    Gender, parse_gender, require_non_empty, validate_email, validate_national_id,
    validate_password, validate_phone,
};

use crate::domain::repository::{PendingRegistrationRepository, SmsSender, UserRepository};
use crate::domain::types::{CandidateProfile, OTP_CODE_MAX, OTP_CODE_MIN, PendingRegistration};
use crate::error::ApiError;
use crate::infra::password::hash_password;

fn generate_code() -> String {
    rand::rng()
        .random_range(OTP_CODE_MIN..=OTP_CODE_MAX)
        .to_string()
}

// ── RequestCode ──────────────────────────────────────────────────────────────

/// Registration profile as submitted, password in plaintext.
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub national_id: Option<String>,
    pub country: String,
    pub province: String,
    pub city: String,
    pub gender: String,
    pub password: String,
    pub terms_accepted: bool,
}

/// A profile that passed field validation; the password is still plaintext.
pub struct ValidProfile {
    pub input: ProfileInput,
    pub gender: Gender,
}

impl ProfileInput {
    pub fn validate(self) -> Result<ValidProfile, ApiError> {
        require_non_empty([
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.country.as_str(),
            self.province.as_str(),
            self.city.as_str(),
        ])?;
        validate_email(&self.email)?;
        validate_phone(&self.phone_number)?;
        validate_password(&self.password)?;
        if let Some(national_id) = &self.national_id {
            validate_national_id(national_id)?;
        }
        let gender = parse_gender(&self.gender)?;
        if !self.terms_accepted {
            return Err(ApiError::TermsNotAccepted);
        }
        Ok(ValidProfile {
            input: self,
            gender,
        })
    }
}

impl ValidProfile {
    /// Hash the password, producing the form that is safe to stage or store.
    pub fn into_candidate(self) -> Result<CandidateProfile, ApiError> {
        let password_hash = hash_password(&self.input.password)?;
        let input = self.input;
        Ok(CandidateProfile {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone_number: input.phone_number,
            national_id: input.national_id,
            country: input.country,
            province: input.province,
            city: input.city,
            gender: self.gender,
            password_hash,
            terms_accepted: input.terms_accepted,
        })
    }
}

/// Reject a profile whose email, phone or national id already belongs to a user.
pub async fn ensure_identity_free<U: UserRepository>(
    users: &U,
    profile: &ProfileInput,
) -> Result<(), ApiError> {
    if users.find_by_email(&profile.email).await?.is_some() {
        return Err(ApiError::DuplicateIdentity("email"));
    }
    if users.find_by_phone(&profile.phone_number).await?.is_some() {
        return Err(ApiError::DuplicateIdentity("phone number"));
    }
    if let Some(national_id) = &profile.national_id {
        if users.find_by_national_id(national_id).await?.is_some() {
            return Err(ApiError::DuplicateIdentity("national id"));
        }
    }
    Ok(())
}

pub struct RequestCodeInput {
    pub email: String,
    pub phone_number: String,
    pub profile: Option<ProfileInput>,
}

pub struct RequestCodeUseCase<U, P, S>
where
    U: UserRepository,
    P: PendingRegistrationRepository,
    S: SmsSender,
{
    pub users: U,
    pub pending: P,
    pub sms: S,
    pub code_ttl: Duration,
}

impl<U, P, S> RequestCodeUseCase<U, P, S>
where
    U: UserRepository,
    P: PendingRegistrationRepository,
    S: SmsSender,
{
    pub async fn execute(&self, input: RequestCodeInput) -> Result<(), ApiError> {
        validate_email(&input.email)?;
        validate_phone(&input.phone_number)?;

        // 1. Existing account: only an unverified one with the same phone may re-request.
        //    Otherwise the candidate profile is required and must be unclaimed.
        let profile = match self.users.find_by_email(&input.email).await? {
            Some(user) if user.is_verified => return Err(ApiError::AlreadyVerified),
            Some(user) if user.phone_number != input.phone_number => {
                return Err(ApiError::PhoneMismatch);
            }
            Some(_) => None,
            None => {
                let profile = input.profile.ok_or(ApiError::MissingProfile)?;
                if profile.email != input.email || profile.phone_number != input.phone_number {
                    return Err(ApiError::ProfileMismatch);
                }
                let valid = profile.validate()?;
                ensure_identity_free(&self.users, &valid.input).await?;
                Some(valid.into_candidate()?)
            }
        };

        // 2. Stage the code, superseding any earlier one for this email.
        let now = Utc::now();
        let pending = PendingRegistration {
            id: Uuid::now_v7(),
            email: input.email,
            phone_number: input.phone_number,
            code: generate_code(),
            expires_at: now + self.code_ttl,
            profile,
            created_at: now,
        };
        self.pending.replace(&pending).await?;

        // 3. Deliver. An undeliverable code must not block a retry.
        if let Err(e) = self.sms.send_code(&pending.phone_number, &pending.code).await {
            tracing::warn!(error = %e, email = %pending.email, "otp delivery failed");
            self.pending.delete_by_email(&pending.email).await?;
            return Err(ApiError::DeliveryUnavailable);
        }

        tracing::info!(email = %pending.email, "otp issued");
        Ok(())
    }
}

// ── VerifyCode ───────────────────────────────────────────────────────────────

pub struct VerifyCodeInput {
    pub email: String,
    pub code: String,
}

#[derive(Debug)]
pub struct VerifyCodeOutput {
    pub user_id: Uuid,
    pub access_token: String,
    pub access_token_exp: u64,
}

pub struct VerifyCodeUseCase<U, P>
where
    U: UserRepository,
    P: PendingRegistrationRepository,
{
    pub users: U,
    pub pending: P,
    pub jwt_secret: String,
    pub access_token_ttl_secs: u64,
}

impl<U, P> VerifyCodeUseCase<U, P>
where
    U: UserRepository,
    P: PendingRegistrationRepository,
{
    pub async fn execute(&self, input: VerifyCodeInput) -> Result<VerifyCodeOutput, ApiError> {
        let pending = self
            .pending
            .find_by_email(&input.email)
            .await?
            .ok_or(ApiError::PendingNotFound)?;

        if pending.code != input.code {
            return Err(ApiError::CodeMismatch);
        }
        if pending.is_expired_at(Utc::now()) {
            self.pending.delete_by_email(&pending.email).await?;
            return Err(ApiError::CodeExpired);
        }

        let user_id = match self.users.find_by_email(&pending.email).await? {
            Some(user) if user.is_verified => return Err(ApiError::AlreadyVerified),
            Some(user) => {
                self.users.mark_verified(user.id).await?;
                user.id
            }
            None => {
                // Without a user row the staged profile is the only source.
                let profile = pending.profile.clone().ok_or_else(|| {
                    anyhow::anyhow!("pending registration for {} has no profile", pending.email)
                })?;
                let user = profile.into_verified_user(Utc::now());
                self.users.insert(&user).await?;
                user.id
            }
        };

        self.pending.delete_by_email(&pending.email).await?;

        let issued = issue_access_token(&pending.email, &self.jwt_secret, self.access_token_ttl_secs)
            .map_err(|e| ApiError::Internal(e.into()))?;

        tracing::info!(%user_id, "user verified");
        Ok(VerifyCodeOutput {
            user_id,
            access_token: issued.access_token,
            access_token_exp: issued.access_token_exp,
        })
    }
}
