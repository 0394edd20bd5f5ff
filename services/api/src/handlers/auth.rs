//! Bearer-token identity for handlers.

use std::future::Future;

use axum::http::request::Parts;
use axum::extract::{FromRequestParts, OptionalFromRequestParts};

use manareh_auth_types::bearer::bearer_from_parts;
use manareh_auth_types::token::validate_access_token;

use crate::domain::types::User;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::account::current_user;

/// The account named by a valid bearer token.
///
/// Rejects with `INVALID_TOKEN` (401) when the header is missing, the token
/// fails validation, or its subject no longer resolves to a user.
pub struct CurrentUser(pub User);

async fn resolve(token: Option<String>, state: AppState) -> Result<User, ApiError> {
    let token = token.ok_or(ApiError::InvalidToken)?;
    let info =
        validate_access_token(&token, &state.jwt_secret).map_err(|_| ApiError::InvalidToken)?;
    current_user(&state.user_repo(), &info.email).await
}

// Same shape as `BearerToken`: read the header synchronously, then return an
// owned future so the result does not borrow `parts`.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = bearer_from_parts(parts).map(|b| b.0);
        let state = state.clone();
        async move { resolve(token, state).await.map(Self) }
    }
}

/// Anonymous callers and unusable tokens both resolve to `None`.
impl OptionalFromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let token = bearer_from_parts(parts).map(|b| b.0);
        let state = state.clone();
        async move {
            if token.is_none() {
                return Ok(None);
            }
            match resolve(token, state).await {
                Ok(user) => Ok(Some(Self(user))),
                Err(ApiError::InvalidToken) => Ok(None),
                Err(e) => Err(e),
            }
        }
    }
}
