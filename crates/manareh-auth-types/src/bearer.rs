//! `Authorization: Bearer` extractor.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use http::StatusCode;
use http::header::AUTHORIZATION;
use http::request::Parts;

/// Raw bearer token taken from the `Authorization` header.
///
/// Only extracts the token string; signature and expiry are checked by handlers
/// with [`crate::token::validate_access_token`] against the service secret.
/// Returns 401 when the header is absent or not a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

/// Read the bearer credential from `parts`, if any.
///
/// Browsers sometimes send the literal strings `null`/`undefined` for a missing token.
pub fn bearer_from_parts(parts: &Parts) -> Option<BearerToken> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() || token == "null" || token == "undefined" {
        return None;
    }
    Some(BearerToken(token.to_owned()))
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Extract synchronously and return a 'static future; see the axum-core 0.5
    // `fn -> impl Future + Send` signature.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = bearer_from_parts(parts);
        async move { token.ok_or(StatusCode::UNAUTHORIZED) }
    }
}

impl<S> OptionalFromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let token = bearer_from_parts(parts);
        async move { Ok(token) }
    }
}
