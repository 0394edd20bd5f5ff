//! Bearer-token helpers for handler tests.
//!
//! Signs a real access token with a test secret so extractors and handlers run
//! the same validation path as in production.

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};

use manareh_auth_types::token::issue_access_token;

/// Secret shared by tests that sign and validate tokens.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Identity to authenticate test requests as.
pub struct MockAuth {
    pub email: String,
    pub secret: String,
}

impl MockAuth {
    pub fn new(email: &str) -> Self {
        Self {
            email: email.to_owned(),
            secret: TEST_JWT_SECRET.to_owned(),
        }
    }

    /// Signed access token for `email`, valid for 30 minutes.
    pub fn token(&self) -> String {
        issue_access_token(&self.email, &self.secret, 30 * 60)
            .expect("sign test token")
            .access_token
    }

    /// `Authorization: Bearer <token>` header map.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token())).expect("header value"),
        );
        map
    }
}
