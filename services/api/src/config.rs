use serde::Deserialize;

use manareh_core::config::Config;

/// API service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing access tokens.
    pub jwt_secret: String,
    /// TCP port to listen on. Env var: `API_PORT`.
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Kavenegar REST key. Without it every SMS send fails.
    #[serde(default)]
    pub kavenegar_api_key: Option<String>,
    /// Sender line for outbound SMS.
    #[serde(default = "default_sms_sender")]
    pub sms_sender: String,
    /// Lifetime of a one-time code, in seconds.
    #[serde(default = "default_otp_ttl_secs")]
    pub otp_ttl_secs: u64,
    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: u64,
    /// Bank card shown on the donation page.
    #[serde(default)]
    pub donation_card_number: Option<String>,
}

fn default_api_port() -> u16 {
    8000
}

fn default_sms_sender() -> String {
    "2000660110".to_owned()
}

fn default_otp_ttl_secs() -> u64 {
    crate::domain::types::DEFAULT_OTP_TTL_SECS
}

fn default_access_token_ttl_secs() -> u64 {
    manareh_auth_types::token::DEFAULT_ACCESS_TOKEN_TTL_SECS
}

impl Config for ApiConfig {}
