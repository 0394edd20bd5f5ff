use sea_orm::Database;
use tracing::info;

use manareh_core::config::Config;
use manareh_core::tracing::init_tracing;

use manareh_api::config::ApiConfig;
use manareh_api::infra::sms::KavenegarSms;
use manareh_api::router::build_router;
use manareh_api::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let sms = KavenegarSms::new(config.kavenegar_api_key.clone(), config.sms_sender.clone())
        .expect("failed to build sms client");
    if !sms.is_configured() {
        tracing::warn!("KAVENEGAR_API_KEY not set; every code delivery will fail");
    }

    let otp_ttl_secs = i64::try_from(config.otp_ttl_secs).expect("OTP_TTL_SECS out of range");

    let state = AppState {
        db,
        sms,
        jwt_secret: config.jwt_secret,
        otp_ttl: chrono::Duration::seconds(otp_ttl_secs),
        access_token_ttl_secs: config.access_token_ttl_secs,
        donation_card_number: config.donation_card_number,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("manareh api listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
