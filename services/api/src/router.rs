use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use manareh_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    account::{check_user, create_user, get_me, get_stats, login, token, update_national_id},
    comment::{create_comment, list_comments},
    donation::get_donation,
    event::{create_event, get_event, list_events},
    favorite::{add_favorite, list_favorites, remove_favorite},
    health::{healthz, readyz},
    notification::{create_notification, list_notifications, mark_notification_read},
    otp::{send_otp, verify_otp},
    participant::{join_event, list_participants},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Registration
        .route("/send-otp", post(send_otp))
        .route("/resend-otp", post(send_otp))
        .route("/verify-otp", post(verify_otp))
        // Accounts
        .route("/users", post(create_user))
        .route("/login", post(login))
        .route("/token", post(token))
        .route("/check-user", get(check_user))
        .route("/users/@me", get(get_me))
        .route("/users/@me/national-id", patch(update_national_id))
        .route("/users/@me/stats", get(get_stats))
        // Events
        .route("/events", post(create_event))
        .route("/events", get(list_events))
        .route("/events/{id}", get(get_event))
        .route("/events/{id}/comments", post(create_comment))
        .route("/events/{id}/comments", get(list_comments))
        .route("/events/{id}/participants", post(join_event))
        .route("/events/{id}/participants", get(list_participants))
        // Favorites
        .route("/favorites", post(add_favorite))
        .route("/favorites/{event_id}", delete(remove_favorite))
        .route("/users/@me/favorites", get(list_favorites))
        // Notifications
        .route("/notifications", post(create_notification))
        .route("/users/@me/notifications", get(list_notifications))
        .route(
            "/users/@me/notifications/{id}/read",
            patch(mark_notification_read),
        )
        // Donation
        .route("/donation", get(get_donation))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
