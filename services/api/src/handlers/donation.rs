use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::donation::donation_card;

#[derive(Serialize)]
pub struct DonationResponse {
    pub card_number: String,
}

// ── GET /donation ────────────────────────────────────────────────────────────

pub async fn get_donation(
    State(state): State<AppState>,
) -> Result<Json<DonationResponse>, ApiError> {
    let card = donation_card(state.donation_card_number.as_deref())?;
    Ok(Json(DonationResponse {
        card_number: card.to_owned(),
    }))
}
