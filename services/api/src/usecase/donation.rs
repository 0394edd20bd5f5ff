use crate::error::ApiError;

/// Card number shown on the donation page. There is no payment flow.
pub fn donation_card(configured: Option<&str>) -> Result<&str, ApiError> {
    configured
        .map(str::trim)
        .filter(|card| !card.is_empty())
        .ok_or(ApiError::DonationUnavailable)
}
