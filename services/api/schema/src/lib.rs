//! sea-orm entities for the Manareh database.

pub mod comments;
pub mod event_participants;
pub mod events;
pub mod notifications;
pub mod pending_registrations;
pub mod user_favorites;
pub mod users;
