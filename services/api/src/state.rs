use chrono::Duration;
use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbCommentRepository, DbEventRepository, DbFavoriteRepository, DbNotificationRepository,
    DbParticipantRepository, DbPendingRegistrationRepository, DbUserRepository,
};
use crate::infra::sms::KavenegarSms;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sms: KavenegarSms,
    pub jwt_secret: String,
    pub otp_ttl: Duration,
    pub access_token_ttl_secs: u64,
    pub donation_card_number: Option<String>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn pending_repo(&self) -> DbPendingRegistrationRepository {
        DbPendingRegistrationRepository {
            db: self.db.clone(),
        }
    }

    pub fn event_repo(&self) -> DbEventRepository {
        DbEventRepository {
            db: self.db.clone(),
        }
    }

    pub fn comment_repo(&self) -> DbCommentRepository {
        DbCommentRepository {
            db: self.db.clone(),
        }
    }

    pub fn participant_repo(&self) -> DbParticipantRepository {
        DbParticipantRepository {
            db: self.db.clone(),
        }
    }

    pub fn favorite_repo(&self) -> DbFavoriteRepository {
        DbFavoriteRepository {
            db: self.db.clone(),
        }
    }

    pub fn notification_repo(&self) -> DbNotificationRepository {
        DbNotificationRepository {
            db: self.db.clone(),
        }
    }
}
