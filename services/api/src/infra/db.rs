use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, SqlErr, Statement, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use manareh_domain::pagination::PageRequest;
use manareh_domain::profile::Gender;
use manareh_domain::recurrence::EventDetails;
use manareh_schema::{
    comments, event_participants, events, notifications, pending_registrations, user_favorites,
    users,
};

use crate::domain::repository::{
    CommentRepository, EventRepository, FavoriteRepository, NotificationRepository,
    ParticipantRepository, PendingRegistrationRepository, UserRepository,
};
use crate::domain::types::{
    CandidateProfile, Comment, Event, EventSummary, Notification, Participant,
    PendingRegistration, User, round_rating,
};
use crate::error::ApiError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl DbUserRepository {
    async fn find_one(
        &self,
        column: users::Column,
        value: &str,
        what: &'static str,
    ) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await
            .context(what)?;
        model.map(user_from_model).transpose()
    }
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        self.find_one(users::Column::Email, email, "find user by email")
            .await
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, ApiError> {
        self.find_one(users::Column::PhoneNumber, phone_number, "find user by phone")
            .await
    }

    async fn find_by_national_id(&self, national_id: &str) -> Result<Option<User>, ApiError> {
        self.find_one(
            users::Column::NationalId,
            national_id,
            "find user by national id",
        )
        .await
    }

    async fn insert(&self, user: &User) -> Result<(), ApiError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            email: Set(user.email.clone()),
            phone_number: Set(user.phone_number.clone()),
            national_id: Set(user.national_id.clone()),
            country: Set(user.country.clone()),
            province: Set(user.province.clone()),
            city: Set(user.city.clone()),
            gender: Set(user.gender.as_str().to_owned()),
            password_hash: Set(user.password_hash.clone()),
            is_verified: Set(user.is_verified),
            terms_accepted: Set(user.terms_accepted),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(ApiError::ConflictIdentity),
            Err(e) => Err(anyhow::Error::new(e).context("insert user").into()),
        }
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            is_verified: Set(true),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark user verified")?;
        Ok(())
    }

    async fn update_national_id(&self, id: Uuid, national_id: &str) -> Result<(), ApiError> {
        let result = users::ActiveModel {
            id: Set(id),
            national_id: Set(Some(national_id.to_owned())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(ApiError::DuplicateIdentity("national id")),
            Err(e) => Err(anyhow::Error::new(e).context("update national id").into()),
        }
    }
}

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    let gender = Gender::parse(&model.gender)
        .with_context(|| format!("user {} has unknown gender {:?}", model.id, model.gender))?;
    Ok(User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone_number: model.phone_number,
        national_id: model.national_id,
        country: model.country,
        province: model.province,
        city: model.city,
        gender,
        password_hash: model.password_hash,
        is_verified: model.is_verified,
        terms_accepted: model.terms_accepted,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Pending registration repository ──────────────────────────────────────────

#[derive(Clone)]
pub struct DbPendingRegistrationRepository {
    pub db: DatabaseConnection,
}

impl PendingRegistrationRepository for DbPendingRegistrationRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<PendingRegistration>, ApiError> {
        let model = pending_registrations::Entity::find()
            .filter(pending_registrations::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find pending registration by email")?;
        model.map(pending_from_model).transpose()
    }

    async fn replace(&self, pending: &PendingRegistration) -> Result<(), ApiError> {
        let profile = pending
            .profile
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .context("serialize candidate profile")?;
        let model = pending_registrations::ActiveModel {
            id: Set(pending.id),
            email: Set(pending.email.clone()),
            phone_number: Set(pending.phone_number.clone()),
            code: Set(pending.code.clone()),
            expires_at: Set(pending.expires_at),
            profile: Set(profile),
            created_at: Set(pending.created_at),
        };
        let email = pending.email.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    pending_registrations::Entity::delete_many()
                        .filter(pending_registrations::Column::Email.eq(email))
                        .exec(txn)
                        .await?;
                    model.insert(txn).await?;
                    Ok(())
                })
            })
            .await
            .context("replace pending registration")?;
        Ok(())
    }

    async fn delete_by_email(&self, email: &str) -> Result<(), ApiError> {
        pending_registrations::Entity::delete_many()
            .filter(pending_registrations::Column::Email.eq(email))
            .exec(&self.db)
            .await
            .context("delete pending registration")?;
        Ok(())
    }
}

fn pending_from_model(model: pending_registrations::Model) -> Result<PendingRegistration, ApiError> {
    let profile = model
        .profile
        .map(serde_json::from_value::<CandidateProfile>)
        .transpose()
        .context("deserialize candidate profile")?;
    Ok(PendingRegistration {
        id: model.id,
        email: model.email,
        phone_number: model.phone_number,
        code: model.code,
        expires_at: model.expires_at,
        profile,
        created_at: model.created_at,
    })
}

// ── Event repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEventRepository {
    pub db: DatabaseConnection,
}

/// Event row joined with its aggregates.
#[derive(Debug, FromQueryResult)]
struct EventSummaryRow {
    id: Uuid,
    title: String,
    starts_at: chrono::DateTime<chrono::Utc>,
    location: String,
    latitude: f64,
    longitude: f64,
    host: String,
    creator_id: Uuid,
    category: String,
    city: String,
    province: String,
    country: String,
    capacity: i32,
    active: bool,
    is_free: bool,
    price: f64,
    created_at: chrono::DateTime<chrono::Utc>,
    average_rating: Option<f64>,
    comment_count: i64,
    current_participants: i64,
    is_favorite: bool,
}

const EVENT_SUMMARY_SELECT: &str = r#"
    SELECT e.*,
        (SELECT AVG(c.rating)::float8 FROM comments c WHERE c.event_id = e.id) AS average_rating,
        (SELECT COUNT(*) FROM comments c WHERE c.event_id = e.id) AS comment_count,
        (SELECT COUNT(*) FROM event_participants p WHERE p.event_id = e.id) AS current_participants,
        EXISTS (
            SELECT 1 FROM user_favorites f WHERE f.event_id = e.id AND f.user_id = $1
        ) AS is_favorite
    FROM events e
"#;

impl EventRepository for DbEventRepository {
    async fn insert_occurrences(&self, batch: &[Event]) -> Result<(), ApiError> {
        if batch.is_empty() {
            return Ok(());
        }
        let models: Vec<events::ActiveModel> = batch.iter().map(event_to_active_model).collect();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    events::Entity::insert_many(models).exec(txn).await?;
                    Ok(())
                })
            })
            .await
            .context("insert event occurrences")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, ApiError> {
        let model = events::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find event by id")?;
        Ok(model.map(event_from_model))
    }

    async fn list_summaries(
        &self,
        viewer: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<EventSummary>, ApiError> {
        let sql = format!(
            "{EVENT_SUMMARY_SELECT} WHERE e.active = TRUE ORDER BY e.starts_at ASC LIMIT $2 OFFSET $3"
        );
        let limit = i64::try_from(page.limit()).context("page limit")?;
        let offset = i64::try_from(page.offset()).context("page offset")?;
        let rows = EventSummaryRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            &sql,
            [viewer.into(), limit.into(), offset.into()],
        ))
        .all(&self.db)
        .await
        .context("list event summaries")?;
        Ok(rows.into_iter().map(summary_from_row).collect())
    }

    async fn find_summary(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<EventSummary>, ApiError> {
        let sql = format!("{EVENT_SUMMARY_SELECT} WHERE e.id = $2 AND e.active = TRUE");
        let row = EventSummaryRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            &sql,
            [viewer.into(), id.into()],
        ))
        .one(&self.db)
        .await
        .context("find event summary")?;
        Ok(row.map(summary_from_row))
    }

    async fn count_by_creator(&self, creator_id: Uuid) -> Result<u64, ApiError> {
        let count = events::Entity::find()
            .filter(events::Column::CreatorId.eq(creator_id))
            .count(&self.db)
            .await
            .context("count events by creator")?;
        Ok(count)
    }
}

fn event_to_active_model(event: &Event) -> events::ActiveModel {
    let d = &event.details;
    events::ActiveModel {
        id: Set(event.id),
        title: Set(d.title.clone()),
        starts_at: Set(event.starts_at),
        location: Set(d.location.clone()),
        latitude: Set(d.latitude),
        longitude: Set(d.longitude),
        host: Set(d.host.clone()),
        creator_id: Set(d.creator_id),
        category: Set(d.category.clone()),
        city: Set(d.city.clone()),
        province: Set(d.province.clone()),
        country: Set(d.country.clone()),
        capacity: Set(d.capacity),
        active: Set(event.active),
        is_free: Set(d.is_free),
        price: Set(d.price),
        created_at: Set(event.created_at),
    }
}

fn event_from_model(model: events::Model) -> Event {
    Event {
        id: model.id,
        details: EventDetails {
            title: model.title,
            location: model.location,
            latitude: model.latitude,
            longitude: model.longitude,
            host: model.host,
            creator_id: model.creator_id,
            category: model.category,
            city: model.city,
            province: model.province,
            country: model.country,
            capacity: model.capacity,
            is_free: model.is_free,
            price: model.price,
        },
        starts_at: model.starts_at,
        active: model.active,
        created_at: model.created_at,
    }
}

fn summary_from_row(row: EventSummaryRow) -> EventSummary {
    EventSummary {
        event: Event {
            id: row.id,
            details: EventDetails {
                title: row.title,
                location: row.location,
                latitude: row.latitude,
                longitude: row.longitude,
                host: row.host,
                creator_id: row.creator_id,
                category: row.category,
                city: row.city,
                province: row.province,
                country: row.country,
                capacity: row.capacity,
                is_free: row.is_free,
                price: row.price,
            },
            starts_at: row.starts_at,
            active: row.active,
            created_at: row.created_at,
        },
        average_rating: row.average_rating.map(round_rating),
        comment_count: row.comment_count.max(0) as u64,
        current_participants: row.current_participants.max(0) as u64,
        is_favorite: row.is_favorite,
    }
}

// ── Comment repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCommentRepository {
    pub db: DatabaseConnection,
}

impl CommentRepository for DbCommentRepository {
    async fn create(&self, comment: &Comment) -> Result<(), ApiError> {
        comments::ActiveModel {
            id: Set(comment.id),
            event_id: Set(comment.event_id),
            user_id: Set(comment.user_id),
            body: Set(comment.body.clone()),
            rating: Set(i16::from(comment.rating)),
            created_at: Set(comment.created_at),
        }
        .insert(&self.db)
        .await
        .context("create comment")?;
        Ok(())
    }

    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Comment>, ApiError> {
        let rows = comments::Entity::find()
            .filter(comments::Column::EventId.eq(event_id))
            .order_by_desc(comments::Column::CreatedAt)
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .context("list comments by event")?;
        Ok(rows
            .into_iter()
            .map(|(model, user)| Comment {
                id: model.id,
                event_id: model.event_id,
                user_id: model.user_id,
                user_name: display_name(user.as_ref()),
                body: model.body,
                rating: u8::try_from(model.rating).unwrap_or_default(),
                created_at: model.created_at,
            })
            .collect())
    }
}

fn display_name(user: Option<&users::Model>) -> String {
    user.map(|u| format!("{} {}", u.first_name, u.last_name))
        .unwrap_or_default()
}

// ── Participant repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbParticipantRepository {
    pub db: DatabaseConnection,
}

impl ParticipantRepository for DbParticipantRepository {
    async fn create(&self, participant: &Participant, capacity: u64) -> Result<(), ApiError> {
        let txn = self.db.begin().await.context("begin participant registration")?;

        // Row lock on the event serializes concurrent registrations for it.
        events::Entity::find_by_id(participant.event_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .context("lock event")?
            .ok_or(ApiError::EventNotFound)?;

        if capacity > 0 {
            let taken = event_participants::Entity::find()
                .filter(event_participants::Column::EventId.eq(participant.event_id))
                .count(&txn)
                .await
                .context("count participants")?;
            if taken >= capacity {
                return Err(ApiError::EventFull);
            }
        }

        let result = event_participants::ActiveModel {
            id: Set(participant.id),
            event_id: Set(participant.event_id),
            user_id: Set(participant.user_id),
            attended: Set(participant.attended),
            registered_at: Set(participant.registered_at),
        }
        .insert(&txn)
        .await;
        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(ApiError::AlreadyParticipating),
            Err(e) => return Err(anyhow::Error::new(e).context("create participant").into()),
        }

        txn.commit().await.context("commit participant registration")?;
        Ok(())
    }

    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Participant>, ApiError> {
        let rows = event_participants::Entity::find()
            .filter(event_participants::Column::EventId.eq(event_id))
            .order_by_asc(event_participants::Column::RegisteredAt)
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .context("list participants by event")?;
        Ok(rows
            .into_iter()
            .map(|(model, user)| Participant {
                id: model.id,
                event_id: model.event_id,
                user_id: model.user_id,
                user_name: display_name(user.as_ref()),
                attended: model.attended,
                registered_at: model.registered_at,
            })
            .collect())
    }
}

// ── Favorite repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFavoriteRepository {
    pub db: DatabaseConnection,
}

impl FavoriteRepository for DbFavoriteRepository {
    async fn create(&self, user_id: Uuid, event_id: Uuid) -> Result<(), ApiError> {
        let result = user_favorites::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            event_id: Set(event_id),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(ApiError::AlreadyFavorite),
            Err(e) => Err(anyhow::Error::new(e).context("create favorite").into()),
        }
    }

    async fn delete(&self, user_id: Uuid, event_id: Uuid) -> Result<bool, ApiError> {
        let result = user_favorites::Entity::delete_many()
            .filter(user_favorites::Column::UserId.eq(user_id))
            .filter(user_favorites::Column::EventId.eq(event_id))
            .exec(&self.db)
            .await
            .context("delete favorite")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_events(&self, user_id: Uuid) -> Result<Vec<Event>, ApiError> {
        let models = events::Entity::find()
            .join(JoinType::InnerJoin, events::Relation::UserFavorites.def())
            .filter(user_favorites::Column::UserId.eq(user_id))
            .order_by_desc(user_favorites::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list favorite events")?;
        Ok(models.into_iter().map(event_from_model).collect())
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<u64, ApiError> {
        let count = user_favorites::Entity::find()
            .filter(user_favorites::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .context("count favorites")?;
        Ok(count)
    }
}

// ── Notification repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbNotificationRepository {
    pub db: DatabaseConnection,
}

impl NotificationRepository for DbNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<(), ApiError> {
        notifications::ActiveModel {
            id: Set(notification.id),
            user_id: Set(notification.user_id),
            title: Set(notification.title.clone()),
            message: Set(notification.message.clone()),
            kind: Set(notification.kind.clone()),
            read: Set(notification.read),
            created_at: Set(notification.created_at),
        }
        .insert(&self.db)
        .await
        .context("create notification")?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, ApiError> {
        let models = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list notifications")?;
        Ok(models
            .into_iter()
            .map(|model| Notification {
                id: model.id,
                user_id: model.user_id,
                title: model.title,
                message: model.message,
                kind: model.kind,
                read: model.read,
                created_at: model.created_at,
            })
            .collect())
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool, ApiError> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::Read, Expr::value(true))
            .filter(notifications::Column::Id.eq(id))
            .filter(notifications::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("mark notification read")?;
        Ok(result.rows_affected > 0)
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<u64, ApiError> {
        let count = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .context("count notifications")?;
        Ok(count)
    }
}
