use sea_orm::entity::prelude::*;

/// Staged registration awaiting its one-time code. At most one row per email;
/// a new code request replaces the old row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pending_registrations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub phone_number: String,
    pub code: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    /// Candidate profile (password already hashed). `None` when an unverified
    /// user row already exists for the email.
    pub profile: Option<Json>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
