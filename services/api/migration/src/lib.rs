use sea_orm_migration::prelude::*;

mod m20260901_000001_create_users;
mod m20260901_000002_create_pending_registrations;
mod m20260901_000003_create_events;
mod m20260901_000004_create_comments;
mod m20260901_000005_create_event_participants;
mod m20260901_000006_create_user_favorites;
mod m20260901_000007_create_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_create_users::Migration),
            Box::new(m20260901_000002_create_pending_registrations::Migration),
            Box::new(m20260901_000003_create_events::Migration),
            Box::new(m20260901_000004_create_comments::Migration),
            Box::new(m20260901_000005_create_event_participants::Migration),
            Box::new(m20260901_000006_create_user_favorites::Migration),
            Box::new(m20260901_000007_create_notifications::Migration),
        ]
    }
}
