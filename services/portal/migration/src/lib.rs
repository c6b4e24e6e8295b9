use sea_orm_migration::prelude::*;

mod m20260601_000001_create_users;
mod m20260601_000002_create_otp_codes;
mod m20260601_000003_create_applications;
mod m20260601_000004_create_documents;
mod m20260601_000005_create_application_drafts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260601_000001_create_users::Migration),
            Box::new(m20260601_000002_create_otp_codes::Migration),
            Box::new(m20260601_000003_create_applications::Migration),
            Box::new(m20260601_000004_create_documents::Migration),
            Box::new(m20260601_000005_create_application_drafts::Migration),
        ]
    }
}
