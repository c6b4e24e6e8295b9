use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Applications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Applications::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Applications::ApplicationNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Applications::FirstName).string().not_null())
                    .col(ColumnDef::new(Applications::Surname).string().not_null())
                    .col(ColumnDef::new(Applications::Gender).string().not_null())
                    .col(ColumnDef::new(Applications::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(Applications::Email).string().not_null())
                    .col(ColumnDef::new(Applications::Telephone).string().not_null())
                    .col(ColumnDef::new(Applications::Nationality).string().not_null())
                    .col(ColumnDef::new(Applications::Address).text().not_null())
                    .col(ColumnDef::new(Applications::GpsAddress).string())
                    .col(ColumnDef::new(Applications::GuardianName).string().not_null())
                    .col(
                        ColumnDef::new(Applications::GuardianOccupation)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Applications::GuardianTelephone)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Applications::HighestEducation)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Applications::YearCompleted)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Applications::ProgramType).string().not_null())
                    .col(
                        ColumnDef::new(Applications::SpecificProgram)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Applications::Status)
                            .string()
                            .not_null()
                            .default("DRAFT"),
                    )
                    .col(ColumnDef::new(Applications::SubmittedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Applications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Applications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Applications::Table, Applications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Applications::Table)
                    .col(Applications::UserId)
                    .name("idx_applications_user_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Applications::Table)
                    .col(Applications::Status)
                    .col(Applications::CreatedAt)
                    .name("idx_applications_status_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Applications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Applications {
    Table,
    Id,
    UserId,
    ApplicationNumber,
    FirstName,
    Surname,
    Gender,
    DateOfBirth,
    Email,
    Telephone,
    Nationality,
    Address,
    GpsAddress,
    GuardianName,
    GuardianOccupation,
    GuardianTelephone,
    HighestEducation,
    YearCompleted,
    ProgramType,
    SpecificProgram,
    Status,
    SubmittedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
