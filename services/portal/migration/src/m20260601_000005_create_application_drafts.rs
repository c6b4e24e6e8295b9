use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApplicationDrafts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApplicationDrafts::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ApplicationDrafts::Sections)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApplicationDrafts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ApplicationDrafts::Table, ApplicationDrafts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApplicationDrafts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ApplicationDrafts {
    Table,
    UserId,
    Sections,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
