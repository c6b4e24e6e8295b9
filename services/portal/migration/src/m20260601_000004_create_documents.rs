use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Documents::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Documents::ApplicationId).uuid().not_null())
                    .col(ColumnDef::new(Documents::DocumentType).string().not_null())
                    .col(ColumnDef::new(Documents::FileName).string().not_null())
                    .col(ColumnDef::new(Documents::OriginalName).string().not_null())
                    .col(ColumnDef::new(Documents::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(Documents::MimeType).string().not_null())
                    .col(ColumnDef::new(Documents::FileUrl).string().not_null())
                    .col(
                        ColumnDef::new(Documents::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Documents::Table, Documents::ApplicationId)
                            .to(Applications::Table, Applications::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Documents::Table)
                    .col(Documents::ApplicationId)
                    .col(Documents::UploadedAt)
                    .name("idx_documents_application_id_uploaded_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Documents {
    Table,
    Id,
    ApplicationId,
    DocumentType,
    FileName,
    OriginalName,
    FileSize,
    MimeType,
    FileUrl,
    UploadedAt,
}

#[derive(Iden)]
enum Applications {
    Table,
    Id,
}
