use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Promoters {
    Table,
    Id,
    NameEn,
    NameAr,
    IdCardNumber,
    PassportNumber,
    IdCardUrl,
    PassportUrl,
    IdCardExpiryDate,
    PassportExpiryDate,
    NotifyDaysBeforeIdExpiry,
    NotifyDaysBeforePassportExpiry,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Promoters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Promoters::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Promoters::NameEn).string().not_null())
                    .col(ColumnDef::new(Promoters::NameAr).string().not_null())
                    .col(ColumnDef::new(Promoters::IdCardNumber).string().not_null())
                    .col(ColumnDef::new(Promoters::PassportNumber).string().null())
                    // Document scans; NULL when never uploaded.
                    .col(ColumnDef::new(Promoters::IdCardUrl).text().null())
                    .col(ColumnDef::new(Promoters::PassportUrl).text().null())
                    .col(ColumnDef::new(Promoters::IdCardExpiryDate).date().null())
                    .col(ColumnDef::new(Promoters::PassportExpiryDate).date().null())
                    .col(
                        ColumnDef::new(Promoters::NotifyDaysBeforeIdExpiry)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(
                        ColumnDef::new(Promoters::NotifyDaysBeforePassportExpiry)
                            .integer()
                            .not_null()
                            .default(90),
                    )
                    .col(
                        ColumnDef::new(Promoters::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Promoters::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Promoters::Table).to_owned())
            .await
    }
}
