use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Companies that sign contracts, named in both English and Arabic.
#[derive(DeriveIden)]
enum Parties {
    Table,
    Id,
    NameEn,
    NameAr,
    Crn,
    AddressEn,
    AddressAr,
    ContactPerson,
    ContactEmail,
    ContactPhone,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Parties::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Parties::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Parties::NameEn).string().not_null())
                    .col(ColumnDef::new(Parties::NameAr).string().not_null())
                    .col(ColumnDef::new(Parties::Crn).string().not_null())
                    .col(ColumnDef::new(Parties::AddressEn).text().null())
                    .col(ColumnDef::new(Parties::AddressAr).text().null())
                    .col(ColumnDef::new(Parties::ContactPerson).string().null())
                    .col(ColumnDef::new(Parties::ContactEmail).string().null())
                    .col(ColumnDef::new(Parties::ContactPhone).string().null())
                    .col(
                        ColumnDef::new(Parties::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Parties::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Parties::Table).to_owned())
            .await
    }
}
