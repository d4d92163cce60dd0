use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `contracts` table and its columns.
#[derive(DeriveIden)]
enum Contracts {
    Table,
    Id,
    ContractNumber,
    FirstPartyId,
    SecondPartyId,
    PromoterId,
    StartDate,
    EndDate,
    Email,
    JobTitle,
    WorkLocation,
    Status,
    PdfUrl,
    ErrorMessage,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Parties {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Promoters {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contracts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contracts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // Collisions on insert are retried with a fresh suffix.
                    .col(
                        ColumnDef::new(Contracts::ContractNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Contracts::FirstPartyId).uuid().not_null())
                    .col(ColumnDef::new(Contracts::SecondPartyId).uuid().not_null())
                    .col(ColumnDef::new(Contracts::PromoterId).uuid().null())
                    .col(ColumnDef::new(Contracts::StartDate).date().not_null())
                    .col(ColumnDef::new(Contracts::EndDate).date().not_null())
                    .col(ColumnDef::new(Contracts::Email).string().not_null())
                    .col(ColumnDef::new(Contracts::JobTitle).string().null())
                    .col(ColumnDef::new(Contracts::WorkLocation).string().null())
                    .col(
                        ColumnDef::new(Contracts::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Contracts::PdfUrl).text().null())
                    .col(ColumnDef::new(Contracts::ErrorMessage).text().null())
                    .col(ColumnDef::new(Contracts::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(Contracts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contracts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_first_party_id")
                            .from(Contracts::Table, Contracts::FirstPartyId)
                            .to(Parties::Table, Parties::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_second_party_id")
                            .from(Contracts::Table, Contracts::SecondPartyId)
                            .to(Parties::Table, Parties::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_promoter_id")
                            .from(Contracts::Table, Contracts::PromoterId)
                            .to(Promoters::Table, Promoters::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contracts::Table).to_owned())
            .await
    }
}
