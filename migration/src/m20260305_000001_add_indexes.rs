use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Contracts {
    Table,
    Status,
    CreatedAt,
    FirstPartyId,
    SecondPartyId,
    PromoterId,
}

#[derive(DeriveIden)]
enum Parties {
    Table,
    Crn,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Dashboard counts and status-filtered lists
        manager
            .create_index(
                Index::create()
                    .name("idx_contracts_status")
                    .table(Contracts::Table)
                    .col(Contracts::Status)
                    .to_owned(),
            )
            .await?;

        // Newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_contracts_created_at")
                    .table(Contracts::Table)
                    .col(Contracts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contracts_first_party_id")
                    .table(Contracts::Table)
                    .col(Contracts::FirstPartyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contracts_second_party_id")
                    .table(Contracts::Table)
                    .col(Contracts::SecondPartyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contracts_promoter_id")
                    .table(Contracts::Table)
                    .col(Contracts::PromoterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parties_crn")
                    .table(Parties::Table)
                    .col(Parties::Crn)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_contracts_status",
            "idx_contracts_created_at",
            "idx_contracts_first_party_id",
            "idx_contracts_second_party_id",
            "idx_contracts_promoter_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Contracts::Table).to_owned())
                .await?;
        }

        manager
            .drop_index(
                Index::drop()
                    .name("idx_parties_crn")
                    .table(Parties::Table)
                    .to_owned(),
            )
            .await
    }
}
