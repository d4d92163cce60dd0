pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users_table;
mod m20260301_000002_create_parties_table;
mod m20260301_000003_create_promoters_table;
mod m20260301_000004_create_contracts_table;
mod m20260302_000001_create_notifications_table;
mod m20260302_000002_create_audit_logs_table;
mod m20260305_000001_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users_table::Migration),
            Box::new(m20260301_000002_create_parties_table::Migration),
            Box::new(m20260301_000003_create_promoters_table::Migration),
            Box::new(m20260301_000004_create_contracts_table::Migration),
            Box::new(m20260302_000001_create_notifications_table::Migration),
            Box::new(m20260302_000002_create_audit_logs_table::Migration),
            Box::new(m20260305_000001_add_indexes::Migration),
        ]
    }
}
