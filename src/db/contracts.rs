use sea_orm::*;
use uuid::Uuid;

use crate::generation::lifecycle::TargetState;
use crate::models::contracts::{self, CreateContract, Status};

const NUMBER_ATTEMPTS: usize = 3;

/// `CNT-YYYYMMDD-XXXXXX` with six random upper-case hex characters.
pub fn generate_contract_number(today: chrono::NaiveDate) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("CNT-{}-{suffix}", today.format("%Y%m%d"))
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Insert a new contract with a freshly generated, unique contract number.
///
/// Concurrent submissions may draw the same number; the unique index rejects the
/// loser, which retries with a new number.
pub async fn insert_contract(
    db: &DatabaseConnection,
    input: CreateContract,
    status: Status,
    created_by: Option<Uuid>,
) -> Result<contracts::Model, DbErr> {
    insert_contract_with(db, input, status, created_by, generate_contract_number).await
}

/// [`insert_contract`] with the number source supplied by the caller.
pub async fn insert_contract_with(
    db: &DatabaseConnection,
    input: CreateContract,
    status: Status,
    created_by: Option<Uuid>,
    mut next_number: impl FnMut(chrono::NaiveDate) -> String,
) -> Result<contracts::Model, DbErr> {
    let mut last_err = None;

    for _ in 0..NUMBER_ATTEMPTS {
        let now = chrono::Utc::now();
        let new_contract = contracts::ActiveModel {
            id: Set(Uuid::new_v4()),
            contract_number: Set(next_number(now.date_naive())),
            first_party_id: Set(input.first_party_id),
            second_party_id: Set(input.second_party_id),
            promoter_id: Set(input.promoter_id),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            email: Set(input.email.trim().to_string()),
            job_title: Set(input.job_title.clone()),
            work_location: Set(input.work_location.clone()),
            status: Set(status),
            pdf_url: Set(None),
            error_message: Set(None),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match new_contract.insert(db).await {
            Ok(model) => return Ok(model),
            Err(e) if is_unique_violation(&e) => {
                tracing::warn!("Contract number collision, retrying: {e}");
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_err.unwrap_or_else(|| DbErr::Custom("could not allocate contract number".into())))
}

/// Fetch contracts, newest first, optionally filtered by status.
pub async fn get_contracts(
    db: &DatabaseConnection,
    status: Option<Status>,
    page: u64,
    limit: u64,
) -> Result<Vec<contracts::Model>, DbErr> {
    let mut query = contracts::Entity::find();
    if let Some(status) = status {
        query = query.filter(contracts::Column::Status.eq(status));
    }

    query
        .order_by_desc(contracts::Column::CreatedAt)
        .paginate(db, limit)
        .fetch_page(page.saturating_sub(1))
        .await
}

/// Fetch a single contract by ID.
pub async fn get_contract_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<contracts::Model>, DbErr> {
    contracts::Entity::find_by_id(id).one(db).await
}

/// Fetch a single contract by its human-facing number.
pub async fn get_contract_by_number(
    db: &DatabaseConnection,
    contract_number: &str,
) -> Result<Option<contracts::Model>, DbErr> {
    contracts::Entity::find()
        .filter(contracts::Column::ContractNumber.eq(contract_number.trim()))
        .one(db)
        .await
}

/// Move a contract to `target`, but only if the row is still in the status the
/// caller checked against (`contract.status`).
///
/// Returns `None` when another request changed the row first; the caller should
/// re-read and re-check.
pub async fn transition_state(
    db: &DatabaseConnection,
    contract: &contracts::Model,
    target: TargetState,
) -> Result<Option<contracts::Model>, DbErr> {
    let result = contracts::Entity::update_many()
        .set(contracts::ActiveModel {
            status: Set(target.status),
            pdf_url: Set(target.pdf_url),
            error_message: Set(target.error_message),
            updated_at: Set(chrono::Utc::now()),
            ..Default::default()
        })
        .filter(contracts::Column::Id.eq(contract.id))
        .filter(contracts::Column::Status.eq(contract.status))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Ok(None);
    }

    get_contract_by_id(db, contract.id).await
}

/// Number of contracts currently in `status`.
pub async fn count_by_status(db: &DatabaseConnection, status: Status) -> Result<u64, DbErr> {
    contracts::Entity::find()
        .filter(contracts::Column::Status.eq(status))
        .count(db)
        .await
}
