use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::lifecycle::TargetState;
use super::validation::{self, FieldErrors};
use super::{GenerationError, notify};
use crate::automation::{AutomationClient, AutomationReply};
use crate::db::audit_logs as audit_db;
use crate::db::contracts as contract_db;
use crate::db::parties as party_db;
use crate::db::promoters as promoter_db;
use crate::models::audit_logs::CreateAuditLog;
use crate::models::contracts::{CreateContract, Model, Status};
use crate::models::notifications::Kind;
use crate::realtime::{ContractEvent, RealtimeHub};

/// Field errors for references that do not resolve to existing rows.
async fn check_references(
    db: &DatabaseConnection,
    input: &CreateContract,
) -> Result<(), GenerationError> {
    let mut errors = FieldErrors::new();

    if party_db::get_party_by_id(db, input.first_party_id)
        .await?
        .is_none()
    {
        errors.add("first_party_id", "First party does not exist");
    }
    if party_db::get_party_by_id(db, input.second_party_id)
        .await?
        .is_none()
    {
        errors.add("second_party_id", "Second party does not exist");
    }
    if let Some(promoter_id) = input.promoter_id {
        if promoter_db::get_promoter_by_id(db, promoter_id)
            .await?
            .is_none()
        {
            errors.add("promoter_id", "Promoter does not exist");
        }
    }

    errors.into_result().map_err(GenerationError::Validation)
}

/// Validate, persist and hand a new contract to the automation service.
///
/// Integration failures never surface as errors here: the contract is kept and
/// moved to `failed` with the reason in `error_message`. Only validation and
/// database errors are returned to the caller.
pub async fn submit_contract(
    db: &DatabaseConnection,
    automation: &AutomationClient,
    hub: &RealtimeHub,
    user_id: Option<Uuid>,
    input: CreateContract,
) -> Result<Model, GenerationError> {
    validation::validate_contract(&input).map_err(GenerationError::Validation)?;
    check_references(db, &input).await?;

    let initial = if automation.is_configured() {
        Status::Queued
    } else {
        Status::Pending
    };

    let contract = contract_db::insert_contract(db, input, initial, user_id).await?;
    info!(
        contract_number = %contract.contract_number,
        status = %contract.status,
        "Contract created"
    );

    let audit = CreateAuditLog {
        user_id,
        action: "contract.created",
        entity_type: "contract",
        entity_id: contract.id,
        details: Some(serde_json::json!({ "contract_number": contract.contract_number })),
    };
    if let Err(e) = audit_db::insert_audit_log(db, audit).await {
        warn!(contract_number = %contract.contract_number, "Failed to write audit log: {e}");
    }
    notify(
        db,
        &contract,
        Kind::Info,
        format!("Contract {} submitted for generation", contract.contract_number),
    )
    .await;
    hub.publish(ContractEvent::Inserted {
        contract: contract.clone(),
    })
    .await;

    if !automation.is_configured() {
        warn!(
            contract_number = %contract.contract_number,
            "Automation webhook not configured, contract left pending"
        );
        return Ok(contract);
    }

    match automation.trigger(&contract).await {
        Ok(AutomationReply::Json(body)) => {
            info!(contract_number = %contract.contract_number, %body, "Automation accepted contract");
            Ok(contract)
        }
        Ok(AutomationReply::Text(body)) => {
            info!(contract_number = %contract.contract_number, %body, "Automation accepted contract");
            Ok(contract)
        }
        Err(e) => {
            error!(contract_number = %contract.contract_number, "Automation trigger failed: {e}");
            let id = contract.id;
            match super::change_state(db, hub, contract, TargetState::failed(e.to_string()), user_id)
                .await
            {
                Ok(change) => Ok(change.contract),
                // The automation service already moved the row on (typically a
                // callback that landed while the trigger was still waiting).
                Err(GenerationError::Transition(conflict)) => {
                    info!(%id, "Trigger failure not recorded: {conflict}");
                    contract_db::get_contract_by_id(db, id)
                        .await?
                        .ok_or_else(|| GenerationError::NotFound(id.to_string()))
                }
                Err(other) => Err(other),
            }
        }
    }
}
