use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::lifecycle::{self, TargetState};
use super::payload::AutomationPayload;
use super::{GenerationError, StateChange, change_state};
use crate::automation::ChannelNotifier;
use crate::db::contracts as contract_db;
use crate::db::parties as party_db;
use crate::db::promoters as promoter_db;
use crate::models::contracts::{Model, Status};
use crate::realtime::RealtimeHub;

/// How the automation service identifies a contract. Scenarios have sent either
/// field (and occasionally both); the number wins when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractRef {
    pub contract_number: Option<String>,
    pub contract_id: Option<String>,
}

/// Body of `PATCH /api/webhook/automation`. Every field arrives loosely typed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackRequest {
    #[serde(flatten)]
    pub contract: ContractRef,
    pub status: Option<String>,
    pub pdf_url: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallbackResponse {
    pub success: bool,
    pub contract_number: String,
    pub status: Status,
    pub pdf_url: Option<String>,
}

impl From<&Model> for CallbackResponse {
    fn from(c: &Model) -> Self {
        Self {
            success: true,
            contract_number: c.contract_number.clone(),
            status: c.status,
            pdf_url: c.pdf_url.clone(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve a loosely-typed reference to an existing contract.
pub async fn find_contract(
    db: &DatabaseConnection,
    reference: &ContractRef,
) -> Result<Model, GenerationError> {
    if let Some(number) = non_blank(reference.contract_number.as_deref()) {
        return contract_db::get_contract_by_number(db, number)
            .await?
            .ok_or_else(|| GenerationError::NotFound(number.to_string()));
    }

    if let Some(raw_id) = non_blank(reference.contract_id.as_deref()) {
        let id = Uuid::parse_str(raw_id)
            .map_err(|_| GenerationError::BadRequest(format!("'{raw_id}' is not a contract id")))?;
        return contract_db::get_contract_by_id(db, id)
            .await?
            .ok_or_else(|| GenerationError::NotFound(raw_id.to_string()));
    }

    Err(GenerationError::BadRequest(
        "contract_number or contract_id is required".to_string(),
    ))
}

/// First leg of the callback: the automation service asks for the data to
/// render. A contract that has not started yet moves to `processing`.
pub async fn prepare_payload(
    db: &DatabaseConnection,
    hub: &RealtimeHub,
    reference: &ContractRef,
) -> Result<AutomationPayload, GenerationError> {
    let mut contract = find_contract(db, reference).await?;

    if matches!(contract.status, Status::Pending | Status::Queued) {
        let change = change_state(db, hub, contract, TargetState::processing(), None).await?;
        contract = change.contract;
    }

    let first_party = party_db::get_party_by_id(db, contract.first_party_id).await?;
    let second_party = party_db::get_party_by_id(db, contract.second_party_id).await?;
    let promoter = match contract.promoter_id {
        Some(id) => promoter_db::get_promoter_by_id(db, id).await?,
        None => None,
    };

    Ok(AutomationPayload::build(
        &contract,
        first_party.as_ref(),
        second_party.as_ref(),
        promoter.as_ref(),
    ))
}

/// Final leg: persist the outcome the automation service reports.
///
/// The channel notifier only fires when the state actually changed, so a
/// replayed callback does not announce the same contract twice.
pub async fn apply_callback(
    db: &DatabaseConnection,
    hub: &RealtimeHub,
    notifier: &ChannelNotifier,
    request: &CallbackRequest,
) -> Result<StateChange, GenerationError> {
    let contract = find_contract(db, &request.contract).await?;

    let status = non_blank(request.status.as_deref())
        .map(str::parse::<Status>)
        .transpose()
        .map_err(GenerationError::BadRequest)?;

    let target = TargetState::from_callback(
        status,
        request.pdf_url.as_deref(),
        request.error_message.as_deref(),
    )?;

    let change = change_state(db, hub, contract, target, None).await?;

    if change.applied {
        info!(
            contract_number = %change.contract.contract_number,
            status = %change.contract.status,
            "Automation callback applied"
        );
        if lifecycle::is_terminal(change.contract.status) {
            notifier.contract_finished(&change.contract).await;
        }
    } else {
        info!(
            contract_number = %change.contract.contract_number,
            "Automation callback replayed, nothing to change"
        );
    }

    Ok(change)
}
