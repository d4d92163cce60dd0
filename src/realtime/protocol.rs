use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::contracts;

/// Row-level change pushed to realtime subscribers.
///
/// This is also what a client-side `ContractStore` consumes, hence `Deserialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContractEvent {
    /// A contract row was created.
    Inserted { contract: contracts::Model },
    /// A contract row changed (status, pdf_url, error_message).
    Updated { contract: contracts::Model },
    /// A contract disappeared from the caller's view.
    ///
    /// Contracts are never hard-deleted, so this server does not publish it.
    /// It exists for `ContractStore` consumers fed by a feed that does delete
    /// rows, and for clients dropping a row locally.
    Removed { id: Uuid },
}

impl ContractEvent {
    pub fn contract_id(&self) -> Uuid {
        match self {
            ContractEvent::Inserted { contract } | ContractEvent::Updated { contract } => {
                contract.id
            }
            ContractEvent::Removed { id } => *id,
        }
    }
}
