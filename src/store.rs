//! In-memory mirror of the contract list for one session.
//!
//! The store is fed by an initial fetch and then by realtime events. Events are
//! applied in delivery order, last write wins, and an event for a contract the
//! store has never seen is simply inserted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::models::contracts::{Model, Status};
use crate::realtime::ContractEvent;

/// How a contract is matched when applying an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractKey {
    Id(Uuid),
    Number(String),
}

impl ContractKey {
    fn matches(&self, contract: &Model) -> bool {
        match self {
            ContractKey::Id(id) => contract.id == *id,
            ContractKey::Number(number) => contract.contract_number == *number,
        }
    }
}

/// Contract counts per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStatistics {
    pub total: u64,
    pub pending: u64,
    pub queued: u64,
    pub processing: u64,
    pub completed: u64,
    pub failed: u64,
}

impl ContractStatistics {
    pub fn record(&mut self, status: Status, count: u64) {
        self.total += count;
        match status {
            Status::Pending => self.pending += count,
            Status::Queued => self.queued += count,
            Status::Processing => self.processing += count,
            Status::Completed => self.completed += count,
            Status::Failed => self.failed += count,
        }
    }

    pub fn from_contracts<'a>(contracts: impl IntoIterator<Item = &'a Model>) -> Self {
        let mut stats = Self::default();
        for c in contracts {
            stats.record(c.status, 1);
        }
        stats
    }
}

#[derive(Debug, Default)]
pub struct ContractStore {
    contracts: Vec<Model>,
    loading: bool,
    error: Option<String>,
}

impl ContractStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contracts(&self) -> &[Model] {
        &self.contracts
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn get(&self, key: &ContractKey) -> Option<&Model> {
        self.contracts.iter().find(|c| key.matches(c))
    }

    /// Replace the list with a fresh fetch. On failure the previous list is kept
    /// and `error` is set; there is no retry.
    pub async fn fetch_all(&mut self, api: &ApiClient) {
        self.loading = true;
        match api.list_contracts().await {
            Ok(contracts) => {
                self.contracts = contracts;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("Failed to fetch contracts: {e}");
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// Add a contract at the front of the list, or replace it if already present.
    pub fn add(&mut self, contract: Model) {
        let key = ContractKey::Id(contract.id);
        if !self.update_by_key(&key, contract.clone()) {
            self.contracts.insert(0, contract);
        }
    }

    /// Replace the contract matching `key`. Returns false when nothing matched.
    pub fn update_by_key(&mut self, key: &ContractKey, contract: Model) -> bool {
        match self.contracts.iter_mut().find(|c| key.matches(c)) {
            Some(slot) => {
                *slot = contract;
                true
            }
            None => false,
        }
    }

    /// Returns the removed contract, if it was present.
    pub fn remove_by_id(&mut self, id: Uuid) -> Option<Model> {
        let pos = self.contracts.iter().position(|c| c.id == id)?;
        Some(self.contracts.remove(pos))
    }

    /// Apply a realtime change. Matches by id first, then by contract number,
    /// and inserts when neither matches.
    pub fn apply(&mut self, event: ContractEvent) {
        match event {
            ContractEvent::Inserted { contract } | ContractEvent::Updated { contract } => {
                if self.update_by_key(&ContractKey::Id(contract.id), contract.clone()) {
                    return;
                }
                let by_number = ContractKey::Number(contract.contract_number.clone());
                if !self.update_by_key(&by_number, contract.clone()) {
                    self.contracts.insert(0, contract);
                }
            }
            ContractEvent::Removed { id } => {
                self.remove_by_id(id);
            }
        }
    }

    pub fn statistics(&self) -> ContractStatistics {
        ContractStatistics::from_contracts(&self.contracts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn contract(number: &str, status: Status) -> Model {
        Model {
            id: Uuid::new_v4(),
            contract_number: number.to_string(),
            first_party_id: Uuid::new_v4(),
            second_party_id: Uuid::new_v4(),
            promoter_id: None,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            email: "hr@example.com".to_string(),
            job_title: None,
            work_location: None,
            status,
            pdf_url: None,
            error_message: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn update_for_unknown_contract_is_upserted() {
        let mut store = ContractStore::new();
        let c = contract("CNT-1", Status::Processing);

        store.apply(ContractEvent::Updated {
            contract: c.clone(),
        });

        assert_eq!(store.contracts().len(), 1);
        assert_eq!(store.get(&ContractKey::Id(c.id)), Some(&c));
    }

    #[test]
    fn last_event_wins() {
        let mut store = ContractStore::new();
        let mut c = contract("CNT-1", Status::Queued);
        store.add(c.clone());

        c.status = Status::Completed;
        c.pdf_url = Some("https://cdn/c.pdf".to_string());
        store.apply(ContractEvent::Updated { contract: c.clone() });

        c.status = Status::Processing;
        c.pdf_url = None;
        store.apply(ContractEvent::Updated { contract: c.clone() });

        assert_eq!(store.contracts().len(), 1);
        assert_eq!(store.contracts()[0].status, Status::Processing);
    }

    #[test]
    fn matches_by_contract_number_when_id_differs() {
        let mut store = ContractStore::new();
        let original = contract("CNT-7", Status::Queued);
        store.add(original);

        let replacement = contract("CNT-7", Status::Failed);
        store.apply(ContractEvent::Updated {
            contract: replacement.clone(),
        });

        assert_eq!(store.contracts().len(), 1);
        assert_eq!(store.contracts()[0].id, replacement.id);
    }

    #[test]
    fn add_twice_does_not_duplicate() {
        let mut store = ContractStore::new();
        let c = contract("CNT-1", Status::Pending);
        store.add(c.clone());
        store.add(c);
        assert_eq!(store.contracts().len(), 1);
    }

    #[test]
    fn remove_and_statistics() {
        let mut store = ContractStore::new();
        let a = contract("CNT-1", Status::Queued);
        let b = contract("CNT-2", Status::Completed);
        let c = contract("CNT-3", Status::Completed);
        store.add(a.clone());
        store.add(b);
        store.add(c);

        let stats = store.statistics();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.queued, 1);

        store.apply(ContractEvent::Removed { id: a.id });
        assert!(store.remove_by_id(a.id).is_none());
        assert_eq!(store.statistics().queued, 0);
        assert_eq!(store.statistics().total, 2);
    }
}
