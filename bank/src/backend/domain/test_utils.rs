//! Shared fixture for service tests.
//!
//! Every service is built over the same in-memory store and a manual clock,
//! so a test can drive time forward and inspect state from any angle.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use super::clock::{Clock, ManualClock};
use super::identity_service::IdentityService;
use super::ledger_service::{AccountDefaults, LedgerService};
use super::models::{level_for, ChildProfile, Transaction};
use super::proof_service::ProofService;
use super::session_service::SessionService;
use super::settings_service::SettingsService;
use super::task_service::TaskService;
use super::transaction_service::TransactionLogService;
use crate::backend::storage::{InMemoryKeyValueStore, StateStore};

pub fn test_start() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

pub struct TestBank {
    pub store: Arc<StateStore>,
    pub clock: ManualClock,
    pub kv: InMemoryKeyValueStore,
}

impl TestBank {
    /// Empty family: default parent, tasks and apps, no children
    pub fn new() -> Self {
        Self::build(false)
    }

    /// The two demo children with their opening transactions
    pub fn with_demo_data() -> Self {
        Self::build(true)
    }

    fn build(seed_demo_data: bool) -> Self {
        let kv = InMemoryKeyValueStore::new();
        let store = StateStore::load(Arc::new(kv.clone()), seed_demo_data, test_start()).unwrap();
        Self {
            store: Arc::new(store),
            clock: ManualClock::new(test_start()),
            kv,
        }
    }

    pub fn clock_arc(&self) -> Arc<dyn Clock> {
        Arc::new(self.clock.clone())
    }

    pub fn ledger(&self) -> LedgerService {
        LedgerService::new(self.store.clone(), self.clock_arc(), AccountDefaults::default())
    }

    pub fn transactions(&self) -> TransactionLogService {
        TransactionLogService::new(self.store.clone())
    }

    pub fn proofs(&self) -> ProofService {
        ProofService::new(self.store.clone(), self.clock_arc())
    }

    pub fn tasks(&self) -> TaskService {
        TaskService::new(self.store.clone(), self.clock_arc())
    }

    pub fn sessions(&self) -> SessionService {
        SessionService::new(self.store.clone(), self.clock_arc())
    }

    pub fn identity(&self) -> IdentityService {
        IdentityService::new(self.store.clone())
    }

    pub fn settings(&self) -> SettingsService {
        SettingsService::new(self.store.clone())
    }

    /// Insert a child whose balance and lifetime earnings both start at `balance`
    pub fn add_child(&self, name: &str, balance: u32) -> ChildProfile {
        let id = format!("child::{}", name.to_lowercase());
        let mut child = ChildProfile::new(id, name.to_string(), String::new(), "1234".to_string(), 30);
        child.balance = balance;
        child.total_earned = balance;
        child.level = level_for(balance);
        self.store.mutate(|state| state.children.push(child.clone())).unwrap();
        child
    }

    pub fn child(&self, child_id: &str) -> ChildProfile {
        self.store.read(|state| state.child(child_id).cloned()).unwrap().unwrap()
    }

    pub fn transactions_for(&self, account_id: &str) -> Vec<Transaction> {
        self.store
            .read(|state| state.transactions.for_account_ascending(account_id))
            .unwrap()
    }
}
