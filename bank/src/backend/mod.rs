//! # Backend Module
//!
//! Contains all non-UI logic for the screen-time bank.
//!
//! This module serves as the orchestration layer that brings together:
//! - **Domain**: ledger, proofs, tasks, session metering, identity
//! - **Storage**: write-through persistence of the state snapshot
//! - **IO**: the `TimeBankApi` facade the presentation layer calls
//!
//! ## Architecture
//!
//! ```text
//! UI Layer (any presentation framework)
//!     ↓
//! IO Layer (TimeBankApi, mappers)
//!     ↓
//! Domain Layer (services, session ticker)
//!     ↓
//! Storage Layer (StateStore over a KeyValueStore)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod logging;
pub mod storage;

use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::backend::config::BankConfig;
use crate::backend::domain::{
    AdvisoryClient, AdvisoryService, Clock, IdentityService, LedgerService, ProofService, SessionService,
    SessionTicker, SettingsService, SystemClock, TaskService, TransactionLogService, UnavailableAdvisoryClient,
};
use crate::backend::io::TimeBankApi;
use crate::backend::storage::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, StateStore};

/// Fully wired bank: services over one state store, exposed through the API
pub struct Backend {
    config: BankConfig,
    store: Arc<StateStore>,
    sessions: SessionService,
    api: TimeBankApi,
}

impl Backend {
    /// Bank persisted under `config.data_directory`, with no advisory model
    pub fn new(config: BankConfig) -> Result<Self> {
        info!("Setting up file storage at {:?}", config.data_directory);
        let kv = FileKeyValueStore::new(&config.data_directory)?;
        Self::with_components(config, Arc::new(kv), Arc::new(SystemClock), Arc::new(UnavailableAdvisoryClient))
    }

    /// Volatile bank for tests and demos
    pub fn in_memory(config: BankConfig) -> Result<Self> {
        Self::with_components(
            config,
            Arc::new(InMemoryKeyValueStore::new()),
            Arc::new(SystemClock),
            Arc::new(UnavailableAdvisoryClient),
        )
    }

    pub fn with_components(
        config: BankConfig,
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        advisory_client: Arc<dyn AdvisoryClient>,
    ) -> Result<Self> {
        config.validate()?;

        info!("Loading bank state");
        let store = Arc::new(StateStore::load(kv, config.seed_defaults, clock.now())?);

        info!("Setting up domain services");
        let identity = IdentityService::new(store.clone());
        let ledger = LedgerService::new(store.clone(), clock.clone(), config.account_defaults());
        let transactions = TransactionLogService::new(store.clone());
        let proofs = ProofService::new(store.clone(), clock.clone());
        let tasks = TaskService::new(store.clone(), clock.clone());
        let sessions = SessionService::new(store.clone(), clock);
        let settings = SettingsService::new(store.clone());
        let advisory = AdvisoryService::new(advisory_client, config.advisory_timeout());

        let api = TimeBankApi::new(
            identity,
            ledger,
            transactions,
            proofs,
            tasks,
            sessions.clone(),
            settings,
            advisory,
        );

        Ok(Self { config, store, sessions, api })
    }

    pub fn api(&self) -> &TimeBankApi {
        &self.api
    }

    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Start metering sessions in the background. Needs a tokio runtime.
    pub fn start_ticker(&self) -> SessionTicker {
        SessionTicker::spawn(self.sessions.clone(), self.config.tick_interval())
    }
}
