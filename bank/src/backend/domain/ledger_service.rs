//! Account ledger: the only code allowed to change balances.
//!
//! Every credit and debit appends a transaction in the same critical section
//! that changes the balance, so the log and the accounts cannot drift apart
//! through a lost update. The free functions `credit_child` and
//! `debit_child` are shared with the proof workflow and session metering,
//! which call them from inside their own state mutations.

use chrono::{DateTime, Utc};
use log::{info, warn};
use std::sync::Arc;

use crate::backend::domain::clock::Clock;
use crate::backend::domain::commands::ledger::{CreateChildCommand, CreditCommand, DebitCommand, LedgerResult};
use crate::backend::domain::errors::BankError;
use crate::backend::domain::models::{BankState, ChildProfile, ParentProfile, Transaction};
use crate::backend::storage::StateStore;

pub const DEFAULT_REWARD_REASON: &str = "家長獎勵";
pub const DEFAULT_PENALTY_REASON: &str = "家長扣除/補登";

/// Values given to newly added children
#[derive(Debug, Clone)]
pub struct AccountDefaults {
    pub password: String,
    pub weekly_allowance: u32,
}

impl Default for AccountDefaults {
    fn default() -> Self {
        Self {
            password: "1234".to_string(),
            weekly_allowance: 30,
        }
    }
}

/// Credit a child inside an ongoing state mutation.
pub(crate) fn credit_child(
    state: &mut BankState,
    command: CreditCommand,
    now: DateTime<Utc>,
) -> Result<LedgerResult, BankError> {
    if command.amount == 0 {
        return Err(BankError::InvalidAmount);
    }
    let child = state
        .child_mut(&command.account_id)
        .ok_or_else(|| BankError::AccountNotFound(command.account_id.clone()))?;
    child.apply_credit(command.amount);
    let child = child.clone();

    let transaction = Transaction::earn(&command.account_id, command.amount, command.reason, command.category, now);
    state.transactions.append(transaction.clone());
    Ok(LedgerResult { transaction, child })
}

/// Debit a child inside an ongoing state mutation.
///
/// The balance clamps at zero but the transaction records the requested
/// amount, so the log can show more spending than the balance ever covered.
pub(crate) fn debit_child(
    state: &mut BankState,
    command: DebitCommand,
    now: DateTime<Utc>,
) -> Result<LedgerResult, BankError> {
    if command.amount == 0 {
        return Err(BankError::InvalidAmount);
    }
    let child = state
        .child_mut(&command.account_id)
        .ok_or_else(|| BankError::AccountNotFound(command.account_id.clone()))?;
    let removed = child.apply_debit(command.amount);
    if removed < command.amount {
        info!(
            "Debit of {} for {} clamped to {} (balance exhausted)",
            command.amount, command.account_id, removed
        );
    }
    let child = child.clone();

    let transaction = Transaction::spend(&command.account_id, command.amount, command.reason, now);
    state.transactions.append(transaction.clone());
    Ok(LedgerResult { transaction, child })
}

/// Service owning balances, lifetime earnings, levels and lock flags
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<StateStore>,
    clock: Arc<dyn Clock>,
    defaults: AccountDefaults,
}

impl LedgerService {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn Clock>, defaults: AccountDefaults) -> Self {
        Self { store, clock, defaults }
    }

    /// Add earned minutes; raises lifetime earnings and level too
    pub fn credit(&self, command: CreditCommand) -> Result<LedgerResult, BankError> {
        info!("Crediting {} minutes to {}: {}", command.amount, command.account_id, command.reason);
        let now = self.clock.now();
        let result = self.store.mutate(|state| credit_child(state, command, now))?;
        self.log_outcome("credit", &result);
        result
    }

    /// Remove minutes, clamping the balance at zero
    pub fn debit(&self, command: DebitCommand) -> Result<LedgerResult, BankError> {
        info!("Debiting {} minutes from {}: {}", command.amount, command.account_id, command.reason);
        let now = self.clock.now();
        let result = self.store.mutate(|state| debit_child(state, command, now))?;
        self.log_outcome("debit", &result);
        result
    }

    /// Parent-issued bonus, with the default reason when none is given
    pub fn reward(&self, child_id: &str, amount: u32, reason: Option<String>) -> Result<LedgerResult, BankError> {
        self.credit(CreditCommand {
            account_id: child_id.to_string(),
            amount,
            reason: non_empty_or(reason, DEFAULT_REWARD_REASON),
            category: None,
        })
    }

    /// Parent-issued deduction or after-the-fact usage entry
    pub fn penalize(&self, child_id: &str, amount: u32, reason: Option<String>) -> Result<LedgerResult, BankError> {
        self.debit(DebitCommand {
            account_id: child_id.to_string(),
            amount,
            reason: non_empty_or(reason, DEFAULT_PENALTY_REASON),
        })
    }

    /// Set the lock flag. Not a ledger event, so nothing is logged.
    pub fn set_locked(&self, child_id: &str, locked: bool) -> Result<ChildProfile, BankError> {
        info!("Setting lock for {} to {}", child_id, locked);
        let result = self.store.mutate(|state| {
            let child = state
                .child_mut(child_id)
                .ok_or_else(|| BankError::AccountNotFound(child_id.to_string()))?;
            child.is_locked = locked;
            Ok(child.clone())
        })?;
        self.warn_if_missing(&result);
        result
    }

    pub fn toggle_lock(&self, child_id: &str) -> Result<ChildProfile, BankError> {
        let result = self.store.mutate(|state| {
            let child = state
                .child_mut(child_id)
                .ok_or_else(|| BankError::AccountNotFound(child_id.to_string()))?;
            child.is_locked = !child.is_locked;
            Ok(child.clone())
        })?;
        self.warn_if_missing(&result);
        if let Ok(child) = &result {
            info!("Toggled lock for {}: now {}", child.id, child.is_locked);
        }
        result
    }

    /// Add a child with an empty ledger
    pub fn create_account(&self, command: CreateChildCommand) -> Result<ChildProfile, BankError> {
        if command.name.trim().is_empty() {
            return Err(BankError::EmptyName);
        }
        let now = self.clock.now();
        let id = ChildProfile::generate_id(now.timestamp_millis());
        let avatar = match command.avatar.filter(|a| !a.trim().is_empty()) {
            Some(avatar) => avatar,
            None => format!("https://picsum.photos/150/150?random={}", now.timestamp_millis()),
        };
        let child = ChildProfile::new(
            id,
            command.name.trim().to_string(),
            avatar,
            self.defaults.password.clone(),
            self.defaults.weekly_allowance,
        );

        let created = self.store.mutate(|state| {
            let mut child = child;
            // ids are millisecond based; two adds in one millisecond must not collide
            while state.account(&child.id).is_some() {
                child.id = format!("{}_", child.id);
            }
            state.children.push(child.clone());
            child
        })?;

        info!("Created child: {} with ID: {}", created.name, created.id);
        Ok(created)
    }

    /// Remove a child. Its transactions stay in the log.
    pub fn delete_account(&self, child_id: &str) -> Result<ChildProfile, BankError> {
        info!("Deleting child: {}", child_id);
        let result = self.store.mutate(|state| {
            let index = state
                .children
                .iter()
                .position(|c| c.id == child_id)
                .ok_or_else(|| BankError::AccountNotFound(child_id.to_string()))?;
            Ok(state.children.remove(index))
        })?;
        self.warn_if_missing(&result);
        if let Ok(child) = &result {
            info!("Deleted child: {} with ID: {}", child.name, child.id);
        }
        result
    }

    pub fn get_child(&self, child_id: &str) -> Result<ChildProfile, BankError> {
        let result = self
            .store
            .read(|state| state.child(child_id).cloned())?
            .ok_or_else(|| BankError::AccountNotFound(child_id.to_string()));
        self.warn_if_missing(&result);
        result
    }

    pub fn list_children(&self) -> Result<Vec<ChildProfile>, BankError> {
        Ok(self.store.read(|state| state.children.clone())?)
    }

    pub fn parent_profile(&self) -> Result<ParentProfile, BankError> {
        Ok(self.store.read(|state| state.parent.clone())?)
    }

    fn log_outcome(&self, operation: &str, result: &Result<LedgerResult, BankError>) {
        match result {
            Ok(r) => info!(
                "{} {} recorded as {}; balance now {}, level {}",
                operation, r.transaction.amount, r.transaction.id, r.child.balance, r.child.level
            ),
            Err(e) => warn!("{} failed: {}", operation, e),
        }
    }

    fn warn_if_missing<T>(&self, result: &Result<T, BankError>) {
        if let Err(BankError::AccountNotFound(id)) = result {
            warn!("Child not found: {}", id);
        }
    }
}

fn non_empty_or(reason: Option<String>, default: &str) -> String {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| default.to_string())
}
