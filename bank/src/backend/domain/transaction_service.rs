//! Transaction log queries for display and audit.
use log::{debug, info, warn};
use std::sync::Arc;

use crate::backend::domain::errors::BankError;
use crate::backend::domain::models::Transaction;
use crate::backend::storage::StateStore;

/// Result of replaying a child's log against its stored balance.
///
/// A non-zero discrepancy is expected whenever a debit was clamped at zero,
/// since the log records the requested amount rather than what was removed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationReport {
    pub account_id: String,
    pub replayed_balance: i64,
    pub actual_balance: u32,
    pub discrepancy: i64,
    pub transaction_count: usize,
}

impl ReconciliationReport {
    pub fn is_balanced(&self) -> bool {
        self.discrepancy == 0
    }
}

#[derive(Clone)]
pub struct TransactionLogService {
    store: Arc<StateStore>,
}

impl TransactionLogService {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }

    /// Append an entry as given. The log trusts its callers; balance changes
    /// go through the ledger, which appends on its own.
    pub fn append(&self, transaction: Transaction) -> Result<(), BankError> {
        debug!("Appending transaction {} for {}", transaction.id, transaction.account_id);
        self.store.mutate(|state| state.transactions.append(transaction))?;
        Ok(())
    }

    /// Most recent first. Works for deleted accounts too.
    pub fn list_for_display(&self, account_id: &str) -> Result<Vec<Transaction>, BankError> {
        let transactions = self
            .store
            .read(|state| state.transactions.for_account_descending(account_id))?;
        debug!("Found {} transactions for {}", transactions.len(), account_id);
        Ok(transactions)
    }

    /// Oldest first, for replay
    pub fn list_for_audit(&self, account_id: &str) -> Result<Vec<Transaction>, BankError> {
        Ok(self
            .store
            .read(|state| state.transactions.for_account_ascending(account_id))?)
    }

    /// Replay the log as signed deltas and compare with the current balance
    pub fn reconcile(&self, account_id: &str) -> Result<ReconciliationReport, BankError> {
        let (transactions, balance) = self.store.read(|state| {
            (
                state.transactions.for_account_ascending(account_id),
                state.child(account_id).map(|c| c.balance),
            )
        })?;
        let actual_balance = balance.ok_or_else(|| {
            warn!("Cannot reconcile unknown child: {}", account_id);
            BankError::AccountNotFound(account_id.to_string())
        })?;

        let replayed_balance: i64 = transactions.iter().map(Transaction::signed_delta).sum();
        let report = ReconciliationReport {
            account_id: account_id.to_string(),
            replayed_balance,
            actual_balance,
            discrepancy: i64::from(actual_balance) - replayed_balance,
            transaction_count: transactions.len(),
        };

        if report.is_balanced() {
            info!("Reconciled {} over {} transactions", account_id, report.transaction_count);
        } else {
            info!(
                "Reconciliation for {}: replayed {} vs actual {} (discrepancy {})",
                account_id, report.replayed_balance, report.actual_balance, report.discrepancy
            );
        }
        Ok(report)
    }
}
