//! Domain model for a ledger transaction and the append-only log holding them.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::TransactionType;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Owning child. Stored as `childId` to stay readable by the web client.
    #[serde(rename = "childId")]
    pub account_id: String,
    /// Always non-negative; direction comes from `transaction_type`
    pub amount: u32,
    pub description: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Transaction {
    /// Generate a unique transaction ID.
    /// Format: tx::<timestamp_ms>::<random_suffix>
    pub fn generate_id(timestamp_ms: i64) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("tx::{}::{}", timestamp_ms, &suffix[..8])
    }

    pub fn earn(account_id: &str, amount: u32, description: String, category: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Self::generate_id(now.timestamp_millis()),
            account_id: account_id.to_string(),
            amount,
            description,
            timestamp: now,
            transaction_type: TransactionType::Earn,
            category,
        }
    }

    pub fn spend(account_id: &str, amount: u32, description: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Self::generate_id(now.timestamp_millis()),
            account_id: account_id.to_string(),
            amount,
            description,
            timestamp: now,
            transaction_type: TransactionType::Spend,
            category: None,
        }
    }

    pub fn signed_delta(&self) -> i64 {
        self.transaction_type.signed_delta(self.amount)
    }
}

/// Append-only sequence of transactions in insertion order.
///
/// There is deliberately no API for editing or removing individual entries;
/// entries for deleted accounts stay in the log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
}

impl TransactionLog {
    pub fn from_entries(entries: Vec<Transaction>) -> Self {
        Self { entries }
    }

    pub fn append(&mut self, transaction: Transaction) {
        self.entries.push(transaction);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    /// Oldest first. Entries sharing a timestamp keep insertion order.
    pub fn for_account_ascending(&self, account_id: &str) -> Vec<Transaction> {
        let mut txs: Vec<Transaction> = self
            .entries
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect();
        txs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        txs
    }

    /// Most recent first, for display.
    pub fn for_account_descending(&self, account_id: &str) -> Vec<Transaction> {
        let mut txs = self.for_account_ascending(account_id);
        txs.reverse();
        txs
    }
}
