//! Domain models for family accounts.
//!
//! An account is either the parent administering the bank or a child holding
//! a ledger. Ledger fields (balance, lifetime earnings, level, lock flag) only
//! exist on the child variant.

use serde::{Deserialize, Serialize};
use shared::Role;

/// Minutes of lifetime earnings needed per level
pub const MINUTES_PER_LEVEL: u32 = 100;

/// Level is a pure function of lifetime earnings.
pub fn level_for(total_earned: u32) -> u32 {
    total_earned / MINUTES_PER_LEVEL + 1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub password: String,
}

impl Default for ParentProfile {
    fn default() -> Self {
        Self {
            id: "p1".to_string(),
            name: "管理員家長".to_string(),
            avatar: "https://picsum.photos/150/150?random=3".to_string(),
            password: "0000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub password: String,
    pub balance: u32,
    pub total_earned: u32,
    pub level: u32,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub weekly_allowance: u32,
}

impl ChildProfile {
    /// Generate a child ID based on timestamp
    pub fn generate_id(epoch_millis: i64) -> String {
        format!("child::{}", epoch_millis)
    }

    /// Fresh child with an empty ledger
    pub fn new(id: String, name: String, avatar: String, password: String, weekly_allowance: u32) -> Self {
        Self {
            id,
            name,
            avatar,
            password,
            balance: 0,
            total_earned: 0,
            level: level_for(0),
            is_locked: false,
            weekly_allowance,
        }
    }

    /// Add earned minutes to both balance and lifetime total.
    pub(crate) fn apply_credit(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
        self.total_earned = self.total_earned.saturating_add(amount);
        self.level = level_for(self.total_earned);
    }

    /// Remove minutes from the balance, clamping at zero.
    /// Returns the number of minutes actually removed.
    pub(crate) fn apply_debit(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.balance);
        self.balance -= removed;
        removed
    }
}

/// Any account, discriminated by role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "UPPERCASE")]
pub enum Account {
    Parent(ParentProfile),
    Child(ChildProfile),
}

impl Account {
    pub fn id(&self) -> &str {
        match self {
            Account::Parent(p) => &p.id,
            Account::Child(c) => &c.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Account::Parent(p) => &p.name,
            Account::Child(c) => &c.name,
        }
    }

    pub fn avatar(&self) -> &str {
        match self {
            Account::Parent(p) => &p.avatar,
            Account::Child(c) => &c.avatar,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Account::Parent(_) => Role::Parent,
            Account::Child(_) => Role::Child,
        }
    }

    pub(crate) fn password(&self) -> &str {
        match self {
            Account::Parent(p) => &p.password,
            Account::Child(c) => &c.password,
        }
    }

    pub fn as_child(&self) -> Option<&ChildProfile> {
        match self {
            Account::Child(c) => Some(c),
            Account::Parent(_) => None,
        }
    }
}
