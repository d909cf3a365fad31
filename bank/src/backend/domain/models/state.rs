//! The application state snapshot shared by every service.
use super::account::{Account, ChildProfile, ParentProfile};
use super::proof::Proof;
use super::settings::{AllowedApp, FamilySettings};
use super::task::Task;
use super::transaction::TransactionLog;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BankState {
    pub parent: ParentProfile,
    pub children: Vec<ChildProfile>,
    pub tasks: Vec<Task>,
    pub transactions: TransactionLog,
    /// Pending proofs in submission order
    pub pending_proofs: Vec<Proof>,
    pub settings: FamilySettings,
    pub allowed_apps: Vec<AllowedApp>,
}

impl BankState {
    pub fn child(&self, child_id: &str) -> Option<&ChildProfile> {
        self.children.iter().find(|c| c.id == child_id)
    }

    pub fn child_mut(&mut self, child_id: &str) -> Option<&mut ChildProfile> {
        self.children.iter_mut().find(|c| c.id == child_id)
    }

    /// Look up any account, parent or child
    pub fn account(&self, account_id: &str) -> Option<Account> {
        if self.parent.id == account_id {
            return Some(Account::Parent(self.parent.clone()));
        }
        self.child(account_id).cloned().map(Account::Child)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }
}
