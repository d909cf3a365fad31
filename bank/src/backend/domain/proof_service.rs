//! Proof workflow: children claim task completion, parents decide.
//!
//! A proof lives in the pending set from submission until a decision.
//! Approval credits the reward and removes the proof in one state mutation,
//! so a second approval of the same id finds nothing and does nothing.
//! Decided proofs are not archived.

use log::{info, warn};
use shared::ProofStatus;
use std::sync::Arc;

use crate::backend::domain::clock::Clock;
use crate::backend::domain::commands::ledger::CreditCommand;
use crate::backend::domain::commands::proofs::{ProofDecision, SubmitProofCommand};
use crate::backend::domain::errors::BankError;
use crate::backend::domain::ledger_service::credit_child;
use crate::backend::domain::models::Proof;
use crate::backend::storage::StateStore;

pub const APPROVAL_CATEGORY: &str = "Task";

pub fn approval_reason(task_title: &str) -> String {
    format!("完成任務: {}", task_title)
}

#[derive(Clone)]
pub struct ProofService {
    store: Arc<StateStore>,
    clock: Arc<dyn Clock>,
}

impl ProofService {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Record a claim. Always succeeds; repeated submissions for the same
    /// task produce independent proofs.
    pub fn submit(&self, command: SubmitProofCommand) -> Result<Proof, BankError> {
        let now = self.clock.now();
        let proof = Proof {
            id: Proof::generate_id(now.timestamp_millis()),
            task_id: command.task_id,
            child_id: command.child_id,
            task_title: command.task_title,
            reward: command.reward,
            timestamp: now,
            image_url: command.image_url.filter(|url| !url.is_empty()),
            notes: command.notes.filter(|notes| !notes.trim().is_empty()),
            status: ProofStatus::Pending,
        };

        self.store.mutate(|state| state.pending_proofs.push(proof.clone()))?;
        info!(
            "Proof {} submitted by {} for '{}' ({} minutes)",
            proof.id, proof.child_id, proof.task_title, proof.reward
        );
        Ok(proof)
    }

    /// Approve or reject a pending proof. Unknown or already decided ids are
    /// a no-op.
    pub fn decide(&self, proof_id: &str, approved: bool) -> Result<ProofDecision, BankError> {
        let now = self.clock.now();
        let decision = self.store.mutate(|state| -> Result<ProofDecision, BankError> {
            let Some(index) = state
                .pending_proofs
                .iter()
                .position(|p| p.id == proof_id && p.is_pending())
            else {
                return Ok(ProofDecision::NotPending);
            };
            let mut proof = state.pending_proofs.remove(index);

            if !approved {
                proof.status = ProofStatus::Rejected;
                return Ok(ProofDecision::Rejected { proof });
            }

            if proof.reward == 0 {
                // nothing to credit; the ledger refuses zero amounts
                proof.status = ProofStatus::Approved;
                return Ok(ProofDecision::Discarded { proof });
            }

            let credit = CreditCommand {
                account_id: proof.child_id.clone(),
                amount: proof.reward,
                reason: approval_reason(&proof.task_title),
                category: Some(APPROVAL_CATEGORY.to_string()),
            };
            match credit_child(state, credit, now) {
                Ok(result) => {
                    proof.status = ProofStatus::Approved;
                    Ok(ProofDecision::Approved { proof, transaction: result.transaction })
                }
                Err(BankError::AccountNotFound(_)) => Ok(ProofDecision::Discarded { proof }),
                Err(e) => {
                    // keep the claim so it can be decided again
                    state.pending_proofs.insert(index, proof);
                    Err(e)
                }
            }
        })??;

        match &decision {
            ProofDecision::Approved { proof, transaction } => info!(
                "Approved proof {}: credited {} minutes to {} ({})",
                proof.id, transaction.amount, proof.child_id, transaction.id
            ),
            ProofDecision::Rejected { proof } => info!("Rejected proof {} from {}", proof.id, proof.child_id),
            ProofDecision::Discarded { proof } => warn!(
                "Discarded proof {} without credit: child {} is gone or reward is zero",
                proof.id, proof.child_id
            ),
            ProofDecision::NotPending => info!("Proof {} is not pending, ignoring decision", proof_id),
        }
        Ok(decision)
    }

    /// Pending proofs in submission order
    pub fn list_pending(&self) -> Result<Vec<Proof>, BankError> {
        Ok(self.store.read(|state| state.pending_proofs.clone())?)
    }

    pub fn list_pending_for_child(&self, child_id: &str) -> Result<Vec<Proof>, BankError> {
        Ok(self.store.read(|state| {
            state
                .pending_proofs
                .iter()
                .filter(|p| p.child_id == child_id)
                .cloned()
                .collect()
        })?)
    }

    pub fn get_pending(&self, proof_id: &str) -> Result<Option<Proof>, BankError> {
        Ok(self
            .store
            .read(|state| state.pending_proofs.iter().find(|p| p.id == proof_id).cloned())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::test_utils::TestBank;
    use shared::TransactionType;

    fn submission(child_id: &str, reward: u32) -> SubmitProofCommand {
        SubmitProofCommand {
            child_id: child_id.to_string(),
            task_id: "t1".to_string(),
            task_title: "閱讀課外書".to_string(),
            reward,
            image_url: Some("data:image/png;base64,AAAA".to_string()),
            notes: Some("讀完第三章".to_string()),
        }
    }

    #[test]
    fn test_approval_credits_reward() {
        let bank = TestBank::with_demo_data();
        let proofs = bank.proofs();
        let before = bank.child("c1");
        assert_eq!(before.balance, 45);

        let proof = proofs.submit(submission("c1", 15)).unwrap();
        assert_eq!(proof.status, ProofStatus::Pending);
        assert_eq!(proofs.list_pending().unwrap().len(), 1);

        let decision = proofs.decide(&proof.id, true).unwrap();
        let ProofDecision::Approved { transaction, .. } = decision else {
            panic!("expected approval, got {:?}", decision);
        };
        assert_eq!(transaction.amount, 15);
        assert_eq!(transaction.transaction_type, TransactionType::Earn);
        assert_eq!(transaction.description, "完成任務: 閱讀課外書");
        assert_eq!(transaction.category.as_deref(), Some("Task"));

        let after = bank.child("c1");
        assert_eq!(after.balance, 60);
        assert_eq!(after.total_earned, before.total_earned + 15);
        assert!(proofs.list_pending().unwrap().is_empty());
    }

    #[test]
    fn test_approving_twice_credits_once() {
        let bank = TestBank::new();
        let proofs = bank.proofs();
        let child = bank.add_child("Leo", 0);
        let proof = proofs.submit(submission(&child.id, 10)).unwrap();

        assert!(matches!(proofs.decide(&proof.id, true).unwrap(), ProofDecision::Approved { .. }));
        assert_eq!(proofs.decide(&proof.id, true).unwrap(), ProofDecision::NotPending);
        assert_eq!(bank.child(&child.id).balance, 10);
        assert_eq!(bank.transactions_for(&child.id).len(), 1);
    }

    #[test]
    fn test_rejection_has_no_ledger_effect() {
        let bank = TestBank::new();
        let proofs = bank.proofs();
        let child = bank.add_child("Leo", 150);
        let proof = proofs.submit(submission(&child.id, 30)).unwrap();

        let decision = proofs.decide(&proof.id, false).unwrap();
        assert!(matches!(decision, ProofDecision::Rejected { ref proof } if proof.status == ProofStatus::Rejected));

        let after = bank.child(&child.id);
        assert_eq!((after.balance, after.total_earned, after.level), (150, 150, 2));
        assert!(bank.transactions_for(&child.id).is_empty());
        assert!(proofs.list_pending().unwrap().is_empty());
        // approving after rejection is a no-op too
        assert_eq!(proofs.decide(&proof.id, true).unwrap(), ProofDecision::NotPending);
    }

    #[test]
    fn test_unknown_proof_is_a_no_op() {
        let bank = TestBank::new();
        assert_eq!(bank.proofs().decide("proof::missing", true).unwrap(), ProofDecision::NotPending);
    }

    #[test]
    fn test_duplicate_submissions_are_independent_and_ordered() {
        let bank = TestBank::new();
        let proofs = bank.proofs();
        let leo = bank.add_child("Leo", 0);
        let mia = bank.add_child("Mia", 0);

        let first = proofs.submit(submission(&leo.id, 5)).unwrap();
        let second = proofs.submit(submission(&mia.id, 5)).unwrap();
        let third = proofs.submit(submission(&leo.id, 5)).unwrap();
        assert_ne!(first.id, third.id);

        let ids: Vec<String> = proofs.list_pending().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id.clone(), second.id, third.id.clone()]);
        let leo_ids: Vec<String> = proofs
            .list_pending_for_child(&leo.id)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(leo_ids, vec![first.id, third.id]);
    }

    #[test]
    fn test_claim_survives_task_deletion() {
        let bank = TestBank::with_demo_data();
        let proofs = bank.proofs();
        let proof = proofs.submit(submission("c2", 15)).unwrap();

        bank.tasks().remove("t1").unwrap();
        let pending = proofs.get_pending(&proof.id).unwrap().unwrap();
        assert_eq!(pending.task_title, "閱讀課外書");
        assert_eq!(pending.reward, 15);

        assert!(matches!(proofs.decide(&proof.id, true).unwrap(), ProofDecision::Approved { .. }));
        assert_eq!(bank.child("c2").balance, 25);
    }

    #[test]
    fn test_approval_for_removed_child_is_discarded() {
        let bank = TestBank::new();
        let proofs = bank.proofs();
        let child = bank.add_child("Leo", 0);
        let proof = proofs.submit(submission(&child.id, 10)).unwrap();
        bank.ledger().delete_account(&child.id).unwrap();

        assert!(matches!(proofs.decide(&proof.id, true).unwrap(), ProofDecision::Discarded { .. }));
        assert!(proofs.list_pending().unwrap().is_empty());
        assert!(bank.transactions_for(&child.id).is_empty());
    }

    #[test]
    fn test_blank_notes_and_images_are_dropped() {
        let bank = TestBank::new();
        let mut command = submission("c1", 5);
        command.image_url = Some(String::new());
        command.notes = Some("   ".to_string());
        let proof = bank.proofs().submit(command).unwrap();
        assert_eq!(proof.image_url, None);
        assert_eq!(proof.notes, None);
    }
}
