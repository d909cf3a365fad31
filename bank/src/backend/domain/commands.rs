//! Domain-level command and result types
//! These structs are used by services inside the domain layer and are **not**
//! exposed to the presentation layer. The io layer maps the public DTOs
//! defined in the `shared` crate to these internal types.

pub mod ledger {
    use crate::backend::domain::models::{ChildProfile, Transaction};

    /// Input for adding earned minutes to a child.
    #[derive(Debug, Clone)]
    pub struct CreditCommand {
        pub account_id: String,
        pub amount: u32,
        pub reason: String,
        pub category: Option<String>,
    }

    /// Input for removing minutes from a child. Never fails on insufficient
    /// balance; the balance clamps at zero.
    #[derive(Debug, Clone)]
    pub struct DebitCommand {
        pub account_id: String,
        pub amount: u32,
        pub reason: String,
    }

    /// Input for adding a child to the family.
    #[derive(Debug, Clone)]
    pub struct CreateChildCommand {
        pub name: String,
        pub avatar: Option<String>,
    }

    /// Result of a credit or debit.
    #[derive(Debug, Clone)]
    pub struct LedgerResult {
        pub transaction: Transaction,
        /// Account state right after the operation
        pub child: ChildProfile,
    }
}

pub mod proofs {
    use crate::backend::domain::models::{Proof, Transaction};

    /// Input for submitting a task-completion claim.
    #[derive(Debug, Clone)]
    pub struct SubmitProofCommand {
        pub child_id: String,
        pub task_id: String,
        pub task_title: String,
        pub reward: u32,
        pub image_url: Option<String>,
        pub notes: Option<String>,
    }

    /// What a decision did.
    #[derive(Debug, Clone, PartialEq)]
    pub enum ProofDecision {
        /// Proof approved and its reward credited
        Approved { proof: Proof, transaction: Transaction },
        /// Proof rejected; no ledger effect
        Rejected { proof: Proof },
        /// Approved, but the child no longer exists; dropped without credit
        Discarded { proof: Proof },
        /// The proof was not pending (already decided or never existed)
        NotPending,
    }
}

pub mod tasks {
    use shared::TaskCategory;

    /// Input for creating a task from the parent form or an accepted suggestion.
    #[derive(Debug, Clone)]
    pub struct CreateTaskCommand {
        pub title: String,
        pub description: String,
        pub reward: u32,
        pub category: TaskCategory,
    }
}
