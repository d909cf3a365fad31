//! # Domain Module
//!
//! Contains all business logic for the screen-time bank.
//!
//! Children earn minutes by completing tasks and spend them by using apps.
//! This module models that economy independently of any UI or storage
//! mechanism: every service works against the shared `StateStore` and a
//! `Clock`, both injected.
//!
//! ## Module Organization
//!
//! - **ledger_service**: balances, lifetime earnings, levels, locks, members
//! - **transaction_service**: transaction history queries and reconciliation
//! - **proof_service**: task-completion claims and parent decisions
//! - **task_service**: the task catalog
//! - **session_service**: per-minute metering of live app usage
//! - **session_ticker**: background task driving session metering
//! - **identity_service**: credentials, current user and role checks
//! - **settings_service**: family settings and the allowed-app whitelist
//! - **advisory_service**: gateway to the generative advisory service
//!
//! ## Business Rules
//!
//! - Balances never go negative; debits clamp at zero but log the requested amount
//! - Level is always `floor(total_earned / 100) + 1`
//! - Every balance change appends exactly one transaction
//! - A proof is credited at most once
//! - Usage is charged one minute per full 60 seconds, never for partial minutes
//! - Advisory output never changes state by itself

pub mod advisory_service;
pub mod clock;
pub mod commands;
pub mod errors;
pub mod identity_service;
pub mod ledger_service;
pub mod models;
pub mod proof_service;
pub mod session_service;
pub mod session_ticker;
pub mod settings_service;
pub mod task_service;
pub mod transaction_service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use advisory_service::{AdvisoryClient, AdvisoryRequest, AdvisoryService, InlineImage, ProofAssessment, UnavailableAdvisoryClient};
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{AdvisoryError, BankError, SessionStartError};
pub use identity_service::IdentityService;
pub use ledger_service::{AccountDefaults, LedgerService};
pub use proof_service::ProofService;
pub use session_service::{SessionNotice, SessionService, SessionSnapshot, StopReason, TickOutcome};
pub use session_ticker::SessionTicker;
pub use settings_service::SettingsService;
pub use task_service::TaskService;
pub use transaction_service::{ReconciliationReport, TransactionLogService};
