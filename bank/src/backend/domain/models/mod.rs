//! Domain models. Unlike the shared DTOs these carry persistence shape
//! (camelCase JSON, epoch-millisecond timestamps) and ledger logic.

pub mod account;
pub mod proof;
pub mod settings;
pub mod state;
pub mod task;
pub mod transaction;

pub use account::{level_for, Account, ChildProfile, ParentProfile, MINUTES_PER_LEVEL};
pub use proof::Proof;
pub use settings::{default_allowed_apps, AllowedApp, FamilySettings, SettingsPatch, SettingsValidationError};
pub use state::BankState;
pub use task::{default_tasks, Task, TaskDraft, TaskPatch, TaskValidationError};
pub use transaction::{Transaction, TransactionLog};
