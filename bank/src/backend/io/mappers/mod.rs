//! Conversions between domain models and the DTOs in the `shared` crate.

pub mod account_mapper;
pub mod proof_mapper;
pub mod session_mapper;
pub mod settings_mapper;
pub mod task_mapper;
pub mod transaction_mapper;

pub use account_mapper::AccountMapper;
pub use proof_mapper::ProofMapper;
pub use session_mapper::SessionMapper;
pub use settings_mapper::SettingsMapper;
pub use task_mapper::TaskMapper;
pub use transaction_mapper::TransactionMapper;
