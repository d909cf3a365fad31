//! # Storage Traits
//!
//! The bank persists its state as one serialized snapshot per logical
//! collection. Any backend able to get and set strings by key can host it,
//! which keeps the domain layer independent of where the bytes end up.

use anyhow::Result;

/// Key-value persistence injected into the state store
///
/// Implementations must be safe to share across threads; the state store
/// serializes writes itself, so no cross-key atomicity is required.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing was stored yet
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
