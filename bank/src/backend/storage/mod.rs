//! # Storage Module
//!
//! Handles persistence of the bank's state snapshot.
//!
//! The domain never talks to a disk directly. It works against `StateStore`,
//! which keeps the snapshot in memory and writes it through to whichever
//! `KeyValueStore` was injected:
//!
//! - **InMemoryKeyValueStore**: volatile, for tests and embedding
//! - **FileKeyValueStore**: one JSON file per collection in a data directory
//!
//! Loading is tolerant: missing or unreadable collections fall back to
//! defaults, and the legacy name-only allowed-app format is upgraded.

pub mod file_store;
pub mod memory_store;
pub mod state_store;
pub mod traits;

pub use file_store::FileKeyValueStore;
pub use memory_store::InMemoryKeyValueStore;
pub use state_store::StateStore;
pub use traits::KeyValueStore;
