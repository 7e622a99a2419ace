//! Persistence boundary for the editing core
//!
//! This module holds the storage collaborator contract and the change
//! debouncer that decides *when* the session notifies it. Saves are
//! fire-and-forget from the core's point of view: failures propagate to the
//! caller and never crash the editing surface.

mod debounce;
mod store;

pub use debounce::ChangeDebouncer;
pub use store::{DocumentStore, FileStore, MemoryStore};
