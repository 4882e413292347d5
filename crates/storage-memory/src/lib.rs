//! # In-Memory Storage
//!
//! In-memory [`StateStore`](hyperscale_storage::StateStore) implementation for
//! deterministic tests and simulation.
//!
//! Handles are cheap clones over shared state, so a test can keep one handle
//! to inspect persisted bytes while the state machine owns another. Write
//! failures can be injected to exercise the memory/disk divergence path.

mod storage;

pub use storage::MemoryStateStore;
