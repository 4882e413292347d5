//! Storage traits and shared types.
//!
//! This crate defines the storage abstraction used to persist the replica role
//! state, along with the well-known keys that both in-memory and RocksDB
//! implementations share.
//!
//! # Design
//!
//! The role state machine owns exactly one store handle and writes a single
//! fixed key. The store is deliberately minimal: point reads, point writes
//! and an orderly close. Encoding is not the store's concern; values are
//! opaque bytes produced by the state codec.
//!
//! Backends:
//! - `hyperscale-storage-memory`: `MemoryStateStore` for tests and simulation
//! - `hyperscale-storage-rocksdb`: `RocksDbStateStore` for production

#![warn(missing_docs)]

pub mod keys;
mod store;

pub use store::{StateStore, StoreError, StoreRead};
