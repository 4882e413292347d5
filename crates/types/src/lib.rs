//! Core types for the Hyperscale replica crates.
//!
//! This crate provides the value types shared between the role state machine,
//! its storage backends and operator tooling:
//!
//! - **Identifiers**: [`BlockNumber`], the sequence number a role decision is made for
//!
//! # Design Philosophy
//!
//! This crate is self-contained with minimal dependencies. It does not depend on
//! any other workspace crates, making it the foundation layer.

mod block_number;

pub use block_number::{BlockNumber, ParseBlockNumberError};
