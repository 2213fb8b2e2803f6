//! Client state machines for the product screens.
//!
//! # Responsibility
//! - Hold per-screen state as plain structs mutated by explicit operations.
//! - Derive view models synchronously, without any rendering framework.
//!
//! # Invariants
//! - State is private to one screen instance; nothing is shared across them.
//! - Gateway calls are awaited inline; the last response to resolve wins.

pub mod form;
pub mod list;
