//! Catalog domain model.
//!
//! # Responsibility
//! - Define the product record exchanged with the catalog backend.
//! - Own calendar-date parsing and the derived revision date rule.
//!
//! # Invariants
//! - `date_revision` is always a pure function of `date_release`.
//! - Dates travel as ISO `YYYY-MM-DD` strings and are interpreted as local
//!   calendar days, never as instants.

pub mod date;
pub mod product;
