#![deny(missing_docs)]

//! # mekforge-core — Foundational Types for the MekForge Validation Stack
//!
//! This crate defines the data contracts every other crate in the workspace
//! depends on. It has no internal crate dependencies; only `serde`,
//! `serde_json`, `thiserror`, and `chrono` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** A [`RuleId`] is a distinct
//!    type. You cannot pass an arbitrary string where a rule identifier is
//!    expected.
//!
//! 2. **Single closed enums.** One [`Severity`] definition, one
//!    [`RuleCategory`], one [`UnitCategory`], one [`UnitSubtype`]. The Rust
//!    compiler enforces exhaustive `match`; adding a variant forces every
//!    handler in the workspace to address it.
//!
//! 3. **Reports are plain data.** [`ValidationReport`] and [`RuleResult`] are
//!    serde round-trippable values whose aggregates are computed once at
//!    assembly, so callers can persist, transmit, or diff them freely.
//!
//! 4. **Ephemeral context.** A [`ValidationContext`] borrows the subject unit
//!    for exactly one validation pass and carries a per-pass scratch cache.
//!    Nothing in it outlives the pass.

pub mod category;
pub mod context;
pub mod error;
pub mod identity;
pub mod report;
pub mod selector;
pub mod severity;
pub mod temporal;
pub mod unit;

// Re-export primary types at crate root for ergonomic imports.
pub use category::RuleCategory;
pub use context::{ValidationContext, ValidationOptions};
pub use error::ParseError;
pub use identity::RuleId;
pub use report::{Finding, RuleEvaluation, RuleResult, ValidationReport};
pub use selector::SubtypeSelector;
pub use severity::Severity;
pub use temporal::Timestamp;
pub use unit::{CategoryMapper, StandardCategoryMap, Unit, UnitCategory, UnitSubtype};
