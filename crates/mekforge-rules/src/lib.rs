//! # mekforge-rules
//!
//! The standard construction-rule catalog and the [`UnitSheet`] document
//! model it validates. This crate is the first consumer of the generic
//! engine: [`catalog::register_standard_rules`] loads ten rules across all
//! three scopes, and [`catalog::standard_validator`] hands back a validator
//! ready to run them.
//!
//! The engine itself knows nothing about tonnage or armor. Everything
//! domain-shaped lives here.

pub mod catalog;
pub mod sheet;

pub use catalog::{ids, register_standard_rules, standard_validator, tonnage_limits};
pub use sheet::{Equipment, TechBase, UnitSheet};
