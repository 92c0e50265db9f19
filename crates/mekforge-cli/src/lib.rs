//! # mekforge-cli — MekForge Command-Line Interface
//!
//! A structured clap-based CLI over the validation engine and the standard
//! rule catalog.
//!
//! ## Subcommands
//!
//! - `validate` — Run unit record sheets through the standard rules
//! - `rules` — List registered rules or a subtype's effective rule set
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to domain crates and render their output;
//!   rendering is kept in plain functions returning lines so it stays
//!   testable without capturing stdout.
//! - Exit codes are part of the interface: 0 for a valid unit, 1 when a
//!   pass produced errors, 2 for critical findings or operational faults.

pub mod rules;
pub mod validate;
