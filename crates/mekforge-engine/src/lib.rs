//! # mekforge-engine — Scoped Rules, Resolution, and Validation
//!
//! The engine is generic over the unit representation. Anything
//! implementing [`mekforge_core::Unit`] can be validated; the engine only
//! ever asks a unit for its subtype and hands the rest to rules through a
//! borrowed context.
//!
//! A rule set goes through three phases:
//!
//! 1. **Registration.** Declarative [`RuleDef`]s enter a [`RuleRegistry`]
//!    in one of three scopes. The registry enforces id uniqueness across
//!    scopes and rejects self-referential or cyclic inheritance links.
//! 2. **Resolution.** Per subtype, the registry unions the applicable
//!    scopes, applies overrides and extension chains, sorts by priority,
//!    and caches the result behind an `Arc`.
//! 3. **Validation.** A [`Validator`] filters the resolved set by the
//!    caller's options, runs each rule behind a panic boundary, and
//!    assembles a [`mekforge_core::ValidationReport`].
//!
//! The engine never instantiates units, never inspects their fields, and
//! keeps no global state; every registry is an independent value.

pub mod registry;
pub mod rule;
pub mod validator;

pub use registry::{RegistryError, ResolvedRules, RuleRegistry, RuleScope};
pub use rule::{EvalFn, PredicateFn, RuleDef, ValidationRule};
pub use validator::Validator;
