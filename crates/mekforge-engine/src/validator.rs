//! # The Validator
//!
//! Drives a validation pass: resolves the unit's effective rule set from
//! the registry, applies the caller's filters, executes each surviving rule
//! behind a fault boundary, and assembles the report.
//!
//! The validator holds no per-pass state. Two passes over the same unit
//! against an unchanged registry produce the same verdicts; only the
//! timestamps and timings differ.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use mekforge_core::{
    Finding, RuleCategory, RuleEvaluation, RuleId, RuleResult, Unit, ValidationContext,
    ValidationOptions, ValidationReport,
};

use crate::registry::RuleRegistry;
use crate::rule::ValidationRule;

/// Runs resolved rule sets against units.
pub struct Validator<E> {
    registry: RuleRegistry<E>,
}

impl<E: 'static> Validator<E> {
    /// Wraps a registry into a validator.
    pub fn new(registry: RuleRegistry<E>) -> Self {
        Self { registry }
    }

    /// Read access to the underlying registry.
    pub fn registry(&self) -> &RuleRegistry<E> {
        &self.registry
    }

    /// Mutable access to the underlying registry, for registration and
    /// switches.
    pub fn registry_mut(&mut self) -> &mut RuleRegistry<E> {
        &mut self.registry
    }

    /// Empties the underlying registry.
    pub fn reset(&mut self) {
        self.registry.clear();
    }
}

impl<E: Unit + 'static> Validator<E> {
    /// Runs a full validation pass over one unit.
    ///
    /// Rules are visited in resolved order. A rule produces no result when
    /// the options skip it, its category is filtered out, or it reports
    /// itself not applicable. The pass stops early once the options' error
    /// ceiling is reached.
    pub fn validate(&self, unit: &E, options: &ValidationOptions) -> ValidationReport {
        let subtype = unit.subtype();
        let category = self.registry.category_of(subtype);
        let resolved = self.registry.rules_for_subtype(subtype);
        let ctx = ValidationContext::new(unit, subtype, category, options);

        tracing::debug!(
            subtype = %subtype,
            rules = resolved.len(),
            "validation pass started"
        );

        let ceiling = options.error_ceiling();
        let mut results = Vec::new();
        let mut truncated = false;
        let mut failing = 0usize;

        for rule in resolved.iter() {
            if options.skips(rule.id()) {
                continue;
            }
            if !options.wants_category(rule.category()) {
                continue;
            }
            if !rule.is_applicable(&ctx) {
                continue;
            }
            let result = execute_rule(rule.as_ref(), &ctx);
            failing += result.failing_count();
            results.push(result);
            if let Some(max) = ceiling {
                if failing >= max {
                    truncated = true;
                    break;
                }
            }
        }

        let report = ValidationReport::assemble(results, truncated);
        tracing::debug!(
            subtype = %subtype,
            valid = report.is_valid,
            errors = report.error_count,
            critical = report.critical_count,
            truncated = report.truncated,
            "validation pass finished"
        );
        report
    }

    /// Runs only the rules of one category against a unit.
    pub fn validate_category(&self, unit: &E, category: RuleCategory) -> ValidationReport {
        let options = ValidationOptions::new().with_categories([category]);
        self.validate(unit, &options)
    }

    /// Runs a single effective rule by id.
    ///
    /// Returns `None` when the id names no rule in the unit's resolved set
    /// or when the rule reports itself not applicable. Extension chains are
    /// found under the parent's id; consumed extender ids resolve to
    /// nothing.
    pub fn validate_rule(&self, unit: &E, id: &RuleId) -> Option<RuleResult> {
        let subtype = unit.subtype();
        let category = self.registry.category_of(subtype);
        let resolved = self.registry.rules_for_subtype(subtype);
        let rule = resolved.get(id)?;

        let options = ValidationOptions::new();
        let ctx = ValidationContext::new(unit, subtype, category, &options);
        if !rule.is_applicable(&ctx) {
            return None;
        }
        Some(execute_rule(rule.as_ref(), &ctx))
    }
}

impl<E: 'static> Default for Validator<E> {
    fn default() -> Self {
        Self::new(RuleRegistry::new())
    }
}

impl<E> fmt::Debug for Validator<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("registry", &self.registry)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Fault boundary
// ---------------------------------------------------------------------------

/// Runs one rule, converting a panic into a failed result so a faulty rule
/// cannot take down the pass.
fn execute_rule<E>(rule: &dyn ValidationRule<E>, ctx: &ValidationContext<'_, E>) -> RuleResult {
    let started = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(ctx)));
    let elapsed_us = started.elapsed().as_micros() as u64;

    let evaluation = match outcome {
        Ok(evaluation) => evaluation,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(rule = %rule.id(), panic = message, "rule execution panicked");
            RuleEvaluation::fail(Finding::error(
                rule.category(),
                format!("rule execution failed: {message}"),
            ))
        }
    };
    RuleResult::from_evaluation(rule.id().clone(), rule.name(), evaluation, elapsed_us)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
