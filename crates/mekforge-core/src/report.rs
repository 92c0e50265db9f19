//! # Findings, Evaluations, and Reports
//!
//! The data that flows out of a validation pass. A rule produces a
//! [`RuleEvaluation`], the engine wraps it into a [`RuleResult`] with
//! identity and timing attached, and a full pass is summarised by a
//! [`ValidationReport`].
//!
//! All of these are plain serialisable data. None of them hold references
//! into the subject or the registry.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::category::RuleCategory;
use crate::identity::RuleId;
use crate::severity::Severity;
use crate::temporal::Timestamp;

// ---------------------------------------------------------------------------
// Finding
// ---------------------------------------------------------------------------

/// A single observation produced by a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// How serious the observation is.
    pub severity: Severity,
    /// The concern the observation belongs to.
    pub category: RuleCategory,
    /// Human-readable description of what was observed.
    pub message: String,
    /// The field of the subject the observation points at, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Structured payload for tooling, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl Finding {
    /// Builds a finding with the given severity.
    pub fn new(severity: Severity, category: RuleCategory, message: impl Into<String>) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            field: None,
            detail: None,
        }
    }

    /// Builds a critical finding.
    pub fn critical(category: RuleCategory, message: impl Into<String>) -> Self {
        Self::new(Severity::Critical, category, message)
    }

    /// Builds an error finding.
    pub fn error(category: RuleCategory, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, category, message)
    }

    /// Builds a warning finding.
    pub fn warning(category: RuleCategory, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, category, message)
    }

    /// Builds an informational finding.
    pub fn info(category: RuleCategory, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, category, message)
    }

    /// Attaches the subject field the finding points at.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attaches a structured payload.
    #[must_use]
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;
        if let Some(field) = &self.field {
            write!(f, " (field: {field})")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RuleEvaluation
// ---------------------------------------------------------------------------

/// The raw outcome of running one rule body.
///
/// Carries no rule identity or timing; the engine attaches those when it
/// turns an evaluation into a [`RuleResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEvaluation {
    /// Whether the rule considers the subject acceptable.
    pub passed: bool,
    /// Observations made while evaluating, in emission order.
    pub findings: Vec<Finding>,
}

impl RuleEvaluation {
    /// A clean pass with no findings.
    pub fn pass() -> Self {
        Self {
            passed: true,
            findings: Vec::new(),
        }
    }

    /// A pass that still carries findings, typically warnings or infos.
    pub fn pass_with(findings: impl IntoIterator<Item = Finding>) -> Self {
        Self {
            passed: true,
            findings: findings.into_iter().collect(),
        }
    }

    /// A failure with a single finding.
    pub fn fail(finding: Finding) -> Self {
        Self {
            passed: false,
            findings: vec![finding],
        }
    }

    /// A failure carrying several findings.
    pub fn fail_with(findings: impl IntoIterator<Item = Finding>) -> Self {
        Self {
            passed: false,
            findings: findings.into_iter().collect(),
        }
    }

    /// Merges another evaluation after this one.
    ///
    /// The combined evaluation passes only if both passed, and this
    /// evaluation's findings come first.
    #[must_use]
    pub fn and(mut self, other: RuleEvaluation) -> Self {
        self.passed = self.passed && other.passed;
        self.findings.extend(other.findings);
        self
    }
}

impl Default for RuleEvaluation {
    fn default() -> Self {
        Self::pass()
    }
}

// ---------------------------------------------------------------------------
// RuleResult
// ---------------------------------------------------------------------------

/// One rule's outcome within a pass, with identity and timing attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    /// The rule that produced this result.
    pub rule_id: RuleId,
    /// The rule's display name at the time it ran.
    pub rule_name: String,
    /// Whether the rule considered the subject acceptable.
    pub passed: bool,
    /// Critical and error findings, in emission order.
    pub errors: Vec<Finding>,
    /// Warning findings, in emission order.
    pub warnings: Vec<Finding>,
    /// Informational findings, in emission order.
    pub infos: Vec<Finding>,
    /// Wall-clock time the rule took, in microseconds.
    pub execution_time_us: u64,
}

impl RuleResult {
    /// Buckets an evaluation's findings by severity and attaches identity
    /// and timing.
    pub fn from_evaluation(
        rule_id: RuleId,
        rule_name: impl Into<String>,
        evaluation: RuleEvaluation,
        execution_time_us: u64,
    ) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut infos = Vec::new();
        for finding in evaluation.findings {
            match finding.severity {
                Severity::Critical | Severity::Error => errors.push(finding),
                Severity::Warning => warnings.push(finding),
                Severity::Info => infos.push(finding),
            }
        }
        Self {
            rule_id,
            rule_name: rule_name.into(),
            passed: evaluation.passed,
            errors,
            warnings,
            infos,
            execution_time_us,
        }
    }

    /// Number of critical findings.
    pub fn critical_count(&self) -> usize {
        self.errors
            .iter()
            .filter(|finding| finding.severity == Severity::Critical)
            .count()
    }

    /// Number of error findings, criticals excluded.
    pub fn error_count(&self) -> usize {
        self.errors
            .iter()
            .filter(|finding| finding.severity == Severity::Error)
            .count()
    }

    /// Number of warning findings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Number of informational findings.
    pub fn info_count(&self) -> usize {
        self.infos.len()
    }

    /// Total findings across every severity.
    pub fn finding_count(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.infos.len()
    }

    /// Findings that count against the pass verdict.
    pub fn failing_count(&self) -> usize {
        self.errors.len()
    }
}

// ---------------------------------------------------------------------------
// ValidationReport
// ---------------------------------------------------------------------------

/// The aggregate outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when the pass produced no error or critical findings.
    pub is_valid: bool,
    /// True when at least one critical finding was produced.
    pub has_critical_errors: bool,
    /// Total critical findings across all rules.
    pub critical_count: usize,
    /// Total error findings across all rules, criticals excluded.
    pub error_count: usize,
    /// Total warning findings across all rules.
    pub warning_count: usize,
    /// Total informational findings across all rules.
    pub info_count: usize,
    /// Per-rule results in the order the rules ran.
    pub results: Vec<RuleResult>,
    /// When the pass finished.
    pub validated_at: Timestamp,
    /// Wall-clock time spent inside rule bodies, in microseconds.
    pub total_execution_time_us: u64,
    /// True when the pass stopped early because the error ceiling was hit.
    pub truncated: bool,
}

impl ValidationReport {
    /// Aggregates per-rule results into a report, stamped with the current
    /// time.
    pub fn assemble(results: Vec<RuleResult>, truncated: bool) -> Self {
        let critical_count = results.iter().map(RuleResult::critical_count).sum();
        let error_count = results.iter().map(RuleResult::error_count).sum();
        let warning_count = results.iter().map(RuleResult::warning_count).sum();
        let info_count = results.iter().map(RuleResult::info_count).sum();
        let total_execution_time_us = results.iter().map(|result| result.execution_time_us).sum();
        Self {
            is_valid: critical_count == 0 && error_count == 0,
            has_critical_errors: critical_count > 0,
            critical_count,
            error_count,
            warning_count,
            info_count,
            results,
            validated_at: Timestamp::now(),
            total_execution_time_us,
            truncated,
        }
    }

    /// Number of rules that ran.
    pub fn rule_count(&self) -> usize {
        self.results.len()
    }

    /// Ids of the rules that did not pass, in run order.
    pub fn failed_rule_ids(&self) -> Vec<&RuleId> {
        self.results
            .iter()
            .filter(|result| !result.passed)
            .map(|result| &result.rule_id)
            .collect()
    }

    /// One-line human summary of the pass.
    pub fn summary(&self) -> String {
        let verdict = if self.is_valid { "valid" } else { "invalid" };
        format!(
            "{verdict}: {} rules, {} critical, {} errors, {} warnings, {} infos",
            self.results.len(),
            self.critical_count,
            self.error_count,
            self.warning_count,
            self.info_count,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
