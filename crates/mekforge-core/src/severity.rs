//! # Finding Severity
//!
//! Four-level severity classification for validation findings, ordered from
//! least to most severe: `Info < Warning < Error < Critical`.
//!
//! `Error` and `Critical` findings make a report invalid. `Critical` is the
//! signal consumers should use to block irreversible actions such as export;
//! plain errors and warnings are presentational.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Severity of a single validation finding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational note; never affects validity.
    Info,
    /// Advisory finding; the configuration is legal but questionable.
    Warning,
    /// The configuration violates a rule; the report becomes invalid.
    Error,
    /// A violation severe enough that irreversible actions should be blocked.
    Critical,
}

impl Severity {
    /// Return all severities from least to most severe.
    pub fn all() -> &'static [Severity] {
        &[Self::Info, Self::Warning, Self::Error, Self::Critical]
    }

    /// The total number of severity levels.
    pub const COUNT: usize = 4;

    /// Whether a finding of this severity makes a report invalid.
    pub fn is_failing(self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }

    /// Whether this is the blocking severity.
    pub fn is_critical(self) -> bool {
        matches!(self, Self::Critical)
    }

    /// The more severe of two severities.
    pub fn worst(self, other: Severity) -> Severity {
        self.max(other)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Severity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            other => Err(ParseError::UnknownSeverity(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
