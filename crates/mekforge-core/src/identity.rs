//! # Rule Identity
//!
//! String-backed newtype for rule identifiers. Ids are chosen by rule authors
//! and are stable across re-registration ("weight_budget", "armor_capacity");
//! inheritance references and skip lists address rules by id. The registry
//! enforces uniqueness across scopes at registration time, so construction
//! here is infallible.

use serde::{Deserialize, Serialize};

/// A unique, stable identifier for a validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(String);

impl RuleId {
    /// Create a rule identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RuleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
