//! # Subtype Selectors
//!
//! Describes which subtypes a rule applies to. The registry forces the
//! selector at registration time from the scope a rule is registered into;
//! rules never choose their own selector.

use std::collections::BTreeSet;

use crate::unit::{UnitCategory, UnitSubtype};

/// The set of subtypes a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtypeSelector {
    /// Applies to every subtype (universal scope).
    All,
    /// Applies to every subtype in one category (category scope).
    Category(UnitCategory),
    /// Applies to an explicit set of subtypes (subtype scope).
    Only(BTreeSet<UnitSubtype>),
}

impl SubtypeSelector {
    /// Selector matching every subtype.
    pub fn all() -> Self {
        Self::All
    }

    /// Selector matching every subtype in one category.
    pub fn category(category: UnitCategory) -> Self {
        Self::Category(category)
    }

    /// Selector matching exactly one subtype.
    pub fn one(subtype: UnitSubtype) -> Self {
        Self::Only(BTreeSet::from([subtype]))
    }

    /// Selector matching an explicit set of subtypes.
    pub fn only(subtypes: impl IntoIterator<Item = UnitSubtype>) -> Self {
        Self::Only(subtypes.into_iter().collect())
    }

    /// Whether a subject with the given subtype and resolved category matches.
    pub fn matches(&self, subtype: UnitSubtype, category: UnitCategory) -> bool {
        match self {
            Self::All => true,
            Self::Category(c) => *c == category,
            Self::Only(set) => set.contains(&subtype),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
