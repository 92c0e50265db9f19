//! # Rule Categories — Single Source of Truth
//!
//! Defines the [`RuleCategory`] enum: the closed set of tags that group rules
//! for filtering. A caller can ask for a weight-only pass or skip everything
//! but armor checks; the orchestrator filters on these tags.
//!
//! This is the single definition used by every crate in the workspace. The
//! compiler enforces exhaustive `match`, so adding a category forces every
//! handler to address it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The closed set of rule groupings used for filtering validation passes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Tonnage budgets and component weight sums.
    Weight,
    /// Armor allocation and capacity limits.
    Armor,
    /// Critical slot and item capacity.
    Slots,
    /// Engine rating and movement-plant legality.
    Engine,
    /// Heat generation versus dissipation.
    Heat,
    /// Movement profile consistency.
    Movement,
    /// Technology base and availability.
    Tech,
    /// Required or forbidden equipment.
    Equipment,
    /// Checks that fit no narrower grouping.
    General,
}

impl RuleCategory {
    /// Return all rule categories as a slice.
    pub fn all() -> &'static [RuleCategory] {
        &[
            Self::Weight,
            Self::Armor,
            Self::Slots,
            Self::Engine,
            Self::Heat,
            Self::Movement,
            Self::Tech,
            Self::Equipment,
            Self::General,
        ]
    }

    /// The total number of rule categories.
    pub const COUNT: usize = 9;
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Weight => "weight",
            Self::Armor => "armor",
            Self::Slots => "slots",
            Self::Engine => "engine",
            Self::Heat => "heat",
            Self::Movement => "movement",
            Self::Tech => "tech",
            Self::Equipment => "equipment",
            Self::General => "general",
        };
        write!(f, "{s}")
    }
}

impl FromStr for RuleCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weight" => Ok(Self::Weight),
            "armor" => Ok(Self::Armor),
            "slots" => Ok(Self::Slots),
            "engine" => Ok(Self::Engine),
            "heat" => Ok(Self::Heat),
            "movement" => Ok(Self::Movement),
            "tech" => Ok(Self::Tech),
            "equipment" => Ok(Self::Equipment),
            "general" => Ok(Self::General),
            other => Err(ParseError::UnknownRuleCategory(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
