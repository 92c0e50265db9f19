//! # Unit Taxonomy
//!
//! The two-level classification the engine scopes rules by: a [`UnitSubtype`]
//! is the most specific tag identifying a unit's exact kind, and every
//! subtype belongs to exactly one coarse [`UnitCategory`] through a
//! [`CategoryMapper`].
//!
//! ## The mapper is a collaborator
//!
//! The registry consults the mapper during rule resolution to decide which
//! category-scoped rules join a subtype's effective set. The mapper must be
//! total (every subtype maps to exactly one category) and stable (same input,
//! same category); an unstable mapper would make cached resolutions
//! inconsistent with fresh ones. [`StandardCategoryMap`] is the default, with
//! one exhaustive `match` as the single source of truth.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

// ---------------------------------------------------------------------------
// UnitCategory
// ---------------------------------------------------------------------------

/// A coarse grouping of unit subtypes sharing category-level rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    /// BattleMechs and their industrial and proto variants.
    Mech,
    /// Ground and rotary-wing vehicles.
    Vehicle,
    /// Fighters, small craft, and DropShips.
    Aerospace,
    /// Conventional infantry and battle armor.
    Infantry,
}

impl UnitCategory {
    /// Return all unit categories as a slice.
    pub fn all() -> &'static [UnitCategory] {
        &[Self::Mech, Self::Vehicle, Self::Aerospace, Self::Infantry]
    }

    /// The total number of unit categories.
    pub const COUNT: usize = 4;
}

impl std::fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Mech => "mech",
            Self::Vehicle => "vehicle",
            Self::Aerospace => "aerospace",
            Self::Infantry => "infantry",
        };
        write!(f, "{s}")
    }
}

impl FromStr for UnitCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mech" => Ok(Self::Mech),
            "vehicle" => Ok(Self::Vehicle),
            "aerospace" => Ok(Self::Aerospace),
            "infantry" => Ok(Self::Infantry),
            other => Err(ParseError::UnknownUnitCategory(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// UnitSubtype
// ---------------------------------------------------------------------------

/// The most specific tag identifying a unit's exact kind.
///
/// Subtype-scoped rules key on these tags, and the resolved rule set for a
/// unit is derived from its subtype.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UnitSubtype {
    /// Standard combat BattleMech.
    BattleMech,
    /// IndustrialMech work chassis.
    IndustrialMech,
    /// Sub-ten-ton ProtoMech.
    ProtoMech,
    /// Tracked, wheeled, or hover combat vehicle.
    CombatVehicle,
    /// Logistics and utility support vehicle.
    SupportVehicle,
    /// Rotary-wing VTOL.
    Vtol,
    /// Fusion-drive aerospace fighter.
    AerospaceFighter,
    /// Atmospheric conventional fighter.
    ConventionalFighter,
    /// Sub-200-ton small craft.
    SmallCraft,
    /// Surface-to-orbit DropShip.
    DropShip,
    /// Powered battle armor squad.
    BattleArmor,
    /// Conventional infantry platoon.
    Infantry,
}

impl UnitSubtype {
    /// Return all unit subtypes as a slice.
    pub fn all() -> &'static [UnitSubtype] {
        &[
            Self::BattleMech,
            Self::IndustrialMech,
            Self::ProtoMech,
            Self::CombatVehicle,
            Self::SupportVehicle,
            Self::Vtol,
            Self::AerospaceFighter,
            Self::ConventionalFighter,
            Self::SmallCraft,
            Self::DropShip,
            Self::BattleArmor,
            Self::Infantry,
        ]
    }

    /// The total number of unit subtypes.
    pub const COUNT: usize = 12;
}

impl std::fmt::Display for UnitSubtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BattleMech => "battle_mech",
            Self::IndustrialMech => "industrial_mech",
            Self::ProtoMech => "proto_mech",
            Self::CombatVehicle => "combat_vehicle",
            Self::SupportVehicle => "support_vehicle",
            Self::Vtol => "vtol",
            Self::AerospaceFighter => "aerospace_fighter",
            Self::ConventionalFighter => "conventional_fighter",
            Self::SmallCraft => "small_craft",
            Self::DropShip => "drop_ship",
            Self::BattleArmor => "battle_armor",
            Self::Infantry => "infantry",
        };
        write!(f, "{s}")
    }
}

impl FromStr for UnitSubtype {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "battle_mech" => Ok(Self::BattleMech),
            "industrial_mech" => Ok(Self::IndustrialMech),
            "proto_mech" => Ok(Self::ProtoMech),
            "combat_vehicle" => Ok(Self::CombatVehicle),
            "support_vehicle" => Ok(Self::SupportVehicle),
            "vtol" => Ok(Self::Vtol),
            "aerospace_fighter" => Ok(Self::AerospaceFighter),
            "conventional_fighter" => Ok(Self::ConventionalFighter),
            "small_craft" => Ok(Self::SmallCraft),
            "drop_ship" => Ok(Self::DropShip),
            "battle_armor" => Ok(Self::BattleArmor),
            "infantry" => Ok(Self::Infantry),
            other => Err(ParseError::UnknownUnitSubtype(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit trait
// ---------------------------------------------------------------------------

/// The engine-facing surface of a subject unit.
///
/// The engine needs exactly one fact about the unit being validated: its
/// subtype. Everything else a unit exposes is read by concrete rules, never
/// by the engine itself.
pub trait Unit {
    /// The specific kind of this unit.
    fn subtype(&self) -> UnitSubtype;
}

// ---------------------------------------------------------------------------
// CategoryMapper
// ---------------------------------------------------------------------------

/// Maps each unit subtype to its coarse category.
///
/// Implementations must be total and stable. The mapper runs once per
/// resolution and once per validation pass, so no caching is required of it.
pub trait CategoryMapper: Send + Sync {
    /// The category the given subtype belongs to.
    fn category_of(&self, subtype: UnitSubtype) -> UnitCategory;
}

/// The standard subtype-to-category mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCategoryMap;

impl CategoryMapper for StandardCategoryMap {
    fn category_of(&self, subtype: UnitSubtype) -> UnitCategory {
        match subtype {
            UnitSubtype::BattleMech | UnitSubtype::IndustrialMech | UnitSubtype::ProtoMech => {
                UnitCategory::Mech
            }
            UnitSubtype::CombatVehicle | UnitSubtype::SupportVehicle | UnitSubtype::Vtol => {
                UnitCategory::Vehicle
            }
            UnitSubtype::AerospaceFighter
            | UnitSubtype::ConventionalFighter
            | UnitSubtype::SmallCraft
            | UnitSubtype::DropShip => UnitCategory::Aerospace,
            UnitSubtype::BattleArmor | UnitSubtype::Infantry => UnitCategory::Infantry,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
