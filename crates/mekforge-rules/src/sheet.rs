//! # Unit Sheets
//!
//! The concrete document model the standard catalog validates. A
//! [`UnitSheet`] is the flat record sheet of a combat unit: identity,
//! chassis numbers, and the equipment mounted on it.
//!
//! Sheets are plain serde data so they can be read from JSON or YAML
//! files. Fields beyond the identity block default sensibly, letting
//! partial sheets deserialize during authoring.

use serde::{Deserialize, Serialize};

use mekforge_core::{Unit, UnitSubtype};

/// Technology base of a chassis or a piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechBase {
    /// Inner Sphere manufacture.
    InnerSphere,
    /// Clan manufacture.
    Clan,
    /// A chassis certified for both bases.
    Mixed,
}

impl std::fmt::Display for TechBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::InnerSphere => "inner_sphere",
            Self::Clan => "clan",
            Self::Mixed => "mixed",
        };
        f.write_str(label)
    }
}

/// One piece of mounted equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    /// Display name, e.g. `"Medium Laser"`.
    pub name: String,
    /// Mounted weight in tons.
    pub weight: f64,
    /// Critical slots the item occupies.
    pub slots: u32,
    /// Heat generated per round when fired. Zero for passive items.
    #[serde(default)]
    pub heat: i32,
    /// Technology base, when the item is base-specific.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech: Option<TechBase>,
}

impl Equipment {
    /// A passive item with no heat and no tech restriction.
    pub fn new(name: impl Into<String>, weight: f64, slots: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            slots,
            heat: 0,
            tech: None,
        }
    }

    /// Sets the per-round heat.
    #[must_use]
    pub fn with_heat(mut self, heat: i32) -> Self {
        self.heat = heat;
        self
    }

    /// Restricts the item to one technology base.
    #[must_use]
    pub fn with_tech(mut self, tech: TechBase) -> Self {
        self.tech = Some(tech);
        self
    }
}

/// The record sheet of one combat unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSheet {
    /// Unit designation, e.g. `"Trebuchet TBT-5N"`.
    pub name: String,
    /// The unit's subtype, which picks its rule set.
    pub subtype: UnitSubtype,
    /// The chassis technology base.
    pub tech_base: TechBase,
    /// Chassis tonnage.
    pub tonnage: f64,
    /// Fusion engine rating. Zero for unit kinds without a rated engine.
    #[serde(default)]
    pub engine_rating: u32,
    /// Walking movement points.
    #[serde(default)]
    pub walk_mp: u32,
    /// Tons of armor mounted.
    #[serde(default)]
    pub armor_tons: f64,
    /// Total armor points allocated.
    #[serde(default)]
    pub armor_points: u32,
    /// Armor points on the head location, where the chassis has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_armor_points: Option<u32>,
    /// Heat sinks mounted.
    #[serde(default)]
    pub heat_sinks: u32,
    /// Everything mounted on the chassis.
    #[serde(default)]
    pub equipment: Vec<Equipment>,
}

impl UnitSheet {
    /// A bare sheet with everything beyond the identity block zeroed.
    pub fn new(
        name: impl Into<String>,
        subtype: UnitSubtype,
        tech_base: TechBase,
        tonnage: f64,
    ) -> Self {
        Self {
            name: name.into(),
            subtype,
            tech_base,
            tonnage,
            engine_rating: 0,
            walk_mp: 0,
            armor_tons: 0.0,
            armor_points: 0,
            head_armor_points: None,
            heat_sinks: 0,
            equipment: Vec::new(),
        }
    }

    /// Sets the engine rating and walking MP.
    #[must_use]
    pub fn with_engine(mut self, rating: u32, walk_mp: u32) -> Self {
        self.engine_rating = rating;
        self.walk_mp = walk_mp;
        self
    }

    /// Sets mounted armor tonnage and allocated points.
    #[must_use]
    pub fn with_armor(mut self, tons: f64, points: u32) -> Self {
        self.armor_tons = tons;
        self.armor_points = points;
        self
    }

    /// Sets the head location's armor points.
    #[must_use]
    pub fn with_head_armor(mut self, points: u32) -> Self {
        self.head_armor_points = Some(points);
        self
    }

    /// Sets the mounted heat sink count.
    #[must_use]
    pub fn with_heat_sinks(mut self, heat_sinks: u32) -> Self {
        self.heat_sinks = heat_sinks;
        self
    }

    /// Mounts one more piece of equipment.
    #[must_use]
    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment.push(equipment);
        self
    }

    /// Total mounted equipment weight in tons.
    pub fn equipment_weight(&self) -> f64 {
        self.equipment.iter().map(|item| item.weight).sum()
    }

    /// Total critical slots occupied by equipment.
    pub fn equipment_slots(&self) -> u32 {
        self.equipment.iter().map(|item| item.slots).sum()
    }

    /// Heat generated per round with everything firing. Heat-neutral and
    /// cooling items contribute nothing.
    pub fn heat_generated(&self) -> i32 {
        self.equipment.iter().map(|item| item.heat.max(0)).sum()
    }
}

impl Unit for UnitSheet {
    fn subtype(&self) -> UnitSubtype {
        self.subtype
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aggregates_sum_over_equipment() {
        let sheet = UnitSheet::new(
            "Testbed",
            UnitSubtype::BattleMech,
            TechBase::InnerSphere,
            50.0,
        )
        .with_equipment(Equipment::new("Medium Laser", 1.0, 1).with_heat(3))
        .with_equipment(Equipment::new("Medium Laser", 1.0, 1).with_heat(3))
        .with_equipment(Equipment::new("Ferro Plating", 2.5, 2).with_heat(-1));

        assert_eq!(sheet.equipment_weight(), 4.5);
        assert_eq!(sheet.equipment_slots(), 4);
        assert_eq!(sheet.heat_generated(), 6, "cooling items contribute nothing");
    }

    #[test]
    fn subtype_flows_through_the_unit_trait() {
        let sheet = UnitSheet::new("Skimmer", UnitSubtype::Vtol, TechBase::Clan, 25.0);
        assert_eq!(Unit::subtype(&sheet), UnitSubtype::Vtol);
    }

    #[test]
    fn partial_sheet_deserializes_with_defaults() {
        let sheet: UnitSheet = serde_json::from_value(json!({
            "name": "Bare Frame",
            "subtype": "combat_vehicle",
            "tech_base": "inner_sphere",
            "tonnage": 35.0
        }))
        .expect("minimal sheet deserializes");

        assert_eq!(sheet.subtype, UnitSubtype::CombatVehicle);
        assert_eq!(sheet.engine_rating, 0);
        assert_eq!(sheet.armor_tons, 0.0);
        assert_eq!(sheet.head_armor_points, None);
        assert!(sheet.equipment.is_empty());
    }

    #[test]
    fn sheet_round_trips_through_json() {
        let sheet = UnitSheet::new(
            "Trebuchet TBT-5N",
            UnitSubtype::BattleMech,
            TechBase::InnerSphere,
            50.0,
        )
        .with_engine(250, 5)
        .with_armor(9.0, 144)
        .with_head_armor(9)
        .with_heat_sinks(10)
        .with_equipment(Equipment::new("LRM 15", 7.0, 3).with_heat(5));

        let encoded = serde_json::to_string(&sheet).expect("serialize sheet");
        let decoded: UnitSheet = serde_json::from_str(&encoded).expect("deserialize sheet");
        assert_eq!(decoded, sheet);
    }

    #[test]
    fn absent_optionals_are_omitted_from_json() {
        let sheet = UnitSheet::new(
            "Scout",
            UnitSubtype::CombatVehicle,
            TechBase::InnerSphere,
            20.0,
        );
        let encoded = serde_json::to_string(&sheet).expect("serialize sheet");
        assert!(!encoded.contains("head_armor_points"), "got: {encoded}");
    }

    #[test]
    fn tech_base_display_matches_serde() {
        for tech in [TechBase::InnerSphere, TechBase::Clan, TechBase::Mixed] {
            let encoded = serde_json::to_string(&tech).expect("serialize tech base");
            assert_eq!(encoded, format!("\"{tech}\""));
        }
    }
}
