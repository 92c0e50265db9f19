//! # The Standard Rule Catalog
//!
//! Construction-legality rules for the stock unit subtypes, expressed as
//! declarative defs over [`UnitSheet`]. Universal rules carry the checks
//! every unit answers to; category and subtype rules tighten them where a
//! chassis family has its own constraints.
//!
//! The catalog leans on the registry's inheritance machinery rather than
//! on conditionals inside rule bodies: vehicles *override* the frame slot
//! check with their own budget, and BattleMechs *extend* the armor check
//! with the head location limit.

use serde_json::json;

use mekforge_core::{Finding, RuleCategory, RuleEvaluation, UnitCategory, UnitSubtype};
use mekforge_engine::{RegistryError, RuleDef, RuleRegistry, Validator};

use crate::sheet::{TechBase, UnitSheet};

/// Stable ids of the standard rules, for skip lists and lookups.
pub mod ids {
    /// Universal tonnage window check.
    pub const TONNAGE_RANGE: &str = "tonnage_range";
    /// Universal mounted-weight budget check.
    pub const WEIGHT_BUDGET: &str = "weight_budget";
    /// Universal armor point capacity check.
    pub const ARMOR_CAPACITY: &str = "armor_capacity";
    /// Universal critical slot capacity check.
    pub const SLOT_CAPACITY: &str = "slot_capacity";
    /// Universal technology base consistency check.
    pub const TECH_BASE_CONSISTENCY: &str = "tech_base_consistency";
    /// Mech engine rating check.
    pub const ENGINE_RATING_LIMIT: &str = "engine_rating_limit";
    /// Mech heat balance check.
    pub const HEAT_DISSIPATION: &str = "heat_dissipation";
    /// Vehicle replacement for the frame slot check.
    pub const VEHICLE_SLOT_CAPACITY: &str = "vehicle_slot_capacity";
    /// BattleMech head armor extension of the armor check.
    pub const HEAD_ARMOR_LIMIT: &str = "head_armor_limit";
    /// VTOL rotor presence check.
    pub const ROTOR_REQUIRED: &str = "rotor_required";
}

/// Tolerance when comparing summed tonnages.
const WEIGHT_EPSILON: f64 = 1e-6;
/// Armor points one ton of standard plate provides.
const ARMOR_POINTS_PER_TON: f64 = 16.0;
/// Critical slots available on a standard biped frame.
const FRAME_SLOT_LIMIT: u32 = 78;
/// Highest fusion engine rating in production.
const ENGINE_RATING_CEILING: u32 = 400;
/// Armor point ceiling for a head location.
const HEAD_ARMOR_MAX: u32 = 9;
/// Scratch key for the summed equipment weight, shared across rules within
/// a pass.
const SCRATCH_EQUIPMENT_WEIGHT: &str = "equipment_weight";

/// The legal tonnage window for a subtype, inclusive on both ends.
pub fn tonnage_limits(subtype: UnitSubtype) -> (f64, f64) {
    match subtype {
        UnitSubtype::BattleMech => (20.0, 100.0),
        UnitSubtype::IndustrialMech => (10.0, 100.0),
        UnitSubtype::ProtoMech => (2.0, 9.0),
        UnitSubtype::CombatVehicle => (1.0, 100.0),
        UnitSubtype::SupportVehicle => (1.0, 300.0),
        UnitSubtype::Vtol => (1.0, 30.0),
        UnitSubtype::AerospaceFighter => (5.0, 100.0),
        UnitSubtype::ConventionalFighter => (5.0, 50.0),
        UnitSubtype::SmallCraft => (100.0, 200.0),
        UnitSubtype::DropShip => (200.0, 100_000.0),
        UnitSubtype::BattleArmor => (0.4, 2.0),
        UnitSubtype::Infantry => (0.1, 10.0),
    }
}

// ---------------------------------------------------------------------------
// Universal rules
// ---------------------------------------------------------------------------

fn tonnage_range() -> RuleDef<UnitSheet> {
    RuleDef::<UnitSheet>::new(
        ids::TONNAGE_RANGE,
        "Tonnage Range",
        RuleCategory::Weight,
        5,
        |ctx| {
            let sheet = ctx.entity();
            if !sheet.tonnage.is_finite() || sheet.tonnage <= 0.0 {
                return RuleEvaluation::fail(
                    Finding::critical(
                        RuleCategory::Weight,
                        format!("tonnage {} is not a positive number", sheet.tonnage),
                    )
                    .with_field("tonnage"),
                );
            }
            let (min, max) = tonnage_limits(ctx.subtype());
            if sheet.tonnage < min || sheet.tonnage > max {
                return RuleEvaluation::fail(
                    Finding::error(
                        RuleCategory::Weight,
                        format!(
                            "tonnage {} is outside the {min}-{max} ton window for {}",
                            sheet.tonnage,
                            ctx.subtype()
                        ),
                    )
                    .with_field("tonnage"),
                );
            }
            RuleEvaluation::pass()
        },
    )
    .with_description("Chassis tonnage must be positive and inside the subtype's legal window.")
}

fn weight_budget() -> RuleDef<UnitSheet> {
    RuleDef::<UnitSheet>::new(
        ids::WEIGHT_BUDGET,
        "Weight Budget",
        RuleCategory::Weight,
        10,
        |ctx| {
            let sheet = ctx.entity();
            let equipment_weight = ctx
                .cached_or_compute(SCRATCH_EQUIPMENT_WEIGHT, || json!(sheet.equipment_weight()))
                .as_f64()
                .unwrap_or_else(|| sheet.equipment_weight());
            let used = sheet.armor_tons + equipment_weight;
            if used > sheet.tonnage + WEIGHT_EPSILON {
                return RuleEvaluation::fail(
                    Finding::error(
                        RuleCategory::Weight,
                        format!(
                            "mounted weight {used} tons exceeds the {} ton chassis",
                            sheet.tonnage
                        ),
                    )
                    .with_detail(json!({
                        "budget": sheet.tonnage,
                        "armor": sheet.armor_tons,
                        "equipment": equipment_weight,
                    })),
                );
            }
            RuleEvaluation::pass()
        },
    )
    .with_description("Armor and equipment together must fit the chassis tonnage.")
}

fn armor_capacity() -> RuleDef<UnitSheet> {
    RuleDef::<UnitSheet>::new(
        ids::ARMOR_CAPACITY,
        "Armor Capacity",
        RuleCategory::Armor,
        20,
        |ctx| {
            let sheet = ctx.entity();
            let capacity = sheet.armor_tons * ARMOR_POINTS_PER_TON;
            if f64::from(sheet.armor_points) > capacity + WEIGHT_EPSILON {
                return RuleEvaluation::fail(
                    Finding::error(
                        RuleCategory::Armor,
                        format!(
                            "{} armor points allocated but {} tons of plate provide only {capacity}",
                            sheet.armor_points, sheet.armor_tons
                        ),
                    )
                    .with_field("armor_points"),
                );
            }
            RuleEvaluation::pass()
        },
    )
    .with_description("Allocated armor points must not exceed what the mounted plate provides.")
}

fn slot_capacity() -> RuleDef<UnitSheet> {
    RuleDef::<UnitSheet>::new(
        ids::SLOT_CAPACITY,
        "Slot Capacity",
        RuleCategory::Slots,
        30,
        |ctx| {
            let used = ctx.entity().equipment_slots();
            if used > FRAME_SLOT_LIMIT {
                return RuleEvaluation::fail(
                    Finding::error(
                        RuleCategory::Slots,
                        format!("{used} critical slots used, the frame has {FRAME_SLOT_LIMIT}"),
                    )
                    .with_field("equipment"),
                );
            }
            RuleEvaluation::pass()
        },
    )
    .with_description("Equipment must fit the frame's critical slots.")
}

fn tech_base_consistency() -> RuleDef<UnitSheet> {
    RuleDef::<UnitSheet>::new(
        ids::TECH_BASE_CONSISTENCY,
        "Tech Base Consistency",
        RuleCategory::Tech,
        40,
        |ctx| {
            let sheet = ctx.entity();
            if sheet.tech_base == TechBase::Mixed {
                return RuleEvaluation::pass();
            }
            let mismatched: Vec<&str> = sheet
                .equipment
                .iter()
                .filter(|item| item.tech.is_some_and(|tech| tech != sheet.tech_base))
                .map(|item| item.name.as_str())
                .collect();
            if mismatched.is_empty() {
                return RuleEvaluation::pass();
            }
            RuleEvaluation::pass_with([Finding::warning(
                RuleCategory::Tech,
                format!(
                    "{} equipment pieces do not match the {} chassis tech base",
                    mismatched.len(),
                    sheet.tech_base
                ),
            )
            .with_field("equipment")
            .with_detail(json!({ "mismatched": mismatched }))])
        },
    )
    .with_description("Equipment tech bases should match the chassis unless it is mixed-tech.")
}

// ---------------------------------------------------------------------------
// Category rules
// ---------------------------------------------------------------------------

fn engine_rating_limit() -> RuleDef<UnitSheet> {
    RuleDef::<UnitSheet>::new(
        ids::ENGINE_RATING_LIMIT,
        "Engine Rating Limit",
        RuleCategory::Engine,
        15,
        |ctx| {
            let sheet = ctx.entity();
            let mut findings = Vec::new();
            if sheet.walk_mp == 0 {
                findings.push(
                    Finding::error(RuleCategory::Engine, "walking MP must be at least 1")
                        .with_field("walk_mp"),
                );
            } else {
                let required = sheet.tonnage * f64::from(sheet.walk_mp);
                if (f64::from(sheet.engine_rating) - required).abs() > WEIGHT_EPSILON {
                    findings.push(
                        Finding::error(
                            RuleCategory::Engine,
                            format!(
                                "engine rating {} does not give walking MP {} at {} tons (needs {required})",
                                sheet.engine_rating, sheet.walk_mp, sheet.tonnage
                            ),
                        )
                        .with_field("engine_rating"),
                    );
                }
            }
            if sheet.engine_rating > ENGINE_RATING_CEILING {
                findings.push(
                    Finding::error(
                        RuleCategory::Engine,
                        format!(
                            "engine rating {} exceeds the {ENGINE_RATING_CEILING} production ceiling",
                            sheet.engine_rating
                        ),
                    )
                    .with_field("engine_rating"),
                );
            }
            if findings.is_empty() {
                RuleEvaluation::pass()
            } else {
                RuleEvaluation::fail_with(findings)
            }
        },
    )
    .with_description("The engine rating must equal tonnage times walking MP and stay in production range.")
}

fn heat_dissipation() -> RuleDef<UnitSheet> {
    RuleDef::<UnitSheet>::new(
        ids::HEAT_DISSIPATION,
        "Heat Dissipation",
        RuleCategory::Heat,
        50,
        |ctx| {
            let sheet = ctx.entity();
            let generated = sheet.heat_generated();
            let capacity = i64::from(sheet.heat_sinks);
            if i64::from(generated) > capacity {
                return RuleEvaluation::pass_with([Finding::warning(
                    RuleCategory::Heat,
                    format!(
                        "alpha strike generates {generated} heat against {capacity} sinks"
                    ),
                )
                .with_field("heat_sinks")
                .with_detail(json!({ "generated": generated, "capacity": capacity }))]);
            }
            RuleEvaluation::pass()
        },
    )
    .with_description("Firing everything at once should not outrun the heat sinks.")
}

fn vehicle_slot_capacity() -> RuleDef<UnitSheet> {
    RuleDef::<UnitSheet>::new(
        ids::VEHICLE_SLOT_CAPACITY,
        "Vehicle Slot Capacity",
        RuleCategory::Slots,
        30,
        |ctx| {
            let sheet = ctx.entity();
            // Vehicles mount into body slots, one per five tons, never
            // fewer than five.
            let frame = (sheet.tonnage / 5.0).floor().max(5.0) as u32;
            let used = sheet.equipment_slots();
            if used > frame {
                return RuleEvaluation::fail(
                    Finding::error(
                        RuleCategory::Slots,
                        format!("{used} body slots used, a {} ton hull has {frame}", sheet.tonnage),
                    )
                    .with_field("equipment"),
                );
            }
            RuleEvaluation::pass()
        },
    )
    .with_description("Equipment must fit the hull's body slots, one per five tons of hull.")
    .overrides(ids::SLOT_CAPACITY)
}

// ---------------------------------------------------------------------------
// Subtype rules
// ---------------------------------------------------------------------------

fn head_armor_limit() -> RuleDef<UnitSheet> {
    RuleDef::<UnitSheet>::new(
        ids::HEAD_ARMOR_LIMIT,
        "Head Armor Limit",
        RuleCategory::Armor,
        21,
        |ctx| {
            let Some(head) = ctx.entity().head_armor_points else {
                return RuleEvaluation::pass();
            };
            if head > HEAD_ARMOR_MAX {
                return RuleEvaluation::fail(
                    Finding::error(
                        RuleCategory::Armor,
                        format!("head armor {head} exceeds the {HEAD_ARMOR_MAX} point maximum"),
                    )
                    .with_field("head_armor_points"),
                );
            }
            RuleEvaluation::pass()
        },
    )
    .with_description("A BattleMech head holds at most nine armor points.")
    .extends(ids::ARMOR_CAPACITY)
}

fn rotor_required() -> RuleDef<UnitSheet> {
    RuleDef::<UnitSheet>::new(
        ids::ROTOR_REQUIRED,
        "Rotor Required",
        RuleCategory::Equipment,
        35,
        |ctx| {
            let has_rotor = ctx
                .entity()
                .equipment
                .iter()
                .any(|item| item.name.to_ascii_lowercase().contains("rotor"));
            if !has_rotor {
                return RuleEvaluation::fail(
                    Finding::error(
                        RuleCategory::Equipment,
                        "no rotor assembly mounted on a VTOL chassis",
                    )
                    .with_field("equipment"),
                );
            }
            RuleEvaluation::pass()
        },
    )
    .with_description("A VTOL must mount a rotor assembly.")
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// Registers the full standard catalog into a registry.
pub fn register_standard_rules(
    registry: &mut RuleRegistry<UnitSheet>,
) -> Result<(), RegistryError> {
    registry.register_universal(tonnage_range())?;
    registry.register_universal(weight_budget())?;
    registry.register_universal(armor_capacity())?;
    registry.register_universal(slot_capacity())?;
    registry.register_universal(tech_base_consistency())?;

    registry.register_category(UnitCategory::Mech, engine_rating_limit())?;
    registry.register_category(UnitCategory::Mech, heat_dissipation())?;
    registry.register_category(UnitCategory::Vehicle, vehicle_slot_capacity())?;

    registry.register_subtype(UnitSubtype::BattleMech, head_armor_limit())?;
    registry.register_subtype(UnitSubtype::Vtol, rotor_required())?;
    Ok(())
}

/// A validator loaded with the standard catalog.
pub fn standard_validator() -> Result<Validator<UnitSheet>, RegistryError> {
    let mut registry = RuleRegistry::new();
    register_standard_rules(&mut registry)?;
    Ok(Validator::new(registry))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
