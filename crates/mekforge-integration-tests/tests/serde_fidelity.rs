//! # Campaign 1: Serde Round-Trip Fidelity
//!
//! Verifies that every type deriving both Serialize and Deserialize
//! survives a JSON round-trip without data loss, and pins the wire names
//! external consumers depend on.

use serde_json::json;

// =========================================================================
// mekforge-core closed enums
// =========================================================================

use mekforge_core::{RuleCategory, Severity, Timestamp, UnitCategory, UnitSubtype};

#[test]
fn severity_wire_names_match_display() {
    for &severity in Severity::all() {
        let encoded = serde_json::to_string(&severity).unwrap();
        assert_eq!(encoded, format!("\"{severity}\""));
        let back: Severity = serde_json::from_str(&encoded).unwrap();
        assert_eq!(back, severity);
    }
}

#[test]
fn rule_category_wire_names_match_display() {
    for &category in RuleCategory::all() {
        let encoded = serde_json::to_string(&category).unwrap();
        assert_eq!(encoded, format!("\"{category}\""));
        let back: RuleCategory = serde_json::from_str(&encoded).unwrap();
        assert_eq!(back, category);
    }
}

#[test]
fn unit_taxonomy_wire_names_match_display() {
    for &category in UnitCategory::all() {
        let encoded = serde_json::to_string(&category).unwrap();
        assert_eq!(encoded, format!("\"{category}\""));
    }
    for &subtype in UnitSubtype::all() {
        let encoded = serde_json::to_string(&subtype).unwrap();
        assert_eq!(encoded, format!("\"{subtype}\""));
        let back: UnitSubtype = serde_json::from_str(&encoded).unwrap();
        assert_eq!(back, subtype);
    }
}

#[test]
fn timestamp_round_trips_at_second_precision() {
    let ts = Timestamp::parse("2026-03-01T12:30:00Z").unwrap();
    let encoded = serde_json::to_string(&ts).unwrap();
    let back: Timestamp = serde_json::from_str(&encoded).unwrap();
    assert_eq!(back, ts);
}

// =========================================================================
// mekforge-core findings and reports
// =========================================================================

use mekforge_core::{Finding, RuleEvaluation, RuleId, RuleResult, ValidationReport};

#[test]
fn finding_omits_absent_optional_fields() {
    let bare = Finding::info(RuleCategory::General, "plain note");
    let value = serde_json::to_value(&bare).unwrap();
    assert!(value.get("field").is_none(), "field key must be omitted");
    assert!(value.get("detail").is_none(), "detail key must be omitted");
}

#[test]
fn finding_with_field_and_detail_round_trips() {
    let full = Finding::error(RuleCategory::Armor, "armor short")
        .with_field("armor_points")
        .with_detail(json!({ "needed": 12, "present": 4 }));
    let encoded = serde_json::to_string(&full).unwrap();
    let back: Finding = serde_json::from_str(&encoded).unwrap();
    assert_eq!(back, full);
}

#[test]
fn rule_result_round_trips_with_mixed_severities() {
    let evaluation = RuleEvaluation::fail_with([
        Finding::critical(RuleCategory::Weight, "no tonnage"),
        Finding::error(RuleCategory::Weight, "over budget"),
        Finding::warning(RuleCategory::Heat, "runs hot"),
        Finding::info(RuleCategory::General, "note"),
    ]);
    let result = RuleResult::from_evaluation(RuleId::new("demo"), "Demo", evaluation, 42);

    let encoded = serde_json::to_string(&result).unwrap();
    let back: RuleResult = serde_json::from_str(&encoded).unwrap();
    assert_eq!(back, result);
    assert_eq!(back.errors.len(), 2);
    assert_eq!(back.warnings.len(), 1);
    assert_eq!(back.infos.len(), 1);
}

#[test]
fn validation_report_round_trips() {
    let failing = RuleResult::from_evaluation(
        RuleId::new("broken"),
        "Broken",
        RuleEvaluation::fail(Finding::error(RuleCategory::Slots, "too many")),
        7,
    );
    let passing = RuleResult::from_evaluation(
        RuleId::new("fine"),
        "Fine",
        RuleEvaluation::pass(),
        3,
    );
    let report = ValidationReport::assemble(vec![failing, passing], true);

    let encoded = serde_json::to_string(&report).unwrap();
    let back: ValidationReport = serde_json::from_str(&encoded).unwrap();
    assert_eq!(back, report);
    assert!(back.truncated);
}

// =========================================================================
// mekforge-rules sheet types
// =========================================================================

use mekforge_rules::{Equipment, TechBase, UnitSheet};

#[test]
fn tech_base_wire_names_match_display() {
    for tech in [TechBase::InnerSphere, TechBase::Clan, TechBase::Mixed] {
        let encoded = serde_json::to_string(&tech).unwrap();
        assert_eq!(encoded, format!("\"{tech}\""));
    }
}

#[test]
fn unit_sheet_round_trips_with_full_loadout() {
    let sheet = UnitSheet::new(
        "Griffin GRF-1N",
        UnitSubtype::BattleMech,
        TechBase::InnerSphere,
        55.0,
    )
    .with_engine(275, 5)
    .with_armor(9.5, 152)
    .with_head_armor(9)
    .with_heat_sinks(12)
    .with_equipment(Equipment::new("PPC", 7.0, 3).with_heat(10))
    .with_equipment(Equipment::new("LRM 10", 5.0, 2).with_heat(4).with_tech(TechBase::InnerSphere));

    let encoded = serde_json::to_string(&sheet).unwrap();
    let back: UnitSheet = serde_json::from_str(&encoded).unwrap();
    assert_eq!(back, sheet);
}

#[test]
fn sparse_sheet_input_fills_defaults_and_omits_them_on_output() {
    let sheet: UnitSheet = serde_json::from_str(
        r#"{"name":"Bug","subtype":"battle_armor","tech_base":"clan","tonnage":1.0}"#,
    )
    .unwrap();
    assert_eq!(sheet.walk_mp, 0);
    assert_eq!(sheet.head_armor_points, None);
    assert!(sheet.equipment.is_empty());

    let value = serde_json::to_value(&sheet).unwrap();
    assert!(
        value.get("head_armor_points").is_none(),
        "absent head armor must stay absent on the wire"
    );
}
