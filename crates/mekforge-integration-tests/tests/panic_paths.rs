//! # Campaign 2: Panic Path Assault
//!
//! Adversarial rule bodies and hostile sheet values aimed at the execution
//! fault boundary. A panicking rule must become an error finding in its
//! report entry, never a crashed pass or a poisoned registry.

use mekforge_core::{
    Finding, RuleCategory, RuleEvaluation, Severity, Unit, UnitSubtype, ValidationOptions,
};
use mekforge_engine::{RuleDef, RuleRegistry, Validator};
use serde_json::json;

#[derive(Debug)]
struct Hull;

impl Unit for Hull {
    fn subtype(&self) -> UnitSubtype {
        UnitSubtype::CombatVehicle
    }
}

fn validator_with(defs: Vec<RuleDef<Hull>>) -> Validator<Hull> {
    let mut registry = RuleRegistry::new();
    for def in defs {
        registry.register_universal(def).unwrap();
    }
    Validator::new(registry)
}

// =========================================================================
// Panic payload shapes
// =========================================================================

#[test]
fn str_panic_payload_becomes_an_error_finding() {
    let validator = validator_with(vec![RuleDef::new(
        "bomb",
        "Bomb",
        RuleCategory::Slots,
        10,
        |_| {
            panic!("wheels fell off");
        },
    )]);

    let report = validator.validate(&Hull, &ValidationOptions::new());
    assert!(!report.is_valid);
    let result = &report.results[0];
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].message, "rule execution failed: wheels fell off");
    assert_eq!(result.errors[0].severity, Severity::Error);
    assert_eq!(
        result.errors[0].category,
        RuleCategory::Slots,
        "the finding keeps the rule's own category"
    );
}

#[test]
fn formatted_panic_payload_is_preserved() {
    let validator = validator_with(vec![RuleDef::new(
        "bomb",
        "Bomb",
        RuleCategory::General,
        10,
        |_| {
            panic!("{} busted", "axle");
        },
    )]);

    let report = validator.validate(&Hull, &ValidationOptions::new());
    assert_eq!(
        report.results[0].errors[0].message,
        "rule execution failed: axle busted"
    );
}

#[test]
fn non_string_panic_payload_reports_unknown() {
    let validator = validator_with(vec![RuleDef::new(
        "bomb",
        "Bomb",
        RuleCategory::General,
        10,
        |_| std::panic::panic_any(7_u32),
    )]);

    let report = validator.validate(&Hull, &ValidationOptions::new());
    assert_eq!(
        report.results[0].errors[0].message,
        "rule execution failed: unknown panic"
    );
}

// =========================================================================
// Blast radius containment
// =========================================================================

#[test]
fn panicking_chain_link_fails_the_whole_chain_under_the_parent_id() {
    let validator = validator_with(vec![
        RuleDef::new("root", "Root", RuleCategory::General, 10, |_| {
            RuleEvaluation::pass_with([Finding::info(RuleCategory::General, "root ran")])
        }),
        RuleDef::new("spike", "Spike", RuleCategory::General, 20, |_| {
            panic!("extender blew up");
        })
        .extends("root"),
    ]);

    let report = validator.validate(&Hull, &ValidationOptions::new());
    assert_eq!(report.rule_count(), 1, "the chain is a single entry");

    let result = &report.results[0];
    assert_eq!(result.rule_id.as_str(), "root");
    assert!(!result.passed);
    assert_eq!(
        result.errors[0].message,
        "rule execution failed: extender blew up"
    );
    assert!(
        result.infos.is_empty(),
        "an unwound chain reports only the failure, not partial findings"
    );
}

#[test]
fn pass_and_registry_survive_repeated_panics() {
    let mut validator = validator_with(vec![
        RuleDef::new("steady", "Steady", RuleCategory::General, 1, |_| {
            RuleEvaluation::pass()
        }),
        RuleDef::new("bomb", "Bomb", RuleCategory::General, 2, |_| {
            panic!("again");
        }),
    ]);

    for _ in 0..3 {
        let report = validator.validate(&Hull, &ValidationOptions::new());
        assert_eq!(report.rule_count(), 2);
        assert_eq!(report.error_count, 1);
    }

    // The registry is still fully operable afterwards.
    assert!(validator.registry_mut().unregister(&"bomb".into()));
    let report = validator.validate(&Hull, &ValidationOptions::new());
    assert!(report.is_valid);
}

#[test]
fn panic_inside_a_scratch_computation_does_not_poison_the_pass() {
    let validator = validator_with(vec![
        RuleDef::new("greedy", "Greedy", RuleCategory::General, 1, |ctx| {
            let _ = ctx.cached_or_compute("shared", || panic!("compute failed"));
            RuleEvaluation::pass()
        }),
        RuleDef::new("patient", "Patient", RuleCategory::General, 2, |ctx| {
            let value = ctx.cached_or_compute("shared", || json!(11));
            if value == json!(11) {
                RuleEvaluation::pass()
            } else {
                RuleEvaluation::fail(Finding::error(RuleCategory::General, "stale scratch"))
            }
        }),
    ]);

    let report = validator.validate(&Hull, &ValidationOptions::new());
    assert_eq!(report.rule_count(), 2);
    assert!(!report.results[0].passed, "the panicking computation fails its rule");
    assert!(
        report.results[1].passed,
        "later rules can still use the scratch space"
    );
}

// =========================================================================
// Hostile sheet values through the standard catalog
// =========================================================================

use mekforge_rules::{standard_validator, Equipment, TechBase, UnitSheet};

#[test]
fn extreme_numeric_sheets_never_panic_the_catalog() {
    let validator = standard_validator().unwrap();
    let hostile = [
        UnitSheet::new("NaN", UnitSubtype::BattleMech, TechBase::InnerSphere, f64::NAN),
        UnitSheet::new("Inf", UnitSubtype::DropShip, TechBase::Mixed, f64::INFINITY),
        UnitSheet::new("Neg", UnitSubtype::Vtol, TechBase::Clan, -250.0),
        UnitSheet::new("Huge", UnitSubtype::SupportVehicle, TechBase::InnerSphere, f64::MAX)
            .with_armor(f64::MAX, u32::MAX),
        UnitSheet::new("Maxed", UnitSubtype::BattleMech, TechBase::InnerSphere, 50.0)
            .with_engine(u32::MAX, u32::MAX)
            .with_equipment(Equipment::new("Monster", f64::MAX, u32::MAX).with_heat(i32::MAX)),
    ];

    for sheet in hostile {
        let report = validator.validate(&sheet, &ValidationOptions::new());
        assert!(report.rule_count() > 0, "{}: pass must complete", sheet.name);
    }
}
