//! # Rules Subcommand
//!
//! Lists the standard catalog. Without a subtype this is the raw
//! registration listing grouped by scope, disabled rules included; with
//! one, it is the effective rule set the validator would actually run, in
//! execution order.

use clap::Args;

use mekforge_core::{UnitCategory, UnitSubtype};
use mekforge_engine::{RuleRegistry, ValidationRule};
use mekforge_rules::{standard_validator, UnitSheet};

/// Arguments for the rules subcommand.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Show the effective rule set for this subtype, in execution order.
    #[arg(long, value_name = "SUBTYPE")]
    pub subtype: Option<String>,
}

/// Runs the subcommand and returns the process exit code.
pub fn run(args: &RulesArgs) -> anyhow::Result<u8> {
    let validator = standard_validator()?;
    let subtype = args
        .subtype
        .as_deref()
        .map(str::parse::<UnitSubtype>)
        .transpose()?;
    for line in render(validator.registry(), subtype) {
        println!("{line}");
    }
    Ok(0)
}

fn render(registry: &RuleRegistry<UnitSheet>, subtype: Option<UnitSubtype>) -> Vec<String> {
    match subtype {
        Some(subtype) => render_effective(registry, subtype),
        None => render_registrations(registry),
    }
}

fn render_effective(registry: &RuleRegistry<UnitSheet>, subtype: UnitSubtype) -> Vec<String> {
    let resolved = registry.rules_for_subtype(subtype);
    let mut lines = vec![format!(
        "effective rules for {subtype} ({} of {} registered):",
        resolved.len(),
        registry.rule_count()
    )];
    for rule in resolved.iter() {
        lines.push(rule_line(rule.as_ref(), false));
    }
    lines
}

fn render_registrations(registry: &RuleRegistry<UnitSheet>) -> Vec<String> {
    let mut lines = vec!["universal:".to_string()];
    for rule in registry.universal_rules() {
        lines.push(listing_line(registry, rule.as_ref()));
    }
    for &category in UnitCategory::all() {
        let rules = registry.category_rules(category);
        if rules.is_empty() {
            continue;
        }
        lines.push(format!("category {category}:"));
        for rule in rules {
            lines.push(listing_line(registry, rule.as_ref()));
        }
    }
    for &subtype in UnitSubtype::all() {
        let rules = registry.subtype_rules(subtype);
        if rules.is_empty() {
            continue;
        }
        lines.push(format!("subtype {subtype}:"));
        for rule in rules {
            lines.push(listing_line(registry, rule.as_ref()));
        }
    }
    lines
}

fn listing_line(
    registry: &RuleRegistry<UnitSheet>,
    rule: &dyn ValidationRule<UnitSheet>,
) -> String {
    let disabled = registry.is_enabled(rule.id()) == Some(false);
    rule_line(rule, disabled)
}

fn rule_line(rule: &dyn ValidationRule<UnitSheet>, disabled: bool) -> String {
    let mut line = format!(
        "  {:>3}  {}  [{}]  {}",
        rule.priority(),
        rule.id(),
        rule.category(),
        rule.name()
    );
    if let Some(target) = rule.overrides() {
        line.push_str(&format!("  (overrides {target})"));
    }
    if let Some(target) = rule.extends() {
        line.push_str(&format!("  (extends {target})"));
    }
    if disabled {
        line.push_str("  [disabled]");
    }
    line
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mekforge_core::{RuleCategory, RuleEvaluation, RuleId};
    use mekforge_engine::RuleDef;

    #[test]
    fn registration_listing_covers_every_scope() {
        let validator = standard_validator().unwrap();
        let lines = render(validator.registry(), None);

        assert!(lines.contains(&"universal:".to_string()));
        assert!(lines.contains(&"category mech:".to_string()));
        assert!(lines.contains(&"category vehicle:".to_string()));
        assert!(lines.contains(&"subtype battle_mech:".to_string()));
        assert!(lines.contains(&"subtype vtol:".to_string()));
        assert!(lines.iter().any(|line| line.contains("tonnage_range")));
        assert!(lines.iter().any(|line| line.contains("(overrides slot_capacity)")));
        assert!(lines.iter().any(|line| line.contains("(extends armor_capacity)")));
    }

    #[test]
    fn effective_listing_reflects_resolution() {
        let validator = standard_validator().unwrap();
        let lines = render(validator.registry(), Some(UnitSubtype::Vtol));

        assert_eq!(lines[0], "effective rules for vtol (6 of 10 registered):");
        assert!(lines.iter().any(|line| line.contains("vehicle_slot_capacity")));
        assert!(
            !lines.iter().any(|line| line.contains("  slot_capacity  ")),
            "the overridden frame check must not appear"
        );
    }

    #[test]
    fn disabled_rules_are_marked_in_the_listing() {
        let mut registry: RuleRegistry<UnitSheet> = RuleRegistry::new();
        registry
            .register_universal(RuleDef::new(
                "quiet",
                "Quiet",
                RuleCategory::General,
                10,
                |_| RuleEvaluation::pass(),
            ))
            .unwrap();
        registry.disable_rule(&RuleId::from("quiet"));

        let lines = render(&registry, None);
        let quiet = lines
            .iter()
            .find(|line| line.contains("quiet"))
            .expect("quiet rule listed");
        assert!(quiet.contains("[disabled]"));
    }

    #[test]
    fn run_accepts_a_known_subtype() {
        let args = RulesArgs {
            subtype: Some("vtol".to_string()),
        };
        assert_eq!(run(&args).unwrap(), 0);
    }

    #[test]
    fn run_rejects_an_unknown_subtype() {
        let args = RulesArgs {
            subtype: Some("warship".to_string()),
        };
        let err = run(&args).unwrap_err();
        assert!(format!("{err}").contains("warship"));
    }
}
