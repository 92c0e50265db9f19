//! # Validate Subcommand
//!
//! Loads unit record sheets from YAML or JSON files, runs them through the
//! standard catalog, and renders one report per file. The process exit code
//! is the worst outcome across all files.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use mekforge_core::{RuleCategory, ValidationOptions, ValidationReport};
use mekforge_rules::{standard_validator, UnitSheet};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Unit record sheet files (.yaml, .yml, or .json).
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Emit each report as pretty-printed JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Run only rules in this category (weight, armor, slots, ...).
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Rule id to skip; repeatable.
    #[arg(long = "skip", value_name = "RULE_ID")]
    pub skip: Vec<String>,

    /// Stop each file's pass after this many error findings.
    #[arg(long, value_name = "N")]
    pub max_errors: Option<usize>,
}

/// Runs the subcommand and returns the process exit code.
pub fn run(args: &ValidateArgs) -> anyhow::Result<u8> {
    let validator = standard_validator()?;
    let options = build_options(args)?;

    let mut worst = 0u8;
    for path in &args.files {
        let sheet = load_sheet(path)?;
        let report = validator.validate(&sheet, &options);
        tracing::info!(
            file = %path.display(),
            valid = report.is_valid,
            errors = report.error_count,
            "validated unit sheet"
        );

        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for line in render_text_report(path, &sheet, &report) {
                println!("{line}");
            }
        }
        worst = worst.max(exit_code(&report));
    }
    Ok(worst)
}

fn build_options(args: &ValidateArgs) -> anyhow::Result<ValidationOptions> {
    let mut options = ValidationOptions::new();
    for id in &args.skip {
        options = options.skip_rule(id.as_str());
    }
    if let Some(name) = &args.category {
        options = options.with_categories([name.parse::<RuleCategory>()?]);
    }
    if let Some(max) = args.max_errors {
        options = options.with_max_errors(max);
    }
    Ok(options)
}

/// Loads a sheet, picking the parser from the file extension. Anything
/// without a `.yaml`/`.yml` extension is treated as JSON.
pub fn load_sheet(path: &Path) -> anyhow::Result<UnitSheet> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    let sheet = if is_yaml {
        serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing {} as YAML", path.display()))?
    } else {
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing {} as JSON", path.display()))?
    };
    Ok(sheet)
}

fn exit_code(report: &ValidationReport) -> u8 {
    if report.has_critical_errors {
        2
    } else if report.is_valid {
        0
    } else {
        1
    }
}

fn render_text_report(path: &Path, sheet: &UnitSheet, report: &ValidationReport) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("{}: {} ({})", path.display(), sheet.name, sheet.subtype));
    lines.push(format!("  {}", report.summary()));
    for result in &report.results {
        for finding in result
            .errors
            .iter()
            .chain(&result.warnings)
            .chain(&result.infos)
        {
            lines.push(format!("    {}: {finding}", result.rule_id));
        }
    }
    if report.truncated {
        lines.push("    (pass stopped at the error ceiling)".to_string());
    }
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
