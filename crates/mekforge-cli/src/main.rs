//! # mekforge CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::process::ExitCode;

use clap::Parser;

/// MekForge unit validation toolchain.
///
/// Validates unit record sheets against the standard construction rules
/// and inspects the rule catalog behind them.
#[derive(Parser, Debug)]
#[command(name = "mekforge", version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate unit record sheets against the standard rules.
    Validate(mekforge_cli::validate::ValidateArgs),
    /// List registered rules or a subtype's effective rule set.
    Rules(mekforge_cli::rules::RulesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Validate(args) => mekforge_cli::validate::run(&args),
        Commands::Rules(args) => mekforge_cli::rules::run(&args),
    };

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(2)
        }
    }
}

/// RUST_LOG wins when set; the -v count only supplies the fallback level.
fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
