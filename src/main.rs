mod commands;

use clap::{Parser, Subcommand};
use colored::*;

use crate::commands::{list_presets, run, survival, RunArgs, SurvivalArgs};

#[derive(Parser)]
#[clap(name = "electoral-sim", about = "Agent-based electoral simulation")]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an election simulation.
    Run(RunArgs),
    /// List available country presets.
    ListPresets,
    /// Monte Carlo government-survival statistics.
    Survival(SurvivalArgs),
}

fn main() {
    let opts = Opts::parse();

    let outcome = match opts.command {
        Command::Run(args) => run(&args),
        Command::ListPresets => {
            list_presets();
            Ok(())
        }
        Command::Survival(args) => survival(&args),
    };

    if let Err(e) = outcome {
        eprintln!("{} {}", "❌".red(), e.to_string().bright_red());
        std::process::exit(1);
    }
}
