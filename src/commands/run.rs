//! The `run` subcommand: build a configuration from flags or a preset,
//! run one election, print the results and optionally persist a JSON
//! summary.

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use colored::*;
use instant::Instant;

use electoral_sim::presets::preset;
use electoral_sim::report::SimulationReport;
use electoral_sim::{AllocationMethod, Config, ElectionModel, ElectoralSystem};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Number of voters
    #[clap(short = 'n', long, default_value_t = 100_000)]
    pub voters: usize,
    /// Number of constituencies (overrides the preset's chamber size)
    #[clap(short, long)]
    pub constituencies: Option<usize>,
    /// Electoral system: FPTP or PR
    #[clap(short, long)]
    pub system: Option<String>,
    /// PR allocation method: dhondt, sainte_lague, hare or droop
    #[clap(short, long)]
    pub allocation: Option<String>,
    /// Electoral threshold (0-1)
    #[clap(short, long)]
    pub threshold: Option<f64>,
    /// Use a country preset
    #[clap(short, long)]
    pub preset: Option<String>,
    /// Random seed for reproducibility
    #[clap(long)]
    pub seed: Option<u64>,
    /// Output file (JSON)
    #[clap(short, long)]
    pub output: Option<PathBuf>,
    /// Suppress console output
    #[clap(short, long)]
    pub quiet: bool,
}

/// Timed pipeline stages, printed as a performance summary after the run.
struct StageTimer {
    stages: Vec<(&'static str, u128)>,
}

impl StageTimer {
    fn new() -> Self {
        StageTimer { stages: Vec::new() }
    }

    fn time<T>(&mut self, label: &'static str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let value = f();
        self.stages.push((label, start.elapsed().as_millis()));
        value
    }

    fn print_summary(&self) {
        println!("\n{}", "Performance Summary".bright_cyan().bold());
        println!("{}", "-".repeat(40).bright_cyan());
        let mut total = 0u128;
        for (label, ms) in &self.stages {
            total += ms;
            println!("{:<24} {} ms", label, ms.to_string().bright_white());
        }
        println!(
            "{:<24} {} ms",
            "total".bold(),
            total.to_string().bright_green().bold()
        );
    }
}

fn build_config(args: &RunArgs) -> Result<Config, Box<dyn Error>> {
    let mut config = match &args.preset {
        Some(name) => preset(name, args.voters)?,
        None => Config {
            n_voters: args.voters,
            ..Config::default()
        },
    };

    if let Some(constituencies) = args.constituencies {
        config.n_constituencies = constituencies;
    }
    if let Some(system) = &args.system {
        config.electoral_system = system.parse::<ElectoralSystem>()?;
    }
    if let Some(allocation) = &args.allocation {
        config.allocation_method = allocation.parse::<AllocationMethod>()?;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let config = build_config(args)?;
    let mut timer = StageTimer::new();

    if !args.quiet {
        println!(
            "🗳️  Simulating {} voters across {} constituencies ({})",
            config.n_voters.to_string().bright_yellow(),
            config.n_constituencies.to_string().bright_yellow(),
            config.electoral_system.to_string().bright_cyan()
        );
    }

    let mut model = timer.time("population generation", || ElectionModel::new(config))?;
    let result = timer.time("election", || model.run_election());

    if !args.quiet {
        println!("\n{}", "Results".bright_cyan().bold());
        println!("{}", "-".repeat(40).bright_cyan());
        println!("Turnout: {}", format!("{:.1}%", result.turnout * 100.0).bright_green());

        for (i, name) in model.parties.names.iter().enumerate() {
            println!(
                "  {:<20} {:>10} votes  {:>4} seats",
                name,
                result.votes[i].to_string().bright_white(),
                result.seats[i].to_string().bright_yellow()
            );
        }

        println!(
            "\nGallagher index: {}",
            format!("{:.4}", result.gallagher).bright_white()
        );
        println!(
            "ENP: {} (votes), {} (seats)",
            format!("{:.2}", result.enp_votes).bright_white(),
            format!("{:.2}", result.enp_seats).bright_white()
        );
    }

    if let Some(path) = &args.output {
        let report = SimulationReport::new(model.config(), &model.parties, &result);
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)?;
        if !args.quiet {
            println!(
                "\n✅ Report written to {}",
                path.display().to_string().bright_green()
            );
        }
    }

    if !args.quiet {
        timer.print_summary();
    }
    Ok(())
}
