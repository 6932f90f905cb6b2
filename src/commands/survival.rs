//! The `survival` subcommand: Monte Carlo government-survival statistics
//! for a given strain/stability combination.

use std::error::Error;

use clap::Args;
use colored::*;

use electoral_sim::engine::government::simulate_government_survival;
use electoral_sim::CurveModel;

#[derive(Args, Debug)]
pub struct SurvivalArgs {
    /// Coalition policy strain
    #[clap(long, default_value_t = 0.3)]
    pub strain: f64,
    /// Coalition stability score (0-1)
    #[clap(long, default_value_t = 0.7)]
    pub stability: f64,
    /// Collapse model: sigmoid, linear or exponential
    #[clap(short, long, default_value = "sigmoid")]
    pub model: String,
    /// Maximum term in months
    #[clap(long, default_value_t = 60)]
    pub max_term: u32,
    /// Number of Monte Carlo runs
    #[clap(short, long, default_value_t = 1000)]
    pub simulations: usize,
    /// Random seed for reproducibility
    #[clap(long)]
    pub seed: Option<u64>,
}

pub fn survival(args: &SurvivalArgs) -> Result<(), Box<dyn Error>> {
    let model = args.model.parse::<CurveModel>()?;
    let stats = simulate_government_survival(
        args.strain,
        args.stability,
        model,
        args.max_term,
        args.simulations,
        args.seed,
    );

    println!(
        "{} ({} runs, {} model)",
        "Government Survival".bright_cyan().bold(),
        args.simulations.to_string().bright_yellow(),
        model.to_string().bright_cyan()
    );
    println!("{}", "-".repeat(40).bright_cyan());
    println!(
        "Mean survival:     {} months",
        format!("{:.1}", stats.mean_survival).bright_white()
    );
    println!(
        "Median survival:   {} months",
        format!("{:.1}", stats.median_survival).bright_white()
    );
    println!(
        "Std deviation:     {} months",
        format!("{:.1}", stats.std_survival).bright_white()
    );
    println!(
        "Full term reached: {}",
        format!("{:.1}%", stats.full_term_prob * 100.0).bright_green()
    );
    println!(
        "Early collapse:    {}",
        format!("{:.1}%", stats.early_collapse_prob * 100.0).bright_red()
    );
    println!(
        "Range:             {}-{} months",
        stats.min_survival.to_string().bright_white(),
        stats.max_survival.to_string().bright_white()
    );
    Ok(())
}
