//! The `list-presets` subcommand.

use colored::*;

use electoral_sim::presets::{preset_names, PRESETS};

pub fn list_presets() {
    println!("{}", "Available presets".bright_cyan().bold());
    println!("{}", "-".repeat(60).bright_cyan());
    for name in preset_names() {
        if let Some(builder) = PRESETS.get(name) {
            let config = builder(0);
            println!(
                "  {:<10} {:>4} seats  {:<5} {:>2} parties",
                name.bright_yellow(),
                config.n_constituencies.to_string().bright_white(),
                config.electoral_system.to_string().bright_cyan(),
                config.n_parties().to_string().bright_white()
            );
        }
    }
}
