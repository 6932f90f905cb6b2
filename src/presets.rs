//! Country preset configurations: realistic party rosters and chamber
//! sizes for quick simulations. Each builder returns an ordinary
//! [`Config`] the caller can still override.

use std::collections::BTreeMap;

use lazy_static::lazy_static;

use crate::config::{
    AllocationMethod, Config, ConfigError, ConfigResult, ElectoralSystem, PartyConfig,
};

/// India (Lok Sabha): 543 FPTP constituencies, major national parties.
pub fn india_config(n_voters: usize) -> Config {
    let parties = vec![
        PartyConfig::new("BJP", 0.4, 0.5, 70.0).incumbent(),
        PartyConfig::new("INC", -0.2, -0.1, 55.0),
        PartyConfig::new("AAP", -0.3, -0.3, 50.0),
        PartyConfig::new("TMC", -0.1, 0.1, 45.0),
        PartyConfig::new("DMK", -0.4, -0.4, 45.0),
        PartyConfig::new("SP", -0.2, 0.2, 40.0),
        PartyConfig::new("BSP", -0.1, 0.3, 35.0),
        PartyConfig::new("Others", 0.0, 0.0, 30.0),
    ];
    Config {
        n_voters,
        n_constituencies: 543,
        parties,
        electoral_system: ElectoralSystem::Fptp,
        ..Config::default()
    }
}

/// USA (House of Representatives): 435 districts, two-party FPTP.
pub fn usa_config(n_voters: usize) -> Config {
    let parties = vec![
        PartyConfig::new("Democratic", -0.4, -0.2, 50.0),
        PartyConfig::new("Republican", 0.4, 0.3, 50.0),
    ];
    Config {
        n_voters,
        n_constituencies: 435,
        parties,
        electoral_system: ElectoralSystem::Fptp,
        ..Config::default()
    }
}

/// UK (House of Commons): 650 constituencies, multi-party FPTP.
pub fn uk_config(n_voters: usize) -> Config {
    let parties = vec![
        PartyConfig::new("Conservative", 0.3, 0.2, 45.0),
        PartyConfig::new("Labour", -0.3, -0.1, 50.0),
        PartyConfig::new("Liberal Democrats", 0.0, -0.2, 40.0),
        PartyConfig::new("SNP", -0.2, -0.3, 45.0),
        PartyConfig::new("Green", -0.5, -0.4, 35.0),
    ];
    Config {
        n_voters,
        n_constituencies: 650,
        parties,
        electoral_system: ElectoralSystem::Fptp,
        ..Config::default()
    }
}

/// Germany (Bundestag): Sainte-Laguë PR with the 5% threshold.
pub fn germany_config(n_voters: usize) -> Config {
    let parties = vec![
        PartyConfig::new("CDU/CSU", 0.2, 0.1, 50.0),
        PartyConfig::new("SPD", -0.2, -0.1, 48.0).incumbent(),
        PartyConfig::new("Grüne", -0.3, -0.4, 45.0),
        PartyConfig::new("FDP", 0.3, -0.2, 40.0),
        PartyConfig::new("AfD", 0.5, 0.5, 35.0),
        PartyConfig::new("Linke", -0.5, -0.2, 35.0),
    ];
    Config {
        n_voters,
        n_constituencies: 299,
        parties,
        electoral_system: ElectoralSystem::Pr,
        allocation_method: AllocationMethod::SainteLague,
        threshold: 0.05,
        ..Config::default()
    }
}

type PresetBuilder = fn(usize) -> Config;

lazy_static! {
    /// Preset registry keyed by name; ordered for stable CLI listings.
    pub static ref PRESETS: BTreeMap<&'static str, PresetBuilder> = {
        let mut presets: BTreeMap<&'static str, PresetBuilder> = BTreeMap::new();
        presets.insert("india", india_config as PresetBuilder);
        presets.insert("usa", usa_config as PresetBuilder);
        presets.insert("uk", uk_config as PresetBuilder);
        presets.insert("germany", germany_config as PresetBuilder);
        presets
    };
}

/// Look up a preset by name.
pub fn preset(name: &str, n_voters: usize) -> ConfigResult<Config> {
    match PRESETS.get(name) {
        Some(builder) => Ok(builder(n_voters)),
        None => Err(ConfigError::UnknownPreset(name.to_string())),
    }
}

/// Preset names in listing order.
pub fn preset_names() -> Vec<&'static str> {
    PRESETS.keys().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_contains_all_presets() {
        assert_eq!(preset_names(), vec!["germany", "india", "uk", "usa"]);
    }

    #[test]
    fn presets_build_valid_configs() {
        for name in preset_names() {
            let config = preset(name, 50_000).unwrap();
            assert!(config.validate().is_ok(), "{} invalid", name);
            assert_eq!(config.n_voters, 50_000);
        }
    }

    #[test]
    fn germany_uses_pr_with_threshold() {
        let config = germany_config(10_000);
        assert_eq!(config.electoral_system, ElectoralSystem::Pr);
        assert_eq!(config.allocation_method, AllocationMethod::SainteLague);
        assert!((config.threshold - 0.05).abs() < 1e-12);
        assert_eq!(config.n_constituencies, 299);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        assert!(matches!(
            preset("atlantis", 1000),
            Err(ConfigError::UnknownPreset(_))
        ));
    }
}
