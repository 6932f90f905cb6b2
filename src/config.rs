//! Simulation configuration: scale, party roster, electoral system and
//! behavioral parameters. Validation fails fast with a descriptive error
//! before any random draw happens.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("n_voters must be positive (got {0})")]
    InvalidVoterCount(usize),
    #[error("n_constituencies must be positive (got {0})")]
    InvalidConstituencyCount(usize),
    #[error("threshold must be within [0, 1] (got {0})")]
    InvalidThreshold(f64),
    #[error("temperature must be positive (got {0})")]
    InvalidTemperature(f64),
    #[error("zealot_fraction must be within [0, 1] (got {0})")]
    InvalidZealotFraction(f64),
    #[error("unknown electoral system: {0} (expected \"FPTP\" or \"PR\")")]
    UnknownSystem(String),
    #[error(
        "unknown allocation method: {0} (expected \"dhondt\", \"sainte_lague\", \"hare\" or \"droop\")"
    )]
    UnknownAllocationMethod(String),
    #[error("unknown curve model: {0} (expected \"sigmoid\", \"linear\" or \"exponential\")")]
    UnknownCurveModel(String),
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Electoral system tag. `FPTP` awards one seat per constituency by
/// plurality; `PR` pools votes nationally and runs a seat-allocation
/// method over the full seat count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectoralSystem {
    #[serde(rename = "FPTP")]
    Fptp,
    #[serde(rename = "PR")]
    Pr,
}

impl FromStr for ElectoralSystem {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s {
            "FPTP" | "fptp" => Ok(ElectoralSystem::Fptp),
            "PR" | "pr" => Ok(ElectoralSystem::Pr),
            other => Err(ConfigError::UnknownSystem(other.to_string())),
        }
    }
}

impl fmt::Display for ElectoralSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElectoralSystem::Fptp => write!(f, "FPTP"),
            ElectoralSystem::Pr => write!(f, "PR"),
        }
    }
}

/// Seat-allocation method used under PR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMethod {
    #[serde(rename = "dhondt")]
    DHondt,
    SainteLague,
    Hare,
    Droop,
}

impl FromStr for AllocationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s {
            "dhondt" => Ok(AllocationMethod::DHondt),
            "sainte_lague" => Ok(AllocationMethod::SainteLague),
            "hare" => Ok(AllocationMethod::Hare),
            "droop" => Ok(AllocationMethod::Droop),
            other => Err(ConfigError::UnknownAllocationMethod(other.to_string())),
        }
    }
}

impl fmt::Display for AllocationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationMethod::DHondt => write!(f, "dhondt"),
            AllocationMethod::SainteLague => write!(f, "sainte_lague"),
            AllocationMethod::Hare => write!(f, "hare"),
            AllocationMethod::Droop => write!(f, "droop"),
        }
    }
}

/// Functional shape shared by the coalition-stability transform and the
/// government collapse-probability models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveModel {
    Sigmoid,
    Linear,
    Exponential,
}

impl FromStr for CurveModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s {
            "sigmoid" => Ok(CurveModel::Sigmoid),
            "linear" => Ok(CurveModel::Linear),
            "exponential" => Ok(CurveModel::Exponential),
            other => Err(ConfigError::UnknownCurveModel(other.to_string())),
        }
    }
}

impl fmt::Display for CurveModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveModel::Sigmoid => write!(f, "sigmoid"),
            CurveModel::Linear => write!(f, "linear"),
            CurveModel::Exponential => write!(f, "exponential"),
        }
    }
}

/// Configuration for a single competing party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyConfig {
    pub name: String,
    #[serde(default)]
    pub position_x: f64,
    #[serde(default)]
    pub position_y: f64,
    #[serde(default = "default_valence")]
    pub valence: f64,
    #[serde(default)]
    pub incumbent: bool,
}

fn default_valence() -> f64 {
    50.0
}

impl PartyConfig {
    pub fn new(name: &str, position_x: f64, position_y: f64, valence: f64) -> Self {
        PartyConfig {
            name: name.to_string(),
            position_x,
            position_y,
            valence,
            incumbent: false,
        }
    }

    pub fn incumbent(mut self) -> Self {
        self.incumbent = true;
        self
    }
}

/// Scalar weights for the behavior models the engine registers.
///
/// A zero weight disables the model entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorWeights {
    pub proximity: f64,
    pub valence: f64,
    pub retrospective: f64,
    pub sociotropic: f64,
    pub strategic: f64,
    pub wasted_vote: f64,
}

impl Default for BehaviorWeights {
    fn default() -> Self {
        BehaviorWeights {
            proximity: 1.0,
            valence: 0.01,
            retrospective: 0.5,
            sociotropic: 0.0,
            strategic: 0.0,
            wasted_vote: 0.0,
        }
    }
}

/// Main model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Scale
    pub n_voters: usize,
    pub n_constituencies: usize,

    // Parties
    pub parties: Vec<PartyConfig>,
    pub include_nota: bool,

    // Electoral system
    pub electoral_system: ElectoralSystem,
    pub allocation_method: AllocationMethod,
    pub threshold: f64,

    // Voting behavior
    pub temperature: f64,
    pub behavior: BehaviorWeights,
    pub zealot_fraction: f64,

    // Dynamic parameters consumed by incumbent-sensitive models
    pub economic_growth: f64,
    pub national_mood: f64,
    pub anti_incumbency: f64,

    // Simulation
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            n_voters: 100_000,
            n_constituencies: 10,
            parties: default_parties(),
            include_nota: false,
            electoral_system: ElectoralSystem::Fptp,
            allocation_method: AllocationMethod::DHondt,
            threshold: 0.0,
            temperature: 0.5,
            behavior: BehaviorWeights::default(),
            zealot_fraction: 0.0,
            economic_growth: 0.0,
            national_mood: 0.0,
            anti_incumbency: 0.0,
            seed: None,
        }
    }
}

/// Three-party demo roster used when no parties are configured.
pub fn default_parties() -> Vec<PartyConfig> {
    vec![
        PartyConfig::new("Party A", -0.3, 0.1, 50.0),
        PartyConfig::new("Party B", 0.3, -0.1, 50.0),
        PartyConfig::new("Party C", 0.0, 0.3, 45.0),
    ]
}

impl Config {
    pub fn n_parties(&self) -> usize {
        self.parties.len()
    }

    /// Check every field the simulation depends on, before any draw.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.n_voters == 0 {
            return Err(ConfigError::InvalidVoterCount(self.n_voters));
        }
        if self.n_constituencies == 0 {
            return Err(ConfigError::InvalidConstituencyCount(self.n_constituencies));
        }
        if !(0.0..=1.0).contains(&self.threshold) || self.threshold.is_nan() {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if self.temperature <= 0.0 || self.temperature.is_nan() {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }
        if !(0.0..=1.0).contains(&self.zealot_fraction) || self.zealot_fraction.is_nan() {
            return Err(ConfigError::InvalidZealotFraction(self.zealot_fraction));
        }
        Ok(())
    }
}
