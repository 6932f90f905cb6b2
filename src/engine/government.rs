//! Government lifecycle: monthly collapse hazard as a function of time
//! in office, coalition strain and stability, destabilizing events, and
//! a Monte Carlo driver for survival-time statistics.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::CurveModel;

/// Default base monthly collapse probability.
pub const DEFAULT_BASE_RATE: f64 = 0.05;
/// Default maximum term in months.
pub const DEFAULT_MAX_TERM: u32 = 60;

/// Strain above this cutoff attributes a collapse to policy tension
/// rather than simple time in office.
const STRAIN_COLLAPSE_CUTOFF: f64 = 0.5;

/// Probability the government collapses in the given month.
///
/// The hazard scales with strain and instability; the chosen curve
/// shapes how it grows over the term. Monotonically non-decreasing in
/// time for every model, and exactly 1.0 once `month >= max_term`.
pub fn collapse_probability(
    month: u32,
    strain: f64,
    stability: f64,
    model: CurveModel,
    base_rate: f64,
    max_term: u32,
) -> f64 {
    if month >= max_term {
        return 1.0;
    }

    let time_factor = month as f64 / max_term as f64;
    let instability = 1.0 - stability;
    let hazard = base_rate * (1.0 + strain) * (1.0 + instability);

    let probability = match model {
        // S-curve: slow start, acceleration mid-term, saturation late.
        CurveModel::Sigmoid => {
            let x = 10.0 * (time_factor - 0.5);
            hazard / (1.0 + (-x).exp())
        }
        CurveModel::Exponential => hazard * (2.0 * time_factor).exp(),
        CurveModel::Linear => hazard * (1.0 + time_factor),
    };

    probability.max(0.0).min(1.0)
}

/// Kinds of destabilizing events and their hazard weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Scandal,
    EconomicCrisis,
    Defection,
    VoteOfNoConfidence,
    LeadershipChallenge,
    Other,
}

impl EventKind {
    pub fn hazard_weight(self) -> f64 {
        match self {
            EventKind::Scandal => 0.3,
            EventKind::EconomicCrisis => 0.4,
            EventKind::Defection => 0.5,
            EventKind::VoteOfNoConfidence => 0.8,
            EventKind::LeadershipChallenge => 0.3,
            EventKind::Other => 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestabilizingEvent {
    pub kind: EventKind,
    pub severity: f64,
    pub month: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollapseReason {
    PolicyStrain,
    TimeInOffice,
}

/// Instantaneous hazard rate with a bathtub time profile: honeymoon
/// uncertainty early, a stable middle, late-term instability, plus the
/// weighted contribution of recorded events.
pub fn hazard_rate(month: u32, events: &[DestabilizingEvent], base_hazard: f64) -> f64 {
    let time_hazard = if month < 6 {
        0.8
    } else if month < 36 {
        0.5 + 0.01 * (month as f64 - 6.0)
    } else {
        0.8 + 0.02 * (month as f64 - 36.0)
    };

    let event_hazard: f64 = events
        .iter()
        .map(|e| e.kind.hazard_weight() * e.severity)
        .sum();

    base_hazard * time_hazard * (1.0 + event_hazard)
}

/// State machine for one government instance: IN_OFFICE from month 0,
/// advancing one month per `step`, terminal on collapse or max term.
pub struct GovernmentSimulator {
    pub strain: f64,
    pub stability: f64,
    pub coalition: Vec<String>,
    model: CurveModel,
    rng: ChaCha8Rng,
    months_in_office: u32,
    collapsed: bool,
    collapse_reason: Option<CollapseReason>,
    events: Vec<DestabilizingEvent>,
}

/// Snapshot of a simulator's terminal (or current) state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernmentSummary {
    pub coalition: Vec<String>,
    pub months_in_office: u32,
    pub collapsed: bool,
    pub collapse_reason: Option<CollapseReason>,
    pub strain: f64,
    pub stability: f64,
    pub n_events: usize,
}

impl GovernmentSimulator {
    pub fn new(
        strain: f64,
        stability: f64,
        coalition: Vec<String>,
        model: CurveModel,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        GovernmentSimulator {
            strain,
            stability,
            coalition,
            model,
            rng,
            months_in_office: 0,
            collapsed: false,
            collapse_reason: None,
            events: Vec::new(),
        }
    }

    pub fn months_in_office(&self) -> u32 {
        self.months_in_office
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn collapse_reason(&self) -> Option<CollapseReason> {
        self.collapse_reason
    }

    /// Record a destabilizing event at the current month.
    pub fn add_event(&mut self, kind: EventKind, severity: f64) {
        self.events.push(DestabilizingEvent {
            kind,
            severity,
            month: self.months_in_office,
        });
    }

    /// Advance one month. Returns true while the government survives.
    ///
    /// Events from the trailing three months each add `0.1 * severity`
    /// to this month's collapse probability.
    pub fn step(&mut self) -> bool {
        if self.collapsed {
            return false;
        }
        self.months_in_office += 1;

        let mut probability = collapse_probability(
            self.months_in_office,
            self.strain,
            self.stability,
            self.model,
            DEFAULT_BASE_RATE,
            DEFAULT_MAX_TERM,
        );

        let recent_cutoff = self.months_in_office.saturating_sub(3);
        let event_boost: f64 = self
            .events
            .iter()
            .filter(|e| e.month >= recent_cutoff)
            .map(|e| 0.1 * e.severity)
            .sum();
        if event_boost > 0.0 {
            probability = (probability + event_boost).min(1.0);
        }

        if self.rng.gen::<f64>() < probability {
            self.collapsed = true;
            self.collapse_reason = Some(if self.strain > STRAIN_COLLAPSE_CUTOFF {
                CollapseReason::PolicyStrain
            } else {
                CollapseReason::TimeInOffice
            });
            return false;
        }
        true
    }

    /// Run until collapse or `max_months`; returns the survival time.
    pub fn simulate(&mut self, max_months: u32) -> u32 {
        while self.months_in_office < max_months && self.step() {}
        self.months_in_office
    }

    pub fn summary(&self) -> GovernmentSummary {
        GovernmentSummary {
            coalition: self.coalition.clone(),
            months_in_office: self.months_in_office,
            collapsed: self.collapsed,
            collapse_reason: self.collapse_reason,
            strain: self.strain,
            stability: self.stability,
            n_events: self.events.len(),
        }
    }
}

/// Survival statistics over a Monte Carlo batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurvivalStats {
    pub mean_survival: f64,
    pub median_survival: f64,
    pub std_survival: f64,
    /// Fraction of runs reaching the full term.
    pub full_term_prob: f64,
    /// Fraction of runs collapsing before half-term.
    pub early_collapse_prob: f64,
    pub min_survival: u32,
    pub max_survival: u32,
}

/// Repeat single-government simulation `n_simulations` times with
/// independent seeded draws and summarize the survival times.
pub fn simulate_government_survival(
    strain: f64,
    stability: f64,
    model: CurveModel,
    max_term: u32,
    n_simulations: usize,
    seed: Option<u64>,
) -> SurvivalStats {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut survival_times: Vec<u32> = Vec::with_capacity(n_simulations);
    for _ in 0..n_simulations {
        let mut survived = max_term;
        for month in 1..=max_term {
            let p = collapse_probability(month, strain, stability, model, DEFAULT_BASE_RATE, max_term);
            if rng.gen::<f64>() < p {
                survived = month;
                break;
            }
        }
        survival_times.push(survived);
    }

    summarize(&survival_times, max_term)
}

fn summarize(survival_times: &[u32], max_term: u32) -> SurvivalStats {
    let n = survival_times.len().max(1) as f64;
    let mean = survival_times.iter().map(|&t| t as f64).sum::<f64>() / n;
    let variance = survival_times
        .iter()
        .map(|&t| {
            let d = t as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    let mut sorted = survival_times.to_vec();
    sorted.sort_unstable();
    let median = if sorted.is_empty() {
        0.0
    } else if sorted.len() % 2 == 1 {
        sorted[sorted.len() / 2] as f64
    } else {
        let hi = sorted.len() / 2;
        (sorted[hi - 1] as f64 + sorted[hi] as f64) / 2.0
    };

    let full_term = survival_times.iter().filter(|&&t| t >= max_term).count();
    let early = survival_times
        .iter()
        .filter(|&&t| (t as f64) < max_term as f64 / 2.0)
        .count();

    SurvivalStats {
        mean_survival: mean,
        median_survival: median,
        std_survival: variance.sqrt(),
        full_term_prob: full_term as f64 / n,
        early_collapse_prob: early as f64 / n,
        min_survival: sorted.first().copied().unwrap_or(0),
        max_survival: sorted.last().copied().unwrap_or(0),
    }
}
