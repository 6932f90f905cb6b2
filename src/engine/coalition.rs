//! Post-election coalition formation: minimum winning and minimum
//! connected winning coalition search, policy strain, stability scoring
//! and government selection.
//!
//! The subset search is exhaustive (2^n), which is fine for realistic
//! party counts but combinatorial by nature; it is capped at
//! [`MAX_COALITION_PARTIES`] and fails loudly beyond that instead of
//! hanging.

use itertools::Itertools;

use crate::config::CurveModel;
use crate::model::parties::PartyFrame;

/// Hard ceiling on the exhaustive subset search.
pub const MAX_COALITION_PARTIES: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum CoalitionError {
    #[error(
        "coalition search over {0} parties exceeds the {max}-party ceiling",
        max = MAX_COALITION_PARTIES
    )]
    TooManyParties(usize),
}

pub type CoalitionResult<T> = std::result::Result<T, CoalitionError>;

/// A winning set of parties and its seat total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coalition {
    pub parties: Vec<usize>,
    pub seats: u32,
}

/// A winning coalition whose members sit within a bounded range on the
/// economic axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedCoalition {
    pub parties: Vec<usize>,
    pub seats: u32,
    pub policy_range: f64,
}

/// Seats needed for a majority at the given threshold fraction.
pub fn majority_seats(total_seats: u32, majority_threshold: f64) -> u32 {
    (total_seats as f64 * majority_threshold).floor() as u32 + 1
}

/// Enumerate all minimum winning coalitions: subsets at or above the
/// majority from which no single member can be removed without losing
/// it. Sorted by coalition size ascending.
pub fn minimum_winning_coalitions(
    seats: &[u32],
    majority_threshold: f64,
) -> CoalitionResult<Vec<Coalition>> {
    let n_parties = seats.len();
    if n_parties > MAX_COALITION_PARTIES {
        return Err(CoalitionError::TooManyParties(n_parties));
    }

    let total: u32 = seats.iter().sum();
    let majority = majority_seats(total, majority_threshold);
    let mut mwcs = Vec::new();

    for size in 1..=n_parties {
        for combo in (0..n_parties).combinations(size) {
            let coalition_seats: u32 = combo.iter().map(|&p| seats[p]).sum();
            if coalition_seats < majority {
                continue;
            }
            let minimal = combo
                .iter()
                .all(|&p| coalition_seats - seats[p] < majority);
            if minimal {
                mwcs.push(Coalition {
                    parties: combo,
                    seats: coalition_seats,
                });
            }
        }
    }
    // Generated in ascending size order already.
    Ok(mwcs)
}

/// Filter MWCs down to those connected on the economic axis (policy
/// range at most `max_distance`), sorted most cohesive first.
pub fn minimum_connected_winning(
    seats: &[u32],
    positions: &[f64],
    majority_threshold: f64,
    max_distance: f64,
) -> CoalitionResult<Vec<ConnectedCoalition>> {
    let mwcs = minimum_winning_coalitions(seats, majority_threshold)?;
    let mut mcws: Vec<ConnectedCoalition> = mwcs
        .into_iter()
        .filter_map(|c| {
            let min = c
                .parties
                .iter()
                .map(|&p| positions[p])
                .fold(f64::INFINITY, f64::min);
            let max = c
                .parties
                .iter()
                .map(|&p| positions[p])
                .fold(f64::NEG_INFINITY, f64::max);
            let policy_range = max - min;
            if policy_range <= max_distance {
                Some(ConnectedCoalition {
                    parties: c.parties,
                    seats: c.seats,
                    policy_range,
                })
            } else {
                None
            }
        })
        .collect();

    mcws.sort_by(|a, b| {
        a.policy_range
            .partial_cmp(&b.policy_range)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(mcws)
}

/// Policy strain: weighted mean pairwise Euclidean distance among member
/// positions, pair weights being the product of the members' normalized
/// weights (seat shares in practice). Zero for fewer than two members.
pub fn coalition_strain(positions: &[(f64, f64)], weights: Option<&[f64]>) -> f64 {
    let n = positions.len();
    if n < 2 {
        return 0.0;
    }

    let raw: Vec<f64> = match weights {
        Some(w) => w.to_vec(),
        None => vec![1.0; n],
    };
    let weight_sum: f64 = raw.iter().sum();
    if weight_sum <= 0.0 {
        return 0.0;
    }
    let normalized: Vec<f64> = raw.iter().map(|w| w / weight_sum).collect();

    let mut total_strain = 0.0;
    let mut total_weight = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = positions[i].0 - positions[j].0;
            let dy = positions[i].1 - positions[j].1;
            let dist = (dx * dx + dy * dy).sqrt();
            let pair_weight = normalized[i] * normalized[j];
            total_strain += dist * pair_weight;
            total_weight += pair_weight;
        }
    }
    if total_weight == 0.0 {
        return 0.0;
    }
    total_strain / total_weight
}

/// Map strain, majority margin and party count to a stability score in
/// [0, 1] through the chosen transform.
pub fn predict_coalition_stability(
    strain: f64,
    majority_margin: f64,
    n_parties: usize,
    model: CurveModel,
) -> f64 {
    let strain_factor = 1.0 / (1.0 + strain);
    let margin_factor = 0.5 + 0.5 * (majority_margin * 5.0).max(0.0).min(1.0);
    let party_factor = 1.0 / (n_parties.max(1) as f64).sqrt();
    let raw = strain_factor * margin_factor * party_factor;

    match model {
        CurveModel::Sigmoid => 1.0 / (1.0 + (-5.0 * (raw - 0.5)).exp()),
        CurveModel::Exponential => 1.0 - (-3.0 * raw).exp(),
        CurveModel::Linear => raw.max(0.0).min(1.0),
    }
}

/// The selected government, with its cohesion diagnostics.
#[derive(Debug, Clone)]
pub struct CoalitionGovernment {
    pub parties: Vec<usize>,
    pub names: Vec<String>,
    pub seats: u32,
    pub majority: u32,
    pub margin: f64,
    pub strain: f64,
    pub stability: f64,
    /// Whether the coalition came from the connected search or the
    /// unconnected fallback.
    pub connected: bool,
}

/// Structured formation outcome; infeasibility is data, not an error.
#[derive(Debug, Clone)]
pub enum FormationOutcome {
    Formed(CoalitionGovernment),
    NoMajority,
}

impl FormationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FormationOutcome::Formed(_))
    }

    pub fn government(&self) -> Option<&CoalitionGovernment> {
        match self {
            FormationOutcome::Formed(g) => Some(g),
            FormationOutcome::NoMajority => None,
        }
    }
}

/// Form a government: prefer the most cohesive minimum connected winning
/// coalition, fall back to the smallest minimum winning coalition, and
/// report `NoMajority` when no majority coalition exists at all.
pub fn form_government(
    seats: &[u32],
    parties: &PartyFrame,
    majority_threshold: f64,
    max_distance: f64,
) -> CoalitionResult<FormationOutcome> {
    let total: u32 = seats.iter().sum();
    let majority = majority_seats(total, majority_threshold);

    let mcws = minimum_connected_winning(
        seats,
        parties.economic_positions(),
        majority_threshold,
        max_distance,
    )?;

    let (members, coalition_seats, connected) = match mcws.first() {
        Some(best) => (best.parties.clone(), best.seats, true),
        None => {
            let mwcs = minimum_winning_coalitions(seats, majority_threshold)?;
            match mwcs.first() {
                Some(best) => (best.parties.clone(), best.seats, false),
                None => return Ok(FormationOutcome::NoMajority),
            }
        }
    };

    let positions: Vec<(f64, f64)> = members.iter().map(|&p| parties.position(p)).collect();
    let member_seats: Vec<f64> = members.iter().map(|&p| seats[p] as f64).collect();
    let strain = coalition_strain(&positions, Some(&member_seats));
    let margin = if total > 0 {
        (coalition_seats as f64 - majority as f64) / total as f64
    } else {
        0.0
    };
    let stability =
        predict_coalition_stability(strain, margin, members.len(), CurveModel::Sigmoid);

    let names = members
        .iter()
        .map(|&p| parties.names[p].clone())
        .collect();

    Ok(FormationOutcome::Formed(CoalitionGovernment {
        parties: members,
        names,
        seats: coalition_seats,
        majority,
        margin,
        strain,
        stability,
        connected,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartyConfig;

    const SEATS: [u32; 4] = [45, 35, 15, 5];

    #[test]
    fn mwc_enumeration_matches_hand_count() {
        let mwcs = minimum_winning_coalitions(&SEATS, 0.5).unwrap();
        let sets: Vec<Vec<usize>> = mwcs.iter().map(|c| c.parties.clone()).collect();
        // Majority is 51: {0,1}=80, {0,2}=60 and {1,2,3}=55 are the only
        // minimal winning subsets.
        assert_eq!(sets, vec![vec![0, 1], vec![0, 2], vec![1, 2, 3]]);
        assert_eq!(mwcs[0].seats, 80);
        assert_eq!(mwcs[2].seats, 55);
    }

    #[test]
    fn mwc_excludes_non_minimal_supersets() {
        let mwcs = minimum_winning_coalitions(&SEATS, 0.5).unwrap();
        assert!(!mwcs.iter().any(|c| c.parties == vec![0, 1, 2, 3]));
        assert!(!mwcs.iter().any(|c| c.parties.len() == 4));
    }

    #[test]
    fn mwc_sorted_by_size() {
        let mwcs = minimum_winning_coalitions(&SEATS, 0.5).unwrap();
        let sizes: Vec<usize> = mwcs.iter().map(|c| c.parties.len()).collect();
        let mut sorted = sizes.clone();
        sorted.sort_unstable();
        assert_eq!(sizes, sorted);
    }

    #[test]
    fn single_party_majority_is_its_own_mwc() {
        let mwcs = minimum_winning_coalitions(&[60, 30, 10], 0.5).unwrap();
        assert_eq!(mwcs[0].parties, vec![0]);
        // Every other MWC would have to exclude party 0 entirely.
        assert!(mwcs.iter().skip(1).all(|c| !c.parties.contains(&0)));
    }

    #[test]
    fn too_many_parties_fails_loudly() {
        let seats = vec![1u32; MAX_COALITION_PARTIES + 1];
        assert!(matches!(
            minimum_winning_coalitions(&seats, 0.5),
            Err(CoalitionError::TooManyParties(21))
        ));
    }

    #[test]
    fn mcw_filters_and_sorts_by_policy_range() {
        let positions = [0.6, -0.2, 0.1, -0.5];
        let mcws = minimum_connected_winning(&SEATS, &positions, 0.5, 0.5).unwrap();
        // {0,1} spans 0.8 and {0,2} spans 0.5; {1,2,3} spans 0.6.
        let sets: Vec<Vec<usize>> = mcws.iter().map(|c| c.parties.clone()).collect();
        assert_eq!(sets, vec![vec![0, 2]]);
        assert!((mcws[0].policy_range - 0.5).abs() < 1e-12);

        let wider = minimum_connected_winning(&SEATS, &positions, 0.5, 0.7).unwrap();
        let sets: Vec<Vec<usize>> = wider.iter().map(|c| c.parties.clone()).collect();
        assert_eq!(sets, vec![vec![0, 2], vec![1, 2, 3]]);
    }

    #[test]
    fn strain_zero_for_singletons_and_identical_positions() {
        assert_eq!(coalition_strain(&[], None), 0.0);
        assert_eq!(coalition_strain(&[(0.3, 0.1)], None), 0.0);
        let same = [(0.2, 0.2), (0.2, 0.2), (0.2, 0.2)];
        assert_eq!(coalition_strain(&same, None), 0.0);
    }

    #[test]
    fn strain_equals_distance_for_pairs() {
        // For two members the weighted mean reduces to their distance.
        let strain = coalition_strain(&[(0.0, 0.0), (0.6, 0.8)], Some(&[45.0, 35.0]));
        assert!((strain - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stability_decreases_with_strain_and_party_count() {
        let low = predict_coalition_stability(0.1, 0.1, 2, CurveModel::Sigmoid);
        let high_strain = predict_coalition_stability(1.5, 0.1, 2, CurveModel::Sigmoid);
        let many_parties = predict_coalition_stability(0.1, 0.1, 6, CurveModel::Sigmoid);
        assert!(low > high_strain);
        assert!(low > many_parties);

        for model in [CurveModel::Sigmoid, CurveModel::Linear, CurveModel::Exponential] {
            let s = predict_coalition_stability(0.3, 0.05, 3, model);
            assert!((0.0..=1.0).contains(&s), "{:?} -> {}", model, s);
        }
    }

    fn roster(positions: &[(f64, f64)]) -> PartyFrame {
        let configs: Vec<PartyConfig> = positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| PartyConfig::new(&format!("P{}", i), x, y, 50.0))
            .collect();
        PartyFrame::from_configs(&configs, false)
    }

    #[test]
    fn form_government_prefers_connected_coalition() {
        let parties = roster(&[(0.6, 0.0), (-0.2, 0.0), (0.1, 0.0), (-0.5, 0.0)]);
        let outcome = form_government(&SEATS, &parties, 0.5, 0.5).unwrap();
        let government = outcome.government().expect("majority exists");
        assert!(government.connected);
        assert_eq!(government.parties, vec![0, 2]);
        assert_eq!(government.seats, 60);
        assert_eq!(government.majority, 51);
        assert!(government.stability > 0.0 && government.stability < 1.0);
    }

    #[test]
    fn form_government_falls_back_to_smallest_mwc() {
        // Distances too wide for any connected coalition.
        let parties = roster(&[(1.0, 0.0), (-1.0, 0.0), (0.0, 0.0), (-0.9, 0.0)]);
        let outcome = form_government(&SEATS, &parties, 0.5, 0.1).unwrap();
        let government = outcome.government().expect("majority exists");
        assert!(!government.connected);
        assert_eq!(government.parties, vec![0, 1]);
    }

    #[test]
    fn form_government_reports_no_majority() {
        // A full-unanimity threshold needs 101 of 100 seats, which no
        // subset can reach.
        let parties = roster(&[(0.0, 0.0), (0.5, 0.0)]);
        let outcome = form_government(&[50, 50], &parties, 1.0, 1.0).unwrap();
        assert!(!outcome.is_success());
        assert!(outcome.government().is_none());
    }
}
