//! Synthetic voter population stored as a structure-of-arrays table so
//! the hot paths (utility computation, vote sampling, turnout) run over
//! flat columns instead of per-voter structs.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Beta, Distribution, LogNormal, Normal};

/// Education category weights: None, Primary, Secondary, Graduate, Post-grad.
const EDUCATION_WEIGHTS: [f64; 5] = [0.15, 0.25, 0.30, 0.20, 0.10];

/// Religion category weights over six simplified categories.
const RELIGION_WEIGHTS: [f64; 6] = [0.65, 0.14, 0.10, 0.05, 0.03, 0.03];

/// One column per voter attribute; all columns share the same length and
/// row index. Rows are only mutated by the opinion-dynamics step; the
/// whole table is regenerated on reset.
#[derive(Debug, Clone, PartialEq)]
pub struct VoterFrame {
    pub constituency: Vec<u32>,
    pub age: Vec<u32>,
    pub gender: Vec<u8>,
    pub education: Vec<u8>,
    pub income: Vec<f64>,
    pub religion: Vec<u8>,
    pub party_id_7pt: Vec<i8>,
    pub ideology_x: Vec<f64>,
    pub ideology_y: Vec<f64>,
    pub political_knowledge: Vec<f64>,
    pub misinfo_susceptibility: Vec<f64>,
    pub affective_polarization: Vec<f64>,
    pub economic_perception: Vec<f64>,
    pub turnout_prob: Vec<f64>,
    pub is_zealot: Vec<bool>,
}

impl VoterFrame {
    /// Generate the full population from one seeded generator.
    ///
    /// Columns are drawn in a fixed order (constituency, demographics,
    /// party id, ideology, knowledge and behavior, turnout, zealots) so
    /// the same seed and parameters reproduce the table bit-for-bit.
    pub fn generate(
        n_voters: usize,
        n_constituencies: usize,
        zealot_fraction: f64,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let n = n_voters;

        let constituency: Vec<u32> = (0..n)
            .map(|_| rng.gen_range(0..n_constituencies as u32))
            .collect();

        // Demographics
        let age: Vec<u32> = (0..n).map(|_| rng.gen_range(18..90)).collect();
        let gender: Vec<u8> = (0..n).map(|_| rng.gen_range(0..2u8)).collect();
        let education: Vec<u8> = (0..n)
            .map(|_| categorical(rng, &EDUCATION_WEIGHTS) as u8)
            .collect();

        let income_dist =
            LogNormal::new(3.5, 0.8).expect("log-normal income parameters are valid");
        let income: Vec<f64> = (0..n)
            .map(|_| clip(income_dist.sample(rng), 0.0, 100.0))
            .collect();

        let religion: Vec<u8> = (0..n)
            .map(|_| categorical(rng, &RELIGION_WEIGHTS) as u8)
            .collect();

        // 7-point party identification: -3 strong left .. +3 strong right
        let party_id_dist = Normal::<f64>::new(0.0, 1.2).expect("party-id parameters are valid");
        let party_id_7pt: Vec<i8> = (0..n)
            .map(|_| clip(party_id_dist.sample(rng).round(), -3.0, 3.0) as i8)
            .collect();

        // Ideology: base draw shifted by income (economic axis), education
        // (social axis) and age (both), clipped to the unit square.
        let ideology_dist = Normal::new(0.0, 0.3).expect("ideology parameters are valid");
        let base_x: Vec<f64> = (0..n).map(|_| ideology_dist.sample(rng)).collect();
        let base_y: Vec<f64> = (0..n).map(|_| ideology_dist.sample(rng)).collect();

        let ideology_x: Vec<f64> = (0..n)
            .map(|i| {
                clip(
                    base_x[i] + 0.005 * (income[i] - 50.0) + 0.003 * (age[i] as f64 - 50.0),
                    -1.0,
                    1.0,
                )
            })
            .collect();
        let ideology_y: Vec<f64> = (0..n)
            .map(|i| {
                clip(
                    base_y[i] - 0.02 * (education[i] as f64 - 2.0)
                        + 0.005 * (age[i] as f64 - 50.0),
                    -1.0,
                    1.0,
                )
            })
            .collect();

        // Knowledge and behavioral propensities
        let knowledge_dist = Beta::new(2.0, 5.0).expect("knowledge parameters are valid");
        let political_knowledge: Vec<f64> = (0..n)
            .map(|_| knowledge_dist.sample(rng) * 100.0)
            .collect();

        let misinfo_dist = Beta::new(2.0, 3.0).expect("misinfo parameters are valid");
        let misinfo_susceptibility: Vec<f64> = (0..n)
            .map(|i| {
                clip(
                    misinfo_dist.sample(rng)
                        - 0.1 * (education[i] as f64 / 4.0)
                        - 0.1 * (political_knowledge[i] / 100.0),
                    0.05,
                    0.95,
                )
            })
            .collect();

        let polarization_dist = Beta::new(2.0, 5.0).expect("polarization parameters are valid");
        let affective_polarization: Vec<f64> = (0..n)
            .map(|i| {
                let id_strength = party_id_7pt[i].abs() as f64 / 3.0;
                clip(polarization_dist.sample(rng) + 0.3 * id_strength, 0.0, 1.0)
            })
            .collect();

        // 0 = pocketbook, 1 = sociotropic; education pushes sociotropic
        let perception_dist = Beta::new(2.0, 3.0).expect("perception parameters are valid");
        let economic_perception: Vec<f64> = (0..n)
            .map(|i| {
                clip(
                    perception_dist.sample(rng) + 0.15 * (education[i] as f64 / 4.0),
                    0.0,
                    1.0,
                )
            })
            .collect();

        // Turnout skews high, lifted further by education, age and knowledge
        let turnout_dist = Beta::new(5.0, 2.0).expect("turnout parameters are valid");
        let turnout_prob: Vec<f64> = (0..n)
            .map(|i| {
                clip(
                    turnout_dist.sample(rng)
                        + 0.02 * education[i] as f64
                        + 0.002 * f64::min(age[i] as f64 - 18.0, 50.0)
                        + 0.002 * (political_knowledge[i] / 100.0),
                    0.1,
                    0.95,
                )
            })
            .collect();

        let is_zealot: Vec<bool> = (0..n).map(|_| rng.gen::<f64>() < zealot_fraction).collect();

        VoterFrame {
            constituency,
            age,
            gender,
            education,
            income,
            religion,
            party_id_7pt,
            ideology_x,
            ideology_y,
            political_knowledge,
            misinfo_susceptibility,
            affective_polarization,
            economic_perception,
            turnout_prob,
            is_zealot,
        }
    }

    pub fn len(&self) -> usize {
        self.constituency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constituency.is_empty()
    }

    /// Noisy-voter opinion dynamics on the party-identification scale:
    /// each non-zealot either mutates to a uniform scale value (with
    /// `mutation_rate` probability) or copies another voter chosen
    /// uniformly at random. Zealots never change.
    pub fn step_noisy_voter(&mut self, mutation_rate: f64, rng: &mut ChaCha8Rng) {
        let n = self.len();
        if n == 0 {
            return;
        }
        let snapshot = self.party_id_7pt.clone();
        for i in 0..n {
            if self.is_zealot[i] {
                continue;
            }
            if rng.gen::<f64>() < mutation_rate {
                self.party_id_7pt[i] = rng.gen_range(-3i8..=3);
            } else {
                let neighbor = rng.gen_range(0..n);
                self.party_id_7pt[i] = snapshot[neighbor];
            }
        }
    }
}

/// Sample a category index from a weight table via one uniform draw.
fn categorical(rng: &mut ChaCha8Rng, weights: &[f64]) -> usize {
    let r: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if r < cumulative {
            return i;
        }
    }
    weights.len() - 1
}

fn clip(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn frame(seed: u64, n: usize) -> VoterFrame {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        VoterFrame::generate(n, 5, 0.0, &mut rng)
    }

    #[test]
    fn same_seed_reproduces_table() {
        assert_eq!(frame(42, 2000), frame(42, 2000));
    }

    #[test]
    fn different_seeds_differ() {
        assert_ne!(frame(42, 2000), frame(43, 2000));
    }

    #[test]
    fn columns_respect_ranges() {
        let f = frame(7, 5000);
        assert!(f.age.iter().all(|&a| (18..90).contains(&a)));
        assert!(f.constituency.iter().all(|&c| c < 5));
        assert!(f.education.iter().all(|&e| e <= 4));
        assert!(f.religion.iter().all(|&r| r <= 5));
        assert!(f.party_id_7pt.iter().all(|&p| (-3..=3).contains(&p)));
        assert!(f.ideology_x.iter().all(|&x| (-1.0..=1.0).contains(&x)));
        assert!(f.ideology_y.iter().all(|&y| (-1.0..=1.0).contains(&y)));
        assert!(f.turnout_prob.iter().all(|&t| (0.1..=0.95).contains(&t)));
        assert!(f
            .misinfo_susceptibility
            .iter()
            .all(|&m| (0.05..=0.95).contains(&m)));
        assert!(f.income.iter().all(|&i| (0.0..=100.0).contains(&i)));
    }

    #[test]
    fn turnout_skews_high() {
        let f = frame(11, 20_000);
        let mean = f.turnout_prob.iter().sum::<f64>() / f.len() as f64;
        // Beta(5,2) has mean ~0.71 before the demographic lift.
        assert!(mean > 0.6, "mean turnout {}", mean);
    }

    #[test]
    fn zealots_never_change_in_dynamics() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut f = VoterFrame::generate(500, 3, 1.0, &mut rng);
        assert!(f.is_zealot.iter().all(|&z| z));
        let before = f.party_id_7pt.clone();
        f.step_noisy_voter(0.5, &mut rng);
        assert_eq!(f.party_id_7pt, before);
    }

    #[test]
    fn dynamics_move_non_zealots() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut f = VoterFrame::generate(2000, 3, 0.0, &mut rng);
        let before = f.party_id_7pt.clone();
        f.step_noisy_voter(0.05, &mut rng);
        assert_ne!(f.party_id_7pt, before);
    }
}
