//! Core election model: owns the voter and party tables, one seeded
//! generator, and the behavior engine; runs turnout, probabilistic vote
//! choice and tabulation under the configured electoral system.

pub mod parties;
pub mod voters;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::behavior::{
    BehaviorEngine, ModelContext, ProximityModel, RetrospectiveModel,
    SociotropicPocketbookModel, StrategicVotingModel, UtilityMatrix, ValenceModel,
    WastedVoteModel,
};
use crate::config::{Config, ConfigResult, ElectoralSystem};
use crate::data::HistoricalResults;
use crate::metrics;
use crate::systems::allocation;

use parties::PartyFrame;
use voters::VoterFrame;

/// Outcome of a single election run.
///
/// `votes` sums to `ballots_cast`; `seats` sums to the seat total
/// (`n_constituencies`) except for the documented FPTP edge case of a
/// constituency where no ballot was cast, which awards no seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionResult {
    pub system: ElectoralSystem,
    pub votes: Vec<u64>,
    pub seats: Vec<u32>,
    pub ballots_cast: usize,
    pub turnout: f64,
    pub gallagher: f64,
    pub enp_votes: f64,
    pub enp_seats: f64,
}

impl ElectionResult {
    pub fn total_seats(&self) -> u32 {
        self.seats.iter().sum()
    }

    pub fn vote_shares(&self) -> Vec<f64> {
        metrics::vote_shares(&self.votes)
    }

    pub fn seat_shares(&self) -> Vec<f64> {
        metrics::seat_shares(&self.seats)
    }
}

pub struct ElectionModel {
    config: Config,
    pub voters: VoterFrame,
    pub parties: PartyFrame,
    pub context: ModelContext,
    engine: BehaviorEngine,
    rng: ChaCha8Rng,
    results: Vec<ElectionResult>,
}

impl ElectionModel {
    /// Validate the configuration and build the model. The population is
    /// generated here, so construction performs the first random draws.
    ///
    /// An empty party list falls back to the three-party demo roster.
    pub fn new(mut config: Config) -> ConfigResult<Self> {
        if config.parties.is_empty() {
            config.parties = crate::config::default_parties();
        }
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let voters = VoterFrame::generate(
            config.n_voters,
            config.n_constituencies,
            config.zealot_fraction,
            &mut rng,
        );
        let parties = PartyFrame::from_configs(&config.parties, config.include_nota);
        let engine = build_engine(&config);
        let context = ModelContext {
            economic_growth: config.economic_growth,
            national_mood: config.national_mood,
            anti_incumbency: config.anti_incumbency,
            viability: None,
            personal_income_change: None,
        };

        Ok(ElectionModel {
            config,
            voters,
            parties,
            context,
            engine,
            rng,
            results: Vec::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn n_parties(&self) -> usize {
        self.parties.len()
    }

    /// Seed viability weights and incumbency flags from historical
    /// results, matching parties by name.
    pub fn apply_historical(&mut self, historical: &HistoricalResults, year: Option<i32>) {
        let weights = historical.viability_weights(year);
        let viability: Vec<f64> = self
            .parties
            .names
            .iter()
            .map(|name| weights.get(name).copied().unwrap_or(0.0))
            .collect();
        self.context.viability = Some(viability);
        self.parties
            .set_incumbents_by_name(&historical.incumbents(year));
    }

    /// Discard the population and regrow it from a fresh seed. This is
    /// the only way voters are "destroyed".
    pub fn reset(&mut self, seed: Option<u64>) {
        self.rng = match seed.or(self.config.seed) {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.voters = VoterFrame::generate(
            self.config.n_voters,
            self.config.n_constituencies,
            self.config.zealot_fraction,
            &mut self.rng,
        );
        self.results.clear();
    }

    /// One opinion-dynamics step between elections.
    pub fn step_dynamics(&mut self, mutation_rate: f64) {
        self.voters.step_noisy_voter(mutation_rate, &mut self.rng);
    }

    /// Run one full election: turnout, utilities, probabilistic choice,
    /// then tabulation under the configured system.
    pub fn run_election(&mut self) -> ElectionResult {
        let will_vote = self.decide_turnout();
        let utilities = self
            .engine
            .compute_utilities(&self.voters, &self.parties, &self.context);
        let choices = self.sample_votes(&utilities);

        let n_parties = self.parties.len();
        let mut votes = vec![0u64; n_parties];
        let mut ballots_cast = 0usize;
        for (v, &voting) in will_vote.iter().enumerate() {
            if voting {
                votes[choices[v]] += 1;
                ballots_cast += 1;
            }
        }

        let seats = match self.config.electoral_system {
            ElectoralSystem::Fptp => self.count_fptp(&will_vote, &choices),
            ElectoralSystem::Pr => self.count_pr(&votes),
        };

        let vote_shares = metrics::vote_shares(&votes);
        let seat_shares = metrics::seat_shares(&seats);
        let result = ElectionResult {
            system: self.config.electoral_system,
            turnout: metrics::turnout_rate(ballots_cast, self.voters.len()),
            gallagher: metrics::gallagher_index(&vote_shares, &seat_shares),
            enp_votes: metrics::effective_number_of_parties(&vote_shares),
            enp_seats: metrics::effective_number_of_parties(&seat_shares),
            votes,
            seats,
            ballots_cast,
        };
        self.results.push(result.clone());
        result
    }

    pub fn results(&self) -> &[ElectionResult] {
        &self.results
    }

    /// Independent Bernoulli turnout draw per voter.
    fn decide_turnout(&mut self) -> Vec<bool> {
        let probs = &self.voters.turnout_prob;
        let rng = &mut self.rng;
        probs.iter().map(|&p| rng.gen::<f64>() < p).collect()
    }

    /// Multinomial-logit vote choice: softmax over each utility row at
    /// `1/temperature`, max-subtracted for numerical stability, sampled
    /// by inverse CDF with one uniform draw per voter.
    fn sample_votes(&mut self, utilities: &UtilityMatrix) -> Vec<usize> {
        let n_parties = self.parties.len();
        let inv_temp = 1.0 / self.config.temperature;
        let mut choices = Vec::with_capacity(self.voters.len());
        let mut scaled = vec![0.0f64; n_parties];

        for v in 0..self.voters.len() {
            let row = utilities.row(v);

            let mut max = f64::NEG_INFINITY;
            for (s, &u) in scaled.iter_mut().zip(row) {
                *s = u * inv_temp;
                if *s > max {
                    max = *s;
                }
            }
            let mut sum = 0.0;
            for s in scaled.iter_mut() {
                *s = (*s - max).exp();
                sum += *s;
            }

            // Inverse-CDF draw: the choice is the count of cumulative
            // probabilities strictly below the uniform draw.
            let u: f64 = self.rng.gen::<f64>() * sum;
            let mut cumulative = 0.0;
            let mut choice = n_parties - 1;
            for (p, &s) in scaled.iter().enumerate() {
                cumulative += s;
                if u < cumulative {
                    choice = p;
                    break;
                }
            }
            choices.push(choice);
        }
        choices
    }

    /// FPTP: the plurality winner in each constituency takes its single
    /// seat; vote-count ties go to the lowest party index. NOTA rows can
    /// draw votes but never win the seat. A constituency where nobody
    /// voted awards no seat.
    fn count_fptp(&self, will_vote: &[bool], choices: &[usize]) -> Vec<u32> {
        let n_parties = self.parties.len();
        let n_constituencies = self.config.n_constituencies;
        let mut counts = vec![0u64; n_constituencies * n_parties];

        for v in 0..self.voters.len() {
            if will_vote[v] {
                let c = self.voters.constituency[v] as usize;
                counts[c * n_parties + choices[v]] += 1;
            }
        }

        let mut seats = vec![0u32; n_parties];
        for c in 0..n_constituencies {
            let row = &counts[c * n_parties..(c + 1) * n_parties];
            let mut winner: Option<(usize, u64)> = None;
            for (p, &n) in row.iter().enumerate() {
                if n == 0 || self.parties.is_nota[p] {
                    continue;
                }
                match winner {
                    Some((_, best)) if n <= best => {}
                    _ => winner = Some((p, n)),
                }
            }
            if let Some((p, _)) = winner {
                seats[p] += 1;
            }
        }
        seats
    }

    /// Party-list PR over nationally pooled votes, with the configured
    /// allocation method and threshold. NOTA votes stay in the totals
    /// but are excluded from the allocation input.
    fn count_pr(&self, votes: &[u64]) -> Vec<u32> {
        let eligible: Vec<u64> = votes
            .iter()
            .enumerate()
            .map(|(p, &v)| if self.parties.is_nota[p] { 0 } else { v })
            .collect();
        allocation::allocate_seats(
            &eligible,
            self.config.n_constituencies,
            self.config.allocation_method,
            self.config.threshold,
        )
    }
}

fn build_engine(config: &Config) -> BehaviorEngine {
    let weights = &config.behavior;
    let mut engine = BehaviorEngine::new();
    engine
        .add_model(Box::new(ProximityModel), weights.proximity)
        .add_model(Box::new(ValenceModel), weights.valence)
        .add_model(Box::new(RetrospectiveModel), weights.retrospective)
        .add_model(Box::new(SociotropicPocketbookModel), weights.sociotropic)
        .add_model(Box::new(StrategicVotingModel), weights.strategic)
        .add_model(Box::new(WastedVoteModel::default()), weights.wasted_vote);
    engine
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AllocationMethod;

    fn base_config() -> Config {
        Config {
            n_voters: 5_000,
            n_constituencies: 7,
            seed: Some(42),
            ..Config::default()
        }
    }

    #[test]
    fn fptp_result_invariants() {
        let mut model = ElectionModel::new(base_config()).unwrap();
        let result = model.run_election();

        assert_eq!(result.system, ElectoralSystem::Fptp);
        assert_eq!(result.votes.iter().sum::<u64>(), result.ballots_cast as u64);
        assert!(result.total_seats() <= 7);
        assert!(result.turnout > 0.0 && result.turnout < 1.0);
        assert!(result.enp_votes >= 1.0);
    }

    #[test]
    fn pr_seats_sum_to_total() {
        let config = Config {
            electoral_system: ElectoralSystem::Pr,
            allocation_method: AllocationMethod::SainteLague,
            ..base_config()
        };
        let mut model = ElectionModel::new(config).unwrap();
        let result = model.run_election();
        assert_eq!(result.total_seats(), 7);
    }

    #[test]
    fn same_seed_reproduces_full_election() {
        let run = |seed| {
            let config = Config {
                seed: Some(seed),
                ..base_config()
            };
            ElectionModel::new(config).unwrap().run_election()
        };
        let a = run(7);
        let b = run(7);
        assert_eq!(a.votes, b.votes);
        assert_eq!(a.seats, b.seats);
        assert_eq!(a.turnout, b.turnout);

        let c = run(8);
        assert_ne!(a.votes, c.votes);
    }

    #[test]
    fn low_temperature_approaches_nearest_party_voting() {
        // With a near-zero temperature and pure proximity weights the
        // softmax collapses onto the closest party.
        let config = Config {
            n_voters: 2_000,
            n_constituencies: 1,
            temperature: 0.001,
            behavior: crate::config::BehaviorWeights {
                proximity: 1.0,
                valence: 0.0,
                retrospective: 0.0,
                ..Default::default()
            },
            seed: Some(5),
            ..Config::default()
        };
        let mut model = ElectionModel::new(config).unwrap();
        let utilities =
            model
                .engine
                .compute_utilities(&model.voters, &model.parties, &model.context);
        let choices = model.sample_votes(&utilities);

        let mismatches = (0..model.voters.len())
            .filter(|&v| {
                let row = utilities.row(v);
                let nearest = (0..row.len())
                    .max_by(|&a, &b| {
                        row[a]
                            .partial_cmp(&row[b])
                            .unwrap_or(std::cmp::Ordering::Equal)
                            .then(b.cmp(&a))
                    })
                    .unwrap();
                choices[v] != nearest
            })
            .count();
        // Allow a tiny stochastic margin for voters sitting between parties.
        assert!(mismatches < model.voters.len() / 50);
    }

    #[test]
    fn nota_votes_never_win_seats() {
        let config = Config {
            n_voters: 3_000,
            n_constituencies: 5,
            include_nota: true,
            electoral_system: ElectoralSystem::Pr,
            seed: Some(9),
            ..Config::default()
        };
        let mut model = ElectionModel::new(config).unwrap();
        let result = model.run_election();
        let nota = model.parties.len() - 1;
        assert_eq!(result.seats[nota], 0);
        assert_eq!(result.total_seats(), 5);
    }

    #[test]
    fn invalid_config_rejected_before_generation() {
        let config = Config {
            n_voters: 0,
            ..Config::default()
        };
        assert!(ElectionModel::new(config).is_err());
    }

    #[test]
    fn reset_regenerates_population_deterministically() {
        let mut model = ElectionModel::new(base_config()).unwrap();
        let before = model.voters.clone();
        model.step_dynamics(0.1);
        model.reset(Some(42));
        assert_eq!(model.voters, before);
    }

    #[test]
    fn historical_data_seeds_viability_and_incumbents() {
        use crate::data::HistoricalRecord;
        let mut model = ElectionModel::new(base_config()).unwrap();
        let records = vec![
            HistoricalRecord::new("North", "Party A", 600),
            HistoricalRecord::new("North", "Party B", 400),
            HistoricalRecord::new("South", "Party B", 500),
            HistoricalRecord::new("South", "Party C", 300),
        ];
        let historical = HistoricalResults::new(records);
        model.apply_historical(&historical, None);

        let viability = model.context.viability.as_ref().unwrap();
        assert!((viability.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        // Party A and Party B each top one constituency.
        assert_eq!(model.parties.incumbent_indices(), vec![0, 1]);
    }
}
