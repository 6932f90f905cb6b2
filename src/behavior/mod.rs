//! Pluggable voter-behavior models combined into one voter×party utility
//! matrix. Every model implements the same `contribute` capability; the
//! engine iterates (model, weight) pairs homogeneously, so adding a new
//! behavioral factor never touches the combination loop.
//!
//! All models are pure functions of their inputs; randomness lives in the
//! vote-sampling step, not here.

use crate::model::parties::PartyFrame;
use crate::model::voters::VoterFrame;

/// Dense row-major voter×party utility matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct UtilityMatrix {
    n_voters: usize,
    n_parties: usize,
    data: Vec<f64>,
}

impl UtilityMatrix {
    pub fn zeros(n_voters: usize, n_parties: usize) -> Self {
        UtilityMatrix {
            n_voters,
            n_parties,
            data: vec![0.0; n_voters * n_parties],
        }
    }

    pub fn n_voters(&self) -> usize {
        self.n_voters
    }

    pub fn n_parties(&self) -> usize {
        self.n_parties
    }

    pub fn row(&self, voter: usize) -> &[f64] {
        let start = voter * self.n_parties;
        &self.data[start..start + self.n_parties]
    }

    pub fn row_mut(&mut self, voter: usize) -> &mut [f64] {
        let start = voter * self.n_parties;
        &mut self.data[start..start + self.n_parties]
    }

    pub fn reset(&mut self) {
        for v in self.data.iter_mut() {
            *v = 0.0;
        }
    }

    /// `self += weight * other`, the engine's combination primitive.
    pub fn add_scaled(&mut self, other: &UtilityMatrix, weight: f64) {
        debug_assert_eq!(self.data.len(), other.data.len());
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += weight * b;
        }
    }
}

/// Shared inputs the behavior models read alongside the voter and party
/// tables: macro conditions and externally estimated party viability.
#[derive(Debug, Clone)]
pub struct ModelContext {
    /// Current economic growth rate (e.g. 0.02 for +2%).
    pub economic_growth: f64,
    /// National mood bonus applied to incumbents.
    pub national_mood: f64,
    /// Anti-incumbency penalty applied to incumbents.
    pub anti_incumbency: f64,
    /// Per-party viability (expected vote share or win probability),
    /// typically seeded from historical results. `None` means all
    /// parties are perceived as fully viable.
    pub viability: Option<Vec<f64>>,
    /// Per-voter personal income change for pocketbook evaluation;
    /// falls back to the national growth signal when absent.
    pub personal_income_change: Option<Vec<f64>>,
}

impl Default for ModelContext {
    fn default() -> Self {
        ModelContext {
            economic_growth: 0.0,
            national_mood: 0.0,
            anti_incumbency: 0.0,
            viability: None,
            personal_income_change: None,
        }
    }
}

impl ModelContext {
    fn viability_of(&self, party: usize) -> f64 {
        match &self.viability {
            Some(v) => v.get(party).copied().unwrap_or(1.0),
            None => 1.0,
        }
    }
}

/// One behavioral factor. Implementations write their raw (unweighted)
/// contribution into `out`; the engine applies the configured weight.
pub trait BehaviorModel {
    fn name(&self) -> &'static str;

    fn contribute(
        &self,
        voters: &VoterFrame,
        parties: &PartyFrame,
        ctx: &ModelContext,
        out: &mut UtilityMatrix,
    );
}

/// Spatial proximity: utility falls with Euclidean distance between the
/// voter's ideology point and the party's position.
pub struct ProximityModel;

impl BehaviorModel for ProximityModel {
    fn name(&self) -> &'static str {
        "proximity"
    }

    fn contribute(
        &self,
        voters: &VoterFrame,
        parties: &PartyFrame,
        _ctx: &ModelContext,
        out: &mut UtilityMatrix,
    ) {
        for v in 0..voters.len() {
            let (vx, vy) = (voters.ideology_x[v], voters.ideology_y[v]);
            let row = out.row_mut(v);
            for p in 0..parties.len() {
                let dx = vx - parties.position_x[p];
                let dy = vy - parties.position_y[p];
                row[p] = -(dx * dx + dy * dy).sqrt();
            }
        }
    }
}

/// Non-policy appeal: a party's valence score, identical for every voter.
pub struct ValenceModel;

impl BehaviorModel for ValenceModel {
    fn name(&self) -> &'static str {
        "valence"
    }

    fn contribute(
        &self,
        voters: &VoterFrame,
        parties: &PartyFrame,
        _ctx: &ModelContext,
        out: &mut UtilityMatrix,
    ) {
        for v in 0..voters.len() {
            let row = out.row_mut(v);
            row.copy_from_slice(&parties.valence);
        }
    }
}

/// Retrospective economic voting: incumbents are rewarded or punished for
/// the growth rate, plus the national-mood bonus and anti-incumbency
/// penalty from the dynamic parameters. Non-incumbents get zero.
pub struct RetrospectiveModel;

impl BehaviorModel for RetrospectiveModel {
    fn name(&self) -> &'static str {
        "retrospective"
    }

    fn contribute(
        &self,
        voters: &VoterFrame,
        parties: &PartyFrame,
        ctx: &ModelContext,
        out: &mut UtilityMatrix,
    ) {
        let reward = ctx.economic_growth + ctx.national_mood - ctx.anti_incumbency;
        for v in 0..voters.len() {
            let row = out.row_mut(v);
            for p in 0..parties.len() {
                if parties.incumbent[p] {
                    row[p] = reward;
                }
            }
        }
    }
}

/// Sociotropic/pocketbook blend: each voter weighs the national growth
/// signal against their personal income change according to their
/// economic-perception type (1 = fully sociotropic). Incumbent columns
/// only.
pub struct SociotropicPocketbookModel;

impl BehaviorModel for SociotropicPocketbookModel {
    fn name(&self) -> &'static str {
        "sociotropic_pocketbook"
    }

    fn contribute(
        &self,
        voters: &VoterFrame,
        parties: &PartyFrame,
        ctx: &ModelContext,
        out: &mut UtilityMatrix,
    ) {
        let national = ctx.economic_growth;
        for v in 0..voters.len() {
            let personal = match &ctx.personal_income_change {
                Some(changes) => changes.get(v).copied().unwrap_or(national),
                None => national,
            };
            let sociotropic = voters.economic_perception[v];
            let signal = sociotropic * national + (1.0 - sociotropic) * personal;
            let row = out.row_mut(v);
            for p in 0..parties.len() {
                if parties.incumbent[p] {
                    row[p] = signal;
                }
            }
        }
    }
}

/// Strategic discounting of unviable parties (Duverger's law): a smooth
/// log penalty on low viability, identical across voters.
pub struct StrategicVotingModel;

impl BehaviorModel for StrategicVotingModel {
    fn name(&self) -> &'static str {
        "strategic"
    }

    fn contribute(
        &self,
        voters: &VoterFrame,
        parties: &PartyFrame,
        ctx: &ModelContext,
        out: &mut UtilityMatrix,
    ) {
        let penalties: Vec<f64> = (0..parties.len())
            .map(|p| (ctx.viability_of(p) + 1e-6).ln())
            .collect();
        for v in 0..voters.len() {
            out.row_mut(v).copy_from_slice(&penalties);
        }
    }
}

/// Binary wasted-vote penalty: parties under the viability threshold take
/// a flat utility hit, identical across voters.
pub struct WastedVoteModel {
    pub viability_threshold: f64,
    pub penalty: f64,
}

impl Default for WastedVoteModel {
    fn default() -> Self {
        WastedVoteModel {
            viability_threshold: 0.05,
            penalty: 1.0,
        }
    }
}

impl BehaviorModel for WastedVoteModel {
    fn name(&self) -> &'static str {
        "wasted_vote"
    }

    fn contribute(
        &self,
        voters: &VoterFrame,
        parties: &PartyFrame,
        ctx: &ModelContext,
        out: &mut UtilityMatrix,
    ) {
        let penalties: Vec<f64> = (0..parties.len())
            .map(|p| {
                if ctx.viability_of(p) < self.viability_threshold {
                    -self.penalty
                } else {
                    0.0
                }
            })
            .collect();
        for v in 0..voters.len() {
            out.row_mut(v).copy_from_slice(&penalties);
        }
    }
}

/// Combines registered models into the total utility matrix by weighted
/// sum. Owns no randomness and no voter/party state.
pub struct BehaviorEngine {
    models: Vec<(Box<dyn BehaviorModel>, f64)>,
}

impl BehaviorEngine {
    pub fn new() -> Self {
        BehaviorEngine { models: Vec::new() }
    }

    /// Register a model with its combination weight. Zero-weight models
    /// are skipped at registration time.
    pub fn add_model(&mut self, model: Box<dyn BehaviorModel>, weight: f64) -> &mut Self {
        if weight != 0.0 {
            self.models.push((model, weight));
        }
        self
    }

    pub fn model_names(&self) -> Vec<&'static str> {
        self.models.iter().map(|(m, _)| m.name()).collect()
    }

    /// Total utility: `Σ weight_k · contribution_k`, computed with one
    /// reused scratch matrix per call.
    pub fn compute_utilities(
        &self,
        voters: &VoterFrame,
        parties: &PartyFrame,
        ctx: &ModelContext,
    ) -> UtilityMatrix {
        let mut total = UtilityMatrix::zeros(voters.len(), parties.len());
        let mut scratch = UtilityMatrix::zeros(voters.len(), parties.len());

        for (model, weight) in &self.models {
            scratch.reset();
            model.contribute(voters, parties, ctx, &mut scratch);
            total.add_scaled(&scratch, *weight);
        }
        total
    }
}

impl Default for BehaviorEngine {
    fn default() -> Self {
        Self::new()
    }
}
