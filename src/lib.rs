//! electoral-sim: an agent-based electoral simulation toolkit.
//!
//! The crate models populations of voters with ideological positions and
//! demographic attributes, computes vote choices under pluggable
//! behavioral models, tallies results under FPTP and party-list PR (with
//! several allocation rules) plus ranked-ballot systems, derives
//! disproportionality and fragmentation metrics, and simulates
//! post-election coalition formation and government survival.
//!
//! Everything is batch, in-memory and single-threaded; reproducibility
//! is keyed to the explicit seed in [`Config`].
//!
//! ```no_run
//! use electoral_sim::{Config, ElectionModel};
//!
//! let config = Config {
//!     n_voters: 100_000,
//!     n_constituencies: 10,
//!     seed: Some(42),
//!     ..Config::default()
//! };
//! let mut model = ElectionModel::new(config)?;
//! let result = model.run_election();
//! println!("turnout {:.1}%", result.turnout * 100.0);
//! # Ok::<(), electoral_sim::ConfigError>(())
//! ```

pub mod behavior;
pub mod config;
pub mod data;
pub mod engine;
pub mod metrics;
pub mod model;
pub mod presets;
pub mod report;
pub mod systems;

// Facade re-exports mirroring the common entry points.
pub use behavior::{
    BehaviorEngine, BehaviorModel, ModelContext, ProximityModel, RetrospectiveModel,
    SociotropicPocketbookModel, StrategicVotingModel, UtilityMatrix, ValenceModel,
    WastedVoteModel,
};
pub use config::{
    AllocationMethod, BehaviorWeights, Config, ConfigError, ConfigResult, CurveModel,
    ElectoralSystem, PartyConfig,
};
pub use data::{HistoricalRecord, HistoricalResults};
pub use engine::coalition::{
    coalition_strain, form_government, minimum_connected_winning, minimum_winning_coalitions,
    Coalition, CoalitionError, CoalitionGovernment, ConnectedCoalition, FormationOutcome,
};
pub use engine::government::{
    collapse_probability, hazard_rate, simulate_government_survival, CollapseReason,
    DestabilizingEvent, EventKind, GovernmentSimulator, GovernmentSummary, SurvivalStats,
};
pub use metrics::{
    effective_number_of_parties, efficiency_gap, gallagher_index, herfindahl_hirschman_index,
    loosemore_hanby_index, seat_shares, seats_votes_ratio, turnout_rate, vote_shares,
};
pub use model::{ElectionModel, ElectionResult};
pub use presets::{germany_config, india_config, uk_config, usa_config, PRESETS};
pub use report::SimulationReport;
pub use systems::allocation::{
    allocate_seats, dhondt_allocation, droop_quota_allocation, hare_quota_allocation,
    sainte_lague_allocation,
};
pub use systems::alternative::{
    approval_voting, condorcet_winner, generate_rankings, irv_election, stv_election,
    ApprovalResult, ApprovalThreshold, CondorcetResult, IrvResult, StvResult,
};
