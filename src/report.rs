//! JSON summary of a simulation run, consumed by dashboards and other
//! presentation collaborators. Field names are camelCase to match the
//! published report format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::model::parties::PartyFrame;
use crate::model::ElectionResult;

/// One party's row in the report, in stable party-index order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyResult {
    pub name: String,
    pub votes: u64,
    pub seats: u32,
    #[serde(rename = "voteShare")]
    pub vote_share: f64,
    #[serde(rename = "seatShare")]
    pub seat_share: f64,
}

/// Full simulation summary persisted by the CLI `--output` flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub system: String,
    #[serde(rename = "nVoters")]
    pub n_voters: usize,
    #[serde(rename = "nConstituencies")]
    pub n_constituencies: usize,
    pub turnout: f64,
    #[serde(rename = "ballotCount")]
    pub ballot_count: usize,
    pub parties: Vec<PartyResult>,
    pub gallagher: f64,
    #[serde(rename = "enpVotes")]
    pub enp_votes: f64,
    #[serde(rename = "enpSeats")]
    pub enp_seats: f64,
    pub seed: Option<u64>,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

impl SimulationReport {
    pub fn new(config: &Config, parties: &PartyFrame, result: &ElectionResult) -> Self {
        let vote_shares = result.vote_shares();
        let seat_shares = result.seat_shares();

        let party_rows = parties
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| PartyResult {
                name: name.clone(),
                votes: result.votes[i],
                seats: result.seats[i],
                vote_share: vote_shares[i],
                seat_share: seat_shares[i],
            })
            .collect();

        SimulationReport {
            system: result.system.to_string(),
            n_voters: config.n_voters,
            n_constituencies: config.n_constituencies,
            turnout: result.turnout,
            ballot_count: result.ballots_cast,
            parties: party_rows,
            gallagher: result.gallagher,
            enp_votes: result.enp_votes,
            enp_seats: result.enp_seats,
            seed: config.seed,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::ElectionModel;

    #[test]
    fn report_rows_follow_party_order() {
        let config = Config {
            n_voters: 2_000,
            n_constituencies: 4,
            seed: Some(11),
            ..Config::default()
        };
        let mut model = ElectionModel::new(config.clone()).unwrap();
        let result = model.run_election();
        let report = SimulationReport::new(&config, &model.parties, &result);

        assert_eq!(report.parties.len(), 3);
        assert_eq!(report.parties[0].name, "Party A");
        assert_eq!(report.system, "FPTP");
        let votes: u64 = report.parties.iter().map(|p| p.votes).sum();
        assert_eq!(votes, report.ballot_count as u64);
    }

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let config = Config {
            n_voters: 500,
            n_constituencies: 2,
            seed: Some(1),
            ..Config::default()
        };
        let mut model = ElectionModel::new(config.clone()).unwrap();
        let result = model.run_election();
        let report = SimulationReport::new(&config, &model.parties, &result);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"enpVotes\""));
        assert!(json.contains("\"voteShare\""));
        assert!(json.contains("\"ballotCount\""));
        assert!(json.contains("\"generatedAt\""));
    }
}
