//! Historical election results consumed as simulation inputs: national
//! viability weights, incumbency lists and per-constituency strength
//! maps. Parsing files into [`HistoricalRecord`] rows is the job of an
//! external loader; the engine only works over the in-memory table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One (constituency, party) result row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub constituency: String,
    pub party: String,
    pub votes: u64,
    #[serde(default)]
    pub seats: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl HistoricalRecord {
    pub fn new(constituency: &str, party: &str, votes: u64) -> Self {
        HistoricalRecord {
            constituency: constituency.to_string(),
            party: party.to_string(),
            votes,
            seats: None,
            year: None,
        }
    }

    pub fn with_seats(mut self, seats: u32) -> Self {
        self.seats = Some(seats);
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// A queryable table of historical results.
pub struct HistoricalResults {
    records: Vec<HistoricalRecord>,
}

impl HistoricalResults {
    pub fn new(records: Vec<HistoricalRecord>) -> Self {
        HistoricalResults { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn filtered(&self, year: Option<i32>) -> impl Iterator<Item = &HistoricalRecord> {
        self.records
            .iter()
            .filter(move |r| match year {
                Some(y) => r.year == Some(y),
                None => true,
            })
    }

    /// National vote share per party, the viability signal the strategic
    /// and wasted-vote models consume.
    pub fn viability_weights(&self, year: Option<i32>) -> HashMap<String, f64> {
        let mut by_party: HashMap<String, u64> = HashMap::new();
        let mut total = 0u64;
        for record in self.filtered(year) {
            *by_party.entry(record.party.clone()).or_insert(0) += record.votes;
            total += record.votes;
        }
        if total == 0 {
            return HashMap::new();
        }
        by_party
            .into_iter()
            .map(|(party, votes)| (party, votes as f64 / total as f64))
            .collect()
    }

    /// Parties holding seats in the data. Without a seat column,
    /// incumbency is estimated as topping the vote in at least one
    /// constituency.
    pub fn incumbents(&self, year: Option<i32>) -> Vec<String> {
        let has_seats = self.filtered(year).any(|r| r.seats.is_some());
        let mut incumbents: Vec<String> = if has_seats {
            self.filtered(year)
                .filter(|r| r.seats.unwrap_or(0) > 0)
                .map(|r| r.party.clone())
                .collect()
        } else {
            // Plurality winner per constituency; lowest-votes ties keep
            // the first record seen so the result stays deterministic.
            let mut best: HashMap<&str, (&str, u64)> = HashMap::new();
            for record in self.filtered(year) {
                let entry = best
                    .entry(record.constituency.as_str())
                    .or_insert((record.party.as_str(), record.votes));
                if record.votes > entry.1 {
                    *entry = (record.party.as_str(), record.votes);
                }
            }
            best.values().map(|(party, _)| party.to_string()).collect()
        };
        incumbents.sort_unstable();
        incumbents.dedup();
        incumbents
    }

    /// Per-constituency party vote-share maps.
    pub fn constituency_shares(&self, year: Option<i32>) -> HashMap<String, HashMap<String, f64>> {
        let mut votes: HashMap<String, HashMap<String, u64>> = HashMap::new();
        for record in self.filtered(year) {
            *votes
                .entry(record.constituency.clone())
                .or_insert_with(HashMap::new)
                .entry(record.party.clone())
                .or_insert(0) += record.votes;
        }

        votes
            .into_iter()
            .map(|(constituency, by_party)| {
                let total: u64 = by_party.values().sum();
                let shares = by_party
                    .into_iter()
                    .map(|(party, v)| {
                        let share = if total > 0 {
                            v as f64 / total as f64
                        } else {
                            0.0
                        };
                        (party, share)
                    })
                    .collect();
                (constituency, shares)
            })
            .collect()
    }
}
