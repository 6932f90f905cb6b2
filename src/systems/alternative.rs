//! Ranked-ballot systems: ranking generation, instant-runoff, single
//! transferable vote, Condorcet and approval voting. Ballots are vectors
//! of candidate indices ordered from most to least preferred.
//!
//! Tie-break rule everywhere: the lowest candidate index wins contests
//! and survives eliminations, so every count is deterministic.

use crate::behavior::UtilityMatrix;

/// Each voter ranks all candidates by descending utility. The sort is
/// stable, so equal utilities rank the lower index first.
pub fn generate_rankings(utilities: &UtilityMatrix) -> Vec<Vec<usize>> {
    let n_candidates = utilities.n_parties();
    (0..utilities.n_voters())
        .map(|v| {
            let row = utilities.row(v);
            let mut order: Vec<usize> = (0..n_candidates).collect();
            order.sort_by(|&a, &b| {
                row[b].partial_cmp(&row[a]).unwrap_or(std::cmp::Ordering::Equal)
            });
            order
        })
        .collect()
}

/// One IRV counting round: the per-candidate tally of continuing ballots
/// and the candidate eliminated afterwards (`None` in the final round).
#[derive(Debug, Clone)]
pub struct IrvRound {
    pub tally: Vec<u64>,
    pub eliminated: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct IrvResult {
    pub winner: Option<usize>,
    pub rounds: Vec<IrvRound>,
}

/// Instant-runoff voting: repeatedly eliminate the candidate with the
/// fewest first preferences among continuing candidates, redistributing
/// ballots to each voter's next continuing choice, until someone holds a
/// strict majority of continuing ballots or only one candidate remains.
pub fn irv_election(rankings: &[Vec<usize>], n_candidates: usize) -> IrvResult {
    let mut active = vec![true; n_candidates];
    let mut rounds = Vec::new();

    if n_candidates == 0 {
        return IrvResult {
            winner: None,
            rounds,
        };
    }

    loop {
        let tally = count_first_preferences(rankings, &active, n_candidates);
        let continuing: u64 = tally.iter().sum();
        let n_active = active.iter().filter(|&&a| a).count();

        let leader = leading_candidate(&tally, &active);
        let majority = continuing / 2 + 1;

        if let Some(leader) = leader {
            if tally[leader] >= majority || n_active == 1 {
                rounds.push(IrvRound {
                    tally,
                    eliminated: None,
                });
                return IrvResult {
                    winner: Some(leader),
                    rounds,
                };
            }
        } else {
            // Every remaining ballot is exhausted; no winner to report.
            rounds.push(IrvRound {
                tally,
                eliminated: None,
            });
            return IrvResult {
                winner: None,
                rounds,
            };
        }

        // Eliminate exactly one candidate: fewest votes, lowest index on
        // ties, so the elimination sequence is reproducible.
        let loser = (0..n_candidates)
            .filter(|&c| active[c])
            .min_by_key(|&c| (tally[c], c))
            .unwrap_or(0);
        active[loser] = false;
        rounds.push(IrvRound {
            tally,
            eliminated: Some(loser),
        });
    }
}

fn count_first_preferences(
    rankings: &[Vec<usize>],
    active: &[bool],
    n_candidates: usize,
) -> Vec<u64> {
    let mut tally = vec![0u64; n_candidates];
    for ballot in rankings {
        if let Some(&choice) = ballot.iter().find(|&&c| active[c]) {
            tally[choice] += 1;
        }
    }
    tally
}

fn leading_candidate(tally: &[u64], active: &[bool]) -> Option<usize> {
    (0..tally.len())
        .filter(|&c| active[c])
        .max_by(|&a, &b| tally[a].cmp(&tally[b]).then(b.cmp(&a)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StvStatus {
    Active,
    Elected,
    Eliminated,
}

/// One STV counting round with fractional tallies.
#[derive(Debug, Clone)]
pub struct StvRound {
    pub tally: Vec<f64>,
    pub elected: Vec<usize>,
    pub eliminated: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct StvResult {
    pub elected: Vec<usize>,
    pub quota: u64,
    pub rounds: Vec<StvRound>,
}

/// Single transferable vote for `n_seats` seats.
///
/// Uses the Droop quota `floor(ballots / (seats + 1)) + 1` computed once
/// over all ballots. Candidates reaching the quota are elected and their
/// surplus transfers at fractional weight `surplus / received`; exhausted
/// ballots drop out; when the continuing candidates just fill the
/// remaining seats they are elected by default.
pub fn stv_election(rankings: &[Vec<usize>], n_candidates: usize, n_seats: usize) -> StvResult {
    let mut status = vec![StvStatus::Active; n_candidates];
    let mut elected: Vec<usize> = Vec::new();
    let mut rounds: Vec<StvRound> = Vec::new();

    let quota = rankings.len() as u64 / (n_seats as u64 + 1) + 1;

    // (ballot index, current weight); exhausted ballots are dropped.
    let mut weights: Vec<f64> = vec![1.0; rankings.len()];

    while elected.len() < n_seats {
        let n_active = status.iter().filter(|&&s| s == StvStatus::Active).count();
        let remaining_seats = n_seats - elected.len();

        if n_active == 0 {
            break;
        }
        if n_active <= remaining_seats {
            // Remaining candidates fill the remaining seats by default.
            let defaulted: Vec<usize> = (0..n_candidates)
                .filter(|&c| status[c] == StvStatus::Active)
                .collect();
            for &c in &defaulted {
                status[c] = StvStatus::Elected;
                elected.push(c);
            }
            rounds.push(StvRound {
                tally: vec![0.0; n_candidates],
                elected: defaulted,
                eliminated: None,
            });
            break;
        }

        // Tally continuing ballots at their current weights.
        let mut tally = vec![0.0f64; n_candidates];
        let mut holders: Vec<Option<usize>> = vec![None; rankings.len()];
        for (b, ballot) in rankings.iter().enumerate() {
            if weights[b] <= 0.0 {
                continue;
            }
            if let Some(&c) = ballot.iter().find(|&&c| status[c] == StvStatus::Active) {
                tally[c] += weights[b];
                holders[b] = Some(c);
            }
        }

        // Elect the highest tally at or above quota, transferring the
        // surplus at reduced weight; otherwise eliminate the lowest.
        let over_quota = (0..n_candidates)
            .filter(|&c| status[c] == StvStatus::Active && tally[c] >= quota as f64)
            .max_by(|&a, &b| {
                tally[a]
                    .partial_cmp(&tally[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(b.cmp(&a))
            });

        match over_quota {
            Some(winner) => {
                let received = tally[winner];
                let surplus = received - quota as f64;
                let factor = if received > 0.0 { surplus / received } else { 0.0 };
                for b in 0..rankings.len() {
                    if holders[b] == Some(winner) {
                        weights[b] *= factor;
                    }
                }
                status[winner] = StvStatus::Elected;
                elected.push(winner);
                rounds.push(StvRound {
                    tally,
                    elected: vec![winner],
                    eliminated: None,
                });
            }
            None => {
                let loser = (0..n_candidates)
                    .filter(|&c| status[c] == StvStatus::Active)
                    .min_by(|&a, &b| {
                        tally[a]
                            .partial_cmp(&tally[b])
                            .unwrap_or(std::cmp::Ordering::Equal)
                            .then(a.cmp(&b))
                    });
                match loser {
                    Some(loser) => {
                        status[loser] = StvStatus::Eliminated;
                        rounds.push(StvRound {
                            tally,
                            elected: Vec::new(),
                            eliminated: Some(loser),
                        });
                    }
                    None => break,
                }
            }
        }
    }

    StvResult {
        elected,
        quota,
        rounds,
    }
}

#[derive(Debug, Clone)]
pub struct CondorcetResult {
    /// The candidate beating every other head-to-head, if one exists.
    /// Absence (a cycle or ties) is an ordinary outcome, not an error.
    pub winner: Option<usize>,
    /// `pairwise[i][j]` = ballots ranking candidate i above candidate j.
    pub pairwise: Vec<Vec<u64>>,
}

/// Build the full pairwise-preference matrix and look for a Condorcet
/// winner.
pub fn condorcet_winner(rankings: &[Vec<usize>], n_candidates: usize) -> CondorcetResult {
    let mut pairwise = vec![vec![0u64; n_candidates]; n_candidates];

    for ballot in rankings {
        // rank_of[c] = position of candidate c on this ballot.
        let mut rank_of = vec![usize::MAX; n_candidates];
        for (pos, &c) in ballot.iter().enumerate() {
            rank_of[c] = pos;
        }
        for i in 0..n_candidates {
            for j in (i + 1)..n_candidates {
                if rank_of[i] < rank_of[j] {
                    pairwise[i][j] += 1;
                } else if rank_of[j] < rank_of[i] {
                    pairwise[j][i] += 1;
                }
            }
        }
    }

    let winner = (0..n_candidates).find(|&i| {
        (0..n_candidates).all(|j| i == j || pairwise[i][j] > pairwise[j][i])
    });

    CondorcetResult { winner, pairwise }
}

/// Approval cutoff: approve above a fixed utility, or above the voter's
/// own mean utility (relative mode).
#[derive(Debug, Clone, Copy)]
pub enum ApprovalThreshold {
    Absolute(f64),
    MeanRelative,
}

#[derive(Debug, Clone)]
pub struct ApprovalResult {
    pub winner: Option<usize>,
    pub approvals: Vec<u64>,
}

/// Approval voting: each voter approves every candidate above the
/// threshold; the most-approved candidate wins (lowest index on ties).
pub fn approval_voting(utilities: &UtilityMatrix, threshold: ApprovalThreshold) -> ApprovalResult {
    let n_candidates = utilities.n_parties();
    let mut approvals = vec![0u64; n_candidates];

    for v in 0..utilities.n_voters() {
        let row = utilities.row(v);
        let cutoff = match threshold {
            ApprovalThreshold::Absolute(t) => t,
            ApprovalThreshold::MeanRelative => row.iter().sum::<f64>() / n_candidates as f64,
        };
        for (c, &u) in row.iter().enumerate() {
            if u > cutoff {
                approvals[c] += 1;
            }
        }
    }

    let winner = (0..n_candidates).max_by(|&a, &b| approvals[a].cmp(&approvals[b]).then(b.cmp(&a)));
    ApprovalResult { winner, approvals }
}
