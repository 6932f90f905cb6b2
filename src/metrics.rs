//! Disproportionality and fragmentation indices computed from vote/seat
//! share vectors. All functions are pure; share vectors are index-aligned
//! with the party table.

/// Convert raw vote counts into shares of the total.
///
/// A zero total yields an all-zero share vector rather than NaN.
pub fn vote_shares(votes: &[u64]) -> Vec<f64> {
    let total: u64 = votes.iter().sum();
    if total == 0 {
        return vec![0.0; votes.len()];
    }
    votes.iter().map(|&v| v as f64 / total as f64).collect()
}

/// Convert seat counts into shares of the total.
pub fn seat_shares(seats: &[u32]) -> Vec<f64> {
    let total: u32 = seats.iter().sum();
    if total == 0 {
        return vec![0.0; seats.len()];
    }
    seats.iter().map(|&s| s as f64 / total as f64).collect()
}

/// Gallagher (least squares) index of disproportionality:
/// `sqrt(0.5 * Σ (v_i - s_i)^2)`.
///
/// Both vectors must be index-aligned and of equal length.
pub fn gallagher_index(vote_shares: &[f64], seat_shares: &[f64]) -> f64 {
    assert_eq!(
        vote_shares.len(),
        seat_shares.len(),
        "vote and seat share vectors must be index-aligned"
    );
    let sum_sq: f64 = vote_shares
        .iter()
        .zip(seat_shares)
        .map(|(v, s)| (v - s) * (v - s))
        .sum();
    (0.5 * sum_sq).sqrt()
}

/// Loosemore-Hanby index: `0.5 * Σ |v_i - s_i|`.
pub fn loosemore_hanby_index(vote_shares: &[f64], seat_shares: &[f64]) -> f64 {
    assert_eq!(
        vote_shares.len(),
        seat_shares.len(),
        "vote and seat share vectors must be index-aligned"
    );
    0.5 * vote_shares
        .iter()
        .zip(seat_shares)
        .map(|(v, s)| (v - s).abs())
        .sum::<f64>()
}

/// Effective number of parties (Laakso-Taagepera): `1 / Σ share_i^2`.
///
/// Exactly 1.0 for a single-party vector and exactly N for N equal shares.
/// An all-zero vector yields 0.0.
pub fn effective_number_of_parties(shares: &[f64]) -> f64 {
    let hhi = herfindahl_hirschman_index(shares);
    if hhi == 0.0 {
        return 0.0;
    }
    1.0 / hhi
}

/// Herfindahl-Hirschman concentration: `Σ share_i^2`.
pub fn herfindahl_hirschman_index(shares: &[f64]) -> f64 {
    shares.iter().map(|s| s * s).sum()
}

/// Two-party efficiency gap over per-district vote counts.
///
/// Each entry is `(votes_a, votes_b)` for one district. A vote is wasted
/// when cast for the loser, or for the winner beyond the bare majority.
/// Positive values mean party A wastes more (the map favors party B).
pub fn efficiency_gap(district_votes: &[(u64, u64)]) -> f64 {
    let mut wasted_a = 0i64;
    let mut wasted_b = 0i64;
    let mut total = 0u64;

    for &(a, b) in district_votes {
        let district_total = a + b;
        if district_total == 0 {
            continue;
        }
        total += district_total;
        let needed = district_total / 2 + 1;
        if a > b {
            wasted_a += a.saturating_sub(needed) as i64;
            wasted_b += b as i64;
        } else {
            // Ties count the whole district against A; lowest index wins
            // everywhere else in the crate, so B never wins a tie either.
            wasted_a += a as i64;
            wasted_b += b.saturating_sub(needed) as i64;
        }
    }

    if total == 0 {
        return 0.0;
    }
    (wasted_a - wasted_b) as f64 / total as f64
}

/// Per-party advantage ratio `seat_share / vote_share`.
///
/// Parties with zero vote share get a ratio of 0.0.
pub fn seats_votes_ratio(vote_shares: &[f64], seat_shares: &[f64]) -> Vec<f64> {
    assert_eq!(
        vote_shares.len(),
        seat_shares.len(),
        "vote and seat share vectors must be index-aligned"
    );
    vote_shares
        .iter()
        .zip(seat_shares)
        .map(|(&v, &s)| if v > 0.0 { s / v } else { 0.0 })
        .collect()
}

/// Fraction of the electorate that cast a ballot.
pub fn turnout_rate(ballots_cast: usize, n_voters: usize) -> f64 {
    if n_voters == 0 {
        return 0.0;
    }
    ballots_cast as f64 / n_voters as f64
}
