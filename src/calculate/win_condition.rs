//! Win-condition inference from death counts.
//!
//! Round-end reasons are not available, so a round is called an
//! elimination when the losing side lost all five players, and a spike
//! round (plant, defuse or time-out) otherwise, including rounds with no
//! player lines for the losing side.

use crate::models::{GameRecord, RoundRecord, Side, WinCondition, WinTypeSummary};

/// Deaths that mean a full five-player roster was wiped.
pub const TEAM_WIPE_DEATHS: u32 = 5;

/// Classify how a round ended, from the scouted team's perspective.
pub fn classify_round(round: &RoundRecord) -> WinCondition {
    let deaths = if round.won {
        round.opp_deaths()
    } else {
        round.team_deaths()
    };

    if deaths >= TEAM_WIPE_DEATHS {
        WinCondition::Elimination
    } else {
        WinCondition::Spike
    }
}

/// Tally round wins and losses by inferred win condition.
///
/// Returns `None` when `games` holds no rounds at all.
pub fn analyze_win_conditions(games: &[GameRecord]) -> Option<WinTypeSummary> {
    let mut summary = WinTypeSummary::default();
    let mut processed = 0u32;

    for round in games.iter().flat_map(|g| g.rounds.iter()) {
        processed += 1;
        let condition = classify_round(round);

        if round.won {
            summary.total_wins += 1;
            let side_bucket = match round.side {
                Side::Attacker => Some(&mut summary.attack_wins),
                Side::Defender => Some(&mut summary.defense_wins),
                Side::Unknown => None,
            };
            for bucket in std::iter::once(&mut summary.wins).chain(side_bucket) {
                match condition {
                    WinCondition::Elimination => bucket.elimination += 1,
                    WinCondition::Spike => bucket.spike += 1,
                }
            }
        } else {
            summary.total_losses += 1;
            match condition {
                WinCondition::Elimination => summary.losses.eliminated += 1,
                WinCondition::Spike => summary.losses.spike += 1,
            }
        }
    }

    if processed == 0 {
        None
    } else {
        Some(summary)
    }
}
