//! Streaks, half splits and comebacks.

use std::collections::HashMap;

use crate::calculate::{is_first_half, FIRST_PISTOL_ROUND, SECOND_PISTOL_ROUND};
use crate::models::{GameRecord, MomentumSummary, WinTally};

/// Pistol round whose result carries into `round_num`, for the two rounds
/// after each pistol.
fn preceding_pistol(round_num: u32) -> Option<u32> {
    match round_num {
        2 | 3 => Some(FIRST_PISTOL_ROUND),
        14 | 15 => Some(SECOND_PISTOL_ROUND),
        _ => None,
    }
}

/// Walk every game's rounds in order and collect momentum indicators.
pub fn analyze_momentum(games: &[GameRecord]) -> MomentumSummary {
    let mut summary = MomentumSummary::default();

    for game in games {
        let rounds = game.rounds_in_order();
        let outcomes: HashMap<u32, bool> = rounds.iter().map(|r| (r.round_num, r.won)).collect();

        // positive while winning, negative while losing
        let mut streak: i64 = 0;
        let mut half = WinTally::default();

        for round in &rounds {
            streak = match (round.won, streak) {
                (true, s) if s > 0 => s + 1,
                (true, _) => 1,
                (false, s) if s < 0 => s - 1,
                (false, _) => -1,
            };
            if streak > 0 {
                summary.max_win_streak = summary.max_win_streak.max(streak as u32);
            } else {
                summary.max_loss_streak = summary.max_loss_streak.max(streak.unsigned_abs() as u32);
            }

            if is_first_half(round.round_num) {
                summary.first_half.record(round.won);
                half.record(round.won);
            } else {
                summary.second_half.record(round.won);
            }

            let pistol_won = preceding_pistol(round.round_num).and_then(|p| outcomes.get(&p));
            match pistol_won {
                Some(true) => summary.post_pistol_win.record(round.won),
                Some(false) => summary.post_pistol_loss.record(round.won),
                None => {}
            }
        }

        if half.total > 0 {
            summary.games_analyzed += 1;
            if half.wins < half.losses() {
                summary.behind_at_half += 1;
                if game.won {
                    summary.comebacks += 1;
                }
            }
        }
    }

    summary
}
