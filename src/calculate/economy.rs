//! Economy phase inference from loss streaks.
//!
//! Credits are not exposed per round, so the buy state is inferred from
//! how many rounds in a row the team lost going into it:
//!
//! | streak | phase     |
//! |--------|-----------|
//! | pistol | pistol    |
//! | 0      | full buy  |
//! | 1      | eco       |
//! | 2      | force buy |
//! | 3+     | full buy (loss bonus has built up) |
//!
//! The streak resets at each pistol round. These boundaries are part of
//! the report format; changing them makes reports incomparable.

use crate::calculate::is_pistol_round;
use crate::models::{EconomyPhase, EconomySummary, GameRecord};

/// Phase for a non-pistol round entered on `loss_streak` consecutive losses.
pub fn phase_for_streak(loss_streak: u32) -> EconomyPhase {
    match loss_streak {
        0 => EconomyPhase::FullBuy,
        1 => EconomyPhase::Eco,
        2 => EconomyPhase::ForceBuy,
        _ => EconomyPhase::FullBuy,
    }
}

/// Classify every round of one game, in round order.
pub fn classify_rounds(game: &GameRecord) -> Vec<(u32, EconomyPhase)> {
    let mut loss_streak = 0u32;
    let mut phases = Vec::with_capacity(game.rounds.len());

    for round in game.rounds_in_order() {
        let phase = if is_pistol_round(round.round_num) {
            loss_streak = 0;
            EconomyPhase::Pistol
        } else {
            phase_for_streak(loss_streak)
        };
        phases.push((round.round_num, phase));

        if round.won {
            loss_streak = 0;
        } else {
            loss_streak += 1;
        }
    }

    phases
}

/// Win/total per inferred economy phase across all games.
pub fn analyze_economy(games: &[GameRecord]) -> EconomySummary {
    let mut summary = EconomySummary::default();

    for game in games {
        let phases = classify_rounds(game);
        for (round, (_, phase)) in game.rounds_in_order().into_iter().zip(phases) {
            summary.phase_mut(phase).record(round.won);
        }
    }

    summary
}
