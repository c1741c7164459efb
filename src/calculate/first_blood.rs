//! First blood conversion and per-player opening duels.
//!
//! GRID exposes a first-kill flag per player per round but nothing for
//! first deaths. First deaths are approximated: when the opponent took the
//! first kill, the credit goes to the first scouted player listed with a
//! death that round. That player may not actually have died first, so
//! `first_deaths` and `fd_rate` are estimates and should be presented as
//! such.

use std::collections::HashMap;

use tracing::debug;

use crate::calculate::percentage;
use crate::models::{FieldSupport, FirstBloodSummary, GameRecord, PlayerFirstBlood};

/// Rounds to see before concluding that an all-zero result means the
/// first-kill field is not populated upstream.
pub const MIN_ROUNDS_FOR_AVAILABILITY: u32 = 5;

#[derive(Default)]
struct PlayerCounter {
    id: String,
    name: String,
    first_kills: u32,
    first_deaths: u32,
    rounds: u32,
}

/// Compute first blood statistics across every round of `games`.
///
/// Returns `None` when first-kill data is missing rather than genuinely
/// zero: either the data source already knows the field is unsupported,
/// or at least [`MIN_ROUNDS_FOR_AVAILABILITY`] rounds went by without a
/// single first kill for either team.
pub fn analyze_first_blood(
    games: &[GameRecord],
    support: FieldSupport,
) -> Option<FirstBloodSummary> {
    if support.is_unsupported() {
        return None;
    }

    let mut team_fbs = 0u32;
    let mut opp_fbs = 0u32;
    let mut fb_wins = 0u32;
    let mut fb_losses = 0u32;
    let mut total_rounds = 0u32;

    let mut players: Vec<PlayerCounter> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for game in games {
        for round in &game.rounds {
            total_rounds += 1;

            let team_got_fb = round.team_first_kill();
            let opp_got_fb = round.opp_first_kill();

            let flagged = round.players.iter().filter(|p| p.first_kill).count();
            if flagged > 1 {
                debug!(
                    "Round {} on {} has {} first kills for one team",
                    round.round_num, game.map, flagged
                );
            }

            if team_got_fb {
                team_fbs += 1;
                if round.won {
                    fb_wins += 1;
                } else {
                    fb_losses += 1;
                }
            }
            if opp_got_fb {
                opp_fbs += 1;
            }

            let mut first_death_assigned = false;
            for stat in &round.players {
                let slot = *index.entry(stat.id.clone()).or_insert_with(|| {
                    players.push(PlayerCounter {
                        id: stat.id.clone(),
                        name: stat.name.clone(),
                        ..Default::default()
                    });
                    players.len() - 1
                });
                let counter = &mut players[slot];
                counter.rounds += 1;
                if stat.first_kill {
                    counter.first_kills += 1;
                }
                if opp_got_fb && !first_death_assigned && stat.deaths > 0 {
                    counter.first_deaths += 1;
                    first_death_assigned = true;
                }
            }
        }
    }

    if total_rounds >= MIN_ROUNDS_FOR_AVAILABILITY && team_fbs == 0 && opp_fbs == 0 {
        debug!(
            "No first kills in {} rounds, treating first blood as unavailable",
            total_rounds
        );
        return None;
    }

    let mut rows: Vec<PlayerFirstBlood> = players
        .into_iter()
        .map(|p| PlayerFirstBlood {
            fb_rate: percentage(p.first_kills, p.rounds),
            fd_rate: percentage(p.first_deaths, p.rounds),
            id: p.id,
            name: p.name,
            first_kills: p.first_kills,
            first_deaths: p.first_deaths,
            rounds: p.rounds,
        })
        .collect();
    rows.sort_by(|a, b| b.first_kills.cmp(&a.first_kills));

    Some(FirstBloodSummary {
        team_fb_rate: percentage(team_fbs, total_rounds),
        fb_conversion_rate: percentage(fb_wins, team_fbs),
        fb_choke_rate: percentage(fb_losses, team_fbs),
        team_fbs,
        opp_fbs,
        fb_wins,
        fb_losses,
        total_rounds,
        players: rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{game, player, round};
    use crate::models::{RoundRecord, Side};

    fn fb_round(num: u32, won: bool, team_fk: bool, opp_fk: bool) -> RoundRecord {
        let mut r = round(num, Side::Attacker, won);
        r.players = vec![
            player("a", 1, 0, team_fk),
            player("b", 0, 1, false),
            player("c", 0, 1, false),
        ];
        r.opp_players = vec![player("x", 1, 1, opp_fk), player("y", 0, 1, false)];
        r
    }

    #[test]
    fn test_conversion_and_choke() {
        let rounds = vec![
            fb_round(1, true, true, false),
            fb_round(2, true, true, false),
            fb_round(3, false, true, false),
            fb_round(4, false, false, true),
        ];
        let games = vec![game("Ascent", true, rounds)];

        let summary = analyze_first_blood(&games, FieldSupport::Supported).unwrap();

        assert_eq!(summary.team_fbs, 3);
        assert_eq!(summary.opp_fbs, 1);
        assert_eq!(summary.fb_wins, 2);
        assert_eq!(summary.fb_losses, 1);
        assert_eq!(summary.fb_wins + summary.fb_losses, summary.team_fbs);
        assert_eq!(summary.total_rounds, 4);
        assert_eq!(summary.team_fb_rate, 75.0);
        assert!((summary.fb_conversion_rate + summary.fb_choke_rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_death_goes_to_first_dead_player() {
        let games = vec![game("Bind", false, vec![fb_round(1, false, false, true)])];

        let summary = analyze_first_blood(&games, FieldSupport::Unknown).unwrap();
        let b = summary.players.iter().find(|p| p.id == "b").unwrap();
        let c = summary.players.iter().find(|p| p.id == "c").unwrap();
        let a = summary.players.iter().find(|p| p.id == "a").unwrap();

        assert_eq!(b.first_deaths, 1);
        assert_eq!(c.first_deaths, 0);
        assert_eq!(a.first_deaths, 0);
        assert_eq!(b.fd_rate, 100.0);
    }

    #[test]
    fn test_players_sorted_by_first_kills() {
        let mut r1 = round(1, Side::Defender, true);
        r1.players = vec![player("a", 0, 0, false), player("b", 2, 0, true)];
        let mut r2 = round(2, Side::Defender, true);
        r2.players = vec![player("a", 0, 0, false), player("b", 1, 0, true)];
        let games = vec![game("Haven", true, vec![r1, r2])];

        let summary = analyze_first_blood(&games, FieldSupport::Supported).unwrap();

        assert_eq!(summary.players[0].id, "b");
        assert_eq!(summary.players[0].first_kills, 2);
        assert_eq!(summary.players[0].fb_rate, 100.0);
        assert_eq!(summary.players[1].id, "a");
    }

    #[test]
    fn test_unavailable_when_no_first_kills() {
        let rounds: Vec<RoundRecord> = (1..=6).map(|n| fb_round(n, n % 2 == 0, false, false)).collect();
        let games = vec![game("Lotus", true, rounds)];

        assert!(analyze_first_blood(&games, FieldSupport::Unknown).is_none());
    }

    #[test]
    fn test_few_rounds_without_first_kills_still_reported() {
        let rounds: Vec<RoundRecord> = (1..=3).map(|n| fb_round(n, true, false, false)).collect();
        let games = vec![game("Lotus", true, rounds)];

        let summary = analyze_first_blood(&games, FieldSupport::Unknown).unwrap();
        assert_eq!(summary.team_fbs, 0);
        assert_eq!(summary.fb_conversion_rate, 0.0);
        assert_eq!(summary.fb_choke_rate, 0.0);
    }

    #[test]
    fn test_unsupported_source_short_circuits() {
        let games = vec![game("Split", true, vec![fb_round(1, true, true, false)])];
        assert!(analyze_first_blood(&games, FieldSupport::Unsupported).is_none());
    }

    #[test]
    fn test_duplicate_first_kill_flags_tolerated() {
        let mut r = round(1, Side::Attacker, true);
        r.players = vec![player("a", 1, 0, true), player("b", 1, 0, true)];
        let games = vec![game("Pearl", true, vec![r])];

        let summary = analyze_first_blood(&games, FieldSupport::Supported).unwrap();

        assert_eq!(summary.team_fbs, 1);
        assert_eq!(summary.fb_wins, 1);
        let credited: u32 = summary.players.iter().map(|p| p.first_kills).sum();
        assert_eq!(credited, 2);
    }
}
