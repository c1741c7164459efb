//! Attack/defense and pistol round win rates.

use crate::calculate::is_pistol_round;
use crate::models::{GameRecord, RoundSideAnalysis, Side};

/// Tally round wins by side, with pistol rounds tracked separately.
///
/// Rounds whose side is unknown are left out of every bucket.
pub fn analyze_round_sides(games: &[GameRecord]) -> RoundSideAnalysis {
    let mut analysis = RoundSideAnalysis::default();

    for round in games.iter().flat_map(|g| g.rounds.iter()) {
        let pistol = is_pistol_round(round.round_num);
        match round.side {
            Side::Attacker => {
                analysis.attack.record(round.won);
                if pistol {
                    analysis.pistol.attack.record(round.won);
                }
            }
            Side::Defender => {
                analysis.defense.record(round.won);
                if pistol {
                    analysis.pistol.defense.record(round.won);
                }
            }
            Side::Unknown => {}
        }
    }

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{game, round, rounds_from};

    #[test]
    fn test_side_split() {
        // 12 attack rounds (7 won), then 6 defense rounds (4 won)
        let games = vec![game("Ascent", true, rounds_from("WWLWLWLWWLLW WLWWLW"))];

        let analysis = analyze_round_sides(&games);

        assert_eq!(analysis.attack.wins, 7);
        assert_eq!(analysis.attack.total, 12);
        assert_eq!(analysis.defense.wins, 4);
        assert_eq!(analysis.defense.total, 6);
    }

    #[test]
    fn test_pistol_buckets() {
        let games = vec![
            game("Bind", true, rounds_from("WLLLLLLLLLLL L")),
            game("Bind", false, rounds_from("LLLLLLLLLLLL W")),
        ];

        let analysis = analyze_round_sides(&games);

        assert_eq!(analysis.pistol.attack.wins, 1);
        assert_eq!(analysis.pistol.attack.total, 2);
        assert_eq!(analysis.pistol.defense.wins, 1);
        assert_eq!(analysis.pistol.defense.total, 2);
        assert_eq!(analysis.pistol_total().total, 4);
        assert_eq!(analysis.pistol_total().rate(), 50.0);
    }

    #[test]
    fn test_unknown_side_excluded() {
        let rounds = vec![
            round(1, Side::Unknown, true),
            round(2, Side::Attacker, true),
            round(3, Side::Unknown, false),
            round(4, Side::Defender, false),
        ];
        let total = rounds.len() as u32;
        let games = vec![game("Icebox", true, rounds)];

        let analysis = analyze_round_sides(&games);

        assert_eq!(analysis.attack.total, 1);
        assert_eq!(analysis.defense.total, 1);
        assert!(analysis.attack.total + analysis.defense.total <= total);
        assert_eq!(analysis.pistol_total().total, 0);
    }

    #[test]
    fn test_wins_never_exceed_totals() {
        let games = vec![
            game("Lotus", true, rounds_from("WWWWWWWWWWWW WWWW")),
            game("Lotus", false, rounds_from("LLLLLLLLLLLL LLLL")),
        ];

        let a = analyze_round_sides(&games);

        for tally in [a.attack, a.defense, a.pistol.attack, a.pistol.defense] {
            assert!(tally.wins <= tally.total);
        }
    }
}
