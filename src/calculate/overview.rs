//! Kill/death overview for the scouted team.

use std::collections::HashMap;

use crate::calculate::kd_ratio;
use crate::models::{GameRecord, PlayerKd, TeamOverview};

/// Games, kills and deaths per player with K/D, sorted by kills.
///
/// Per-game player totals are used when the game carries them. Games
/// without totals fall back to summing round lines.
pub fn team_overview(games: &[GameRecord]) -> TeamOverview {
    let mut overview = TeamOverview::default();
    let mut players: Vec<PlayerKd> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for game in games {
        overview.games_played += 1;
        if game.won {
            overview.games_won += 1;
        }

        let lines: Vec<(&str, &str, u32, u32)> = if game.has_player_totals() {
            game.agents
                .iter()
                .map(|a| (a.id.as_str(), a.name.as_str(), a.kills, a.deaths))
                .collect()
        } else {
            game.rounds
                .iter()
                .flat_map(|r| r.players.iter())
                .map(|p| (p.id.as_str(), p.name.as_str(), p.kills, p.deaths))
                .collect()
        };

        for (id, name, kills, deaths) in lines {
            overview.total_kills += kills;
            overview.total_deaths += deaths;

            let slot = *index.entry(id).or_insert_with(|| {
                players.push(PlayerKd {
                    id: id.to_string(),
                    name: name.to_string(),
                    kills: 0,
                    deaths: 0,
                    kd: 0.0,
                });
                players.len() - 1
            });
            players[slot].kills += kills;
            players[slot].deaths += deaths;
        }
    }

    for player in &mut players {
        player.kd = kd_ratio(player.kills, player.deaths);
    }
    players.sort_by(|a, b| b.kills.cmp(&a.kills));

    overview.kd = kd_ratio(overview.total_kills, overview.total_deaths);
    overview.players = players;
    overview
}
