//! First-kill rate by player, agent, map and side.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{
    AgentFirstBlood, FieldSupport, FirstBloodTrend, FirstBloodTrends, FirstKillTally, GameRecord,
    Side,
};

/// Fewest rounds on a player/agent/map combination before its rate is shown.
pub const MIN_TREND_ROUNDS: u32 = 4;

struct TrendCounter {
    player: String,
    agent: String,
    map: String,
    total: FirstKillTally,
    attack: FirstKillTally,
    defense: FirstKillTally,
}

struct AgentCounter {
    player: String,
    agent: String,
    total: FirstKillTally,
}

fn by_rate_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Cross-tabulate first kills per player on each agent and map.
///
/// Returns `None` when no round in `games` carries a first kill for
/// either team, or when the source reports the field as unsupported.
pub fn analyze_first_blood_trends(
    games: &[GameRecord],
    support: FieldSupport,
) -> Option<FirstBloodTrends> {
    if support.is_unsupported() {
        return None;
    }

    let any_first_kill = games
        .iter()
        .flat_map(|g| g.rounds.iter())
        .any(|r| r.team_first_kill() || r.opp_first_kill());
    if !any_first_kill {
        return None;
    }

    let mut trends: Vec<TrendCounter> = Vec::new();
    let mut trend_index: HashMap<(String, String, String), usize> = HashMap::new();
    let mut agents: Vec<AgentCounter> = Vec::new();
    let mut agent_index: HashMap<(String, String), usize> = HashMap::new();

    for game in games {
        for round in &game.rounds {
            for stat in &round.players {
                let agent = game.agent_for(&stat.id);

                let key = (stat.id.clone(), agent.to_string(), game.map.clone());
                let slot = *trend_index.entry(key).or_insert_with(|| {
                    trends.push(TrendCounter {
                        player: stat.name.clone(),
                        agent: agent.to_string(),
                        map: game.map.clone(),
                        total: FirstKillTally::default(),
                        attack: FirstKillTally::default(),
                        defense: FirstKillTally::default(),
                    });
                    trends.len() - 1
                });
                let trend = &mut trends[slot];
                trend.total.record(stat.first_kill);
                match round.side {
                    Side::Attacker => trend.attack.record(stat.first_kill),
                    Side::Defender => trend.defense.record(stat.first_kill),
                    Side::Unknown => {}
                }

                let key = (stat.id.clone(), agent.to_string());
                let slot = *agent_index.entry(key).or_insert_with(|| {
                    agents.push(AgentCounter {
                        player: stat.name.clone(),
                        agent: agent.to_string(),
                        total: FirstKillTally::default(),
                    });
                    agents.len() - 1
                });
                agents[slot].total.record(stat.first_kill);
            }
        }
    }

    let mut trend_rows: Vec<FirstBloodTrend> = trends
        .into_iter()
        .filter(|t| t.total.first_kills > 0 && t.total.rounds >= MIN_TREND_ROUNDS)
        .map(|t| FirstBloodTrend {
            fb_rate: t.total.rate(),
            first_kills: t.total.first_kills,
            rounds: t.total.rounds,
            player: t.player,
            agent: t.agent,
            map: t.map,
            attack: t.attack,
            defense: t.defense,
        })
        .collect();
    trend_rows.sort_by(|a, b| by_rate_desc(a.fb_rate, b.fb_rate));

    let mut agent_rows: Vec<AgentFirstBlood> = agents
        .into_iter()
        .filter(|a| a.total.first_kills > 0)
        .map(|a| AgentFirstBlood {
            fb_rate: a.total.rate(),
            first_kills: a.total.first_kills,
            rounds: a.total.rounds,
            player: a.player,
            agent: a.agent,
        })
        .collect();
    agent_rows.sort_by(|a, b| by_rate_desc(a.fb_rate, b.fb_rate));

    Some(FirstBloodTrends {
        trends: trend_rows,
        agents: agent_rows,
    })
}
