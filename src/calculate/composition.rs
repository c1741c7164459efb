//! Team compositions and per-player agent pools.

use std::collections::{BTreeMap, HashMap};

use crate::calculate::rounded_percentage;
use crate::models::{
    AgentUsage, CompositionStat, CompositionSummary, GameRecord, PlayerAgentPool,
};

/// Lineup key: agent names sorted and joined with `", "`.
pub fn composition_key<'a>(agents: impl IntoIterator<Item = &'a str>) -> String {
    let mut names: Vec<&str> = agents.into_iter().collect();
    names.sort_unstable();
    names.join(", ")
}

struct CompositionCounter {
    agents: String,
    count: u32,
    wins: u32,
    maps: BTreeMap<String, u32>,
}

/// Aggregate lineups and agent pools over `games`.
///
/// Games without agent data contribute nothing.
pub fn analyze_compositions(games: &[GameRecord]) -> CompositionSummary {
    let mut compositions: Vec<CompositionCounter> = Vec::new();
    let mut comp_index: HashMap<String, usize> = HashMap::new();
    let mut pools: Vec<PlayerAgentPool> = Vec::new();
    let mut pool_index: HashMap<String, usize> = HashMap::new();

    for game in games.iter().filter(|g| !g.agents.is_empty()) {
        let key = composition_key(game.agents.iter().map(|a| a.agent.as_str()));
        let slot = *comp_index.entry(key.clone()).or_insert_with(|| {
            compositions.push(CompositionCounter {
                agents: key,
                count: 0,
                wins: 0,
                maps: BTreeMap::new(),
            });
            compositions.len() - 1
        });
        let comp = &mut compositions[slot];
        comp.count += 1;
        if game.won {
            comp.wins += 1;
        }
        *comp.maps.entry(game.map.clone()).or_default() += 1;

        for pick in &game.agents {
            let slot = *pool_index.entry(pick.id.clone()).or_insert_with(|| {
                pools.push(PlayerAgentPool {
                    id: pick.id.clone(),
                    name: pick.name.clone(),
                    agents: Vec::new(),
                });
                pools.len() - 1
            });
            let pool = &mut pools[slot];
            match pool.agents.iter_mut().find(|u| u.agent == pick.agent) {
                Some(usage) => {
                    usage.count += 1;
                    if game.won {
                        usage.wins += 1;
                    }
                }
                None => pool.agents.push(AgentUsage {
                    agent: pick.agent.clone(),
                    count: 1,
                    wins: u32::from(game.won),
                }),
            }
        }
    }

    let mut compositions: Vec<CompositionStat> = compositions
        .into_iter()
        .map(|c| CompositionStat {
            win_rate: rounded_percentage(c.wins, c.count),
            agents: c.agents,
            count: c.count,
            wins: c.wins,
            maps: c.maps,
        })
        .collect();
    compositions.sort_by(|a, b| b.count.cmp(&a.count));

    for pool in &mut pools {
        pool.agents.sort_by(|a, b| b.count.cmp(&a.count));
    }

    CompositionSummary {
        compositions,
        player_agents: pools,
    }
}
